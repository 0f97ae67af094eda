/// Geometric hybridization class of an atom.
///
/// Layout only needs the angular geometry a center prefers, so the full
/// orbital taxonomy collapses to four classes: linear (`SP`), trigonal
/// (`SP2`), tetrahedral (`SP3`, drawn with 120 degree spacing in 2D), and
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    SP,
    SP2,
    #[default]
    SP3,
    Other,
}

impl Hybridization {
    /// Whether this center draws its substituents on a straight line.
    pub fn is_linear(self) -> bool {
        self == Hybridization::SP
    }
}

/// Default atom payload for layout input graphs.
///
/// Callers with richer atom types implement
/// [`HasHybridization`](crate::traits::HasHybridization) instead of
/// converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Atom {
    pub hybridization: Hybridization,
}

impl Atom {
    pub fn new(hybridization: Hybridization) -> Self {
        Self { hybridization }
    }
}

impl crate::traits::HasHybridization for Atom {
    fn hybridization(&self) -> Hybridization {
        self.hybridization
    }
}
