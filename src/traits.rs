use crate::atom::Hybridization;
use crate::bond::BondOrder;

/// Read access to an atom's hybridization class.
///
/// The engine is generic over atom payloads; any type carrying a
/// [`Hybridization`] can drive angular placement.
pub trait HasHybridization {
    fn hybridization(&self) -> Hybridization;
}

/// Read access to a bond's order.
pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

impl HasHybridization for Hybridization {
    fn hybridization(&self) -> Hybridization {
        *self
    }
}

impl HasBondOrder for BondOrder {
    fn bond_order(&self) -> BondOrder {
        *self
    }
}
