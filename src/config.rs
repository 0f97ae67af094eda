/// Configuration for coordinate generation.
///
/// The defaults draw with a unit bond length; callers rendering in pixel
/// units scale `bond_length`, `min_separation`, and `fragment_gap`
/// together.
///
/// # Examples
///
/// ```
/// use sketchcrab::LayoutConfig;
///
/// // Skip the refinement pass but keep canonical orientation.
/// let config = LayoutConfig {
///     relax: false,
///     ..LayoutConfig::default()
/// };
/// assert!(config.normalize_orientation);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Target length of a drawn bond.
    pub bond_length: f64,

    /// Separation below which non-bonded atoms repel during relaxation.
    pub min_separation: f64,

    /// Whether the constrained relaxation pass runs at all.
    pub relax: bool,

    /// Upper bound on relaxation iterations.
    pub max_relax_iterations: usize,

    /// Whether the finished layout is rotated onto its principal axis.
    pub normalize_orientation: bool,

    /// Horizontal gap left between disconnected fragments.
    pub fragment_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bond_length: 1.0,
            min_separation: 0.5,
            relax: true,
            max_relax_iterations: 128,
            normalize_orientation: true,
            fragment_gap: 1.5,
        }
    }
}
