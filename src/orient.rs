use crate::geometry::Point;

/// Relative anisotropy below which a layout counts as isotropic and is
/// left at its default orientation.
const ISOTROPY_EPSILON: f64 = 1e-9;

/// Rotate the whole layout so its principal axis runs horizontally and
/// its centroid sits at the origin.
///
/// The rotation angle comes from the closed-form eigen-decomposition of
/// the 2x2 coordinate covariance; near-isotropic layouts (a lone ring, a
/// single atom) are only centered. Applying the operation twice gives
/// the same result as applying it once.
pub fn normalize_orientation(coords: &mut [Point]) {
    let members: Vec<usize> = (0..coords.len()).collect();
    normalize_members(coords, &members);
}

/// Same normalization restricted to one fragment's vertices.
pub fn normalize_members(coords: &mut [Point], members: &[usize]) {
    if members.is_empty() {
        return;
    }
    let mut center = Point::ZERO;
    for &i in members {
        center += coords[i];
    }
    center = center / members.len() as f64;
    for &i in members {
        coords[i] -= center;
    }

    let (mut cxx, mut cyy, mut cxy) = (0.0, 0.0, 0.0);
    for &i in members {
        let p = coords[i];
        cxx += p.x * p.x;
        cyy += p.y * p.y;
        cxy += p.x * p.y;
    }

    let anisotropy = (cxx - cyy).hypot(2.0 * cxy);
    if anisotropy <= ISOTROPY_EPSILON * (cxx + cyy) {
        return;
    }
    let theta = 0.5 * (2.0 * cxy).atan2(cxx - cyy);
    for &i in members {
        coords[i] = coords[i].rotated(-theta);
    }
}
