use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::geometry::{centroid, largest_gap_bisector, Point, Similarity};
use crate::mol::Mol;
use crate::substituents::occupied_angles;

/// Outgoing direction at a placed attachment atom: the bisector of the
/// largest angular gap among its placed neighbors, which degenerates to
/// "directly away" for a single neighbor and to the +x axis when nothing
/// around the atom is placed yet.
pub fn outgoing_direction<A, B>(
    mol: &Mol<A, B>,
    coords: &[Option<Point>],
    atom: NodeIndex,
) -> f64 {
    largest_gap_bisector(&occupied_angles(mol, coords, atom))
}

/// Rigidly attach a child unit laid out in `local` coordinates to its
/// already-placed parent.
///
/// The child's attachment atom lands one bond length from the parent
/// attachment atom along the outgoing direction, and the whole unit is
/// rotated so the attachment atom's local first-neighbor direction
/// continues outward rather than folding back over the parent. Atoms
/// that already have world coordinates are left untouched.
pub fn attach_unit<A, B>(
    mol: &Mol<A, B>,
    local: &[(NodeIndex, Point)],
    parent_atom: NodeIndex,
    child_atom: NodeIndex,
    coords: &mut [Option<Point>],
    bond_length: f64,
) {
    let parent_pos = coords[parent_atom.index()].unwrap_or(Point::ZERO);
    let theta = outgoing_direction(mol, coords, parent_atom);
    let target = parent_pos + Point::from_angle(theta) * bond_length;

    let local_map: FxHashMap<NodeIndex, Point> = local.iter().copied().collect();
    let Some(&local_c) = local_map.get(&child_atom) else {
        return;
    };
    let neighbor_mean = centroid(
        mol.neighbors_sorted(child_atom)
            .into_iter()
            .filter_map(|nb| local_map.get(&nb).copied()),
    );
    let into_body = (neighbor_mean - local_c).normalized_or(Point::new(1.0, 0.0));
    let rot = Similarity::rotation_about(local_c, theta - into_body.angle());
    let shift = target - local_c;
    for &(atom, p) in local {
        if coords[atom.index()].is_none() {
            coords[atom.index()] = Some(rot.apply(p) + shift);
        }
    }
}
