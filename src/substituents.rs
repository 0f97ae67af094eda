use std::f64::consts::PI;

use petgraph::graph::NodeIndex;

use crate::geometry::{largest_gap_bisector, normalize_angle, Point};
use crate::mol::Mol;
use crate::traits::HasHybridization;

/// Angular separation between consecutive chain bonds: 120 degrees, the
/// trigonal spacing that also serves as the 2D tetrahedral approximation.
const TURN: f64 = 2.0 * PI / 3.0;

/// Directions from `v` toward each of its placed neighbors, in ascending
/// neighbor-id order.
pub fn occupied_angles<A, B>(mol: &Mol<A, B>, coords: &[Option<Point>], v: NodeIndex) -> Vec<f64> {
    let Some(origin) = coords[v.index()] else {
        return Vec::new();
    };
    mol.neighbors_sorted(v)
        .into_iter()
        .filter_map(|nb| {
            coords[nb.index()]
                .map(|p| (p - origin).normalized_or(Point::new(1.0, 0.0)).angle())
        })
        .collect()
}

/// Direction of the next bond when extending a chain through placed
/// vertex `v`.
///
/// Linear centers continue straight; a center with one placed neighbor
/// turns 120 degrees, the side alternating with `turn_left` so unbranched
/// chains zig-zag instead of curling; anything more crowded takes the
/// bisector of the largest free gap.
pub fn chain_step_direction<A: HasHybridization, B>(
    mol: &Mol<A, B>,
    coords: &[Option<Point>],
    v: NodeIndex,
    turn_left: bool,
) -> f64 {
    let occupied = occupied_angles(mol, coords, v);
    match occupied.len() {
        0 => 0.0,
        1 => {
            if mol.atom(v).hybridization().is_linear() {
                normalize_angle(occupied[0] + PI)
            } else {
                let turn = if turn_left { TURN } else { -TURN };
                normalize_angle(occupied[0] + turn)
            }
        }
        _ => largest_gap_bisector(&occupied),
    }
}

/// Direction for a branch child hanging off placed vertex `v`.
///
/// A terminal (degree-1) child of a vertex with a single occupied angle
/// sits directly opposite that neighbor; linear centers always extend
/// straight; otherwise the largest-gap bisector wins.
pub fn branch_direction<A: HasHybridization, B>(
    mol: &Mol<A, B>,
    coords: &[Option<Point>],
    v: NodeIndex,
    child: NodeIndex,
) -> f64 {
    let occupied = occupied_angles(mol, coords, v);
    match occupied.len() {
        0 => 0.0,
        1 => {
            if mol.atom(v).hybridization().is_linear() || mol.degree(child) <= 1 {
                normalize_angle(occupied[0] + PI)
            } else {
                normalize_angle(occupied[0] + TURN)
            }
        }
        _ => largest_gap_bisector(&occupied),
    }
}

/// Extend a chain unit outward from its already-placed leading atom,
/// one bond per step in path order.
pub fn extend_chain<A: HasHybridization, B>(
    mol: &Mol<A, B>,
    coords: &mut [Option<Point>],
    path: &[NodeIndex],
    bond_length: f64,
) {
    for i in 1..path.len() {
        if coords[path[i].index()].is_some() {
            continue;
        }
        let parent = path[i - 1];
        let Some(origin) = coords[parent.index()] else {
            continue;
        };
        let theta = chain_step_direction(mol, coords, parent, i % 2 == 0);
        coords[path[i].index()] = Some(origin + Point::from_angle(theta) * bond_length);
    }
}

/// Breadth-style sweep placing any vertex the unit pass left behind,
/// walking outward from placed anchors in ascending id order. Vertices
/// with no placed neighbor at all end up on a deterministic fallback row.
/// After this pass every vertex has a coordinate.
pub fn attach_pending<A: HasHybridization, B>(
    mol: &Mol<A, B>,
    coords: &mut [Option<Point>],
    bond_length: f64,
) {
    loop {
        let mut progressed = false;
        for idx in 0..coords.len() {
            if coords[idx].is_some() {
                continue;
            }
            let v = NodeIndex::new(idx);
            let Some(parent) = mol
                .neighbors_sorted(v)
                .into_iter()
                .find(|nb| coords[nb.index()].is_some())
            else {
                continue;
            };
            let theta = branch_direction(mol, coords, parent, v);
            let origin = coords[parent.index()].expect("parent was checked placed");
            coords[idx] = Some(origin + Point::from_angle(theta) * bond_length);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }
    for (idx, slot) in coords.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = Some(Point::new(idx as f64 * bond_length, 0.0));
        }
    }
}
