use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

use crate::config::LayoutConfig;
use crate::connector::attach_unit;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::mol::Mol;
use crate::orient::normalize_members;
use crate::relax::relax;
use crate::rings::{classify_ring_systems, mark_connected_systems, Ring};
use crate::substituents::{attach_pending, branch_direction, extend_chain};
use crate::templates::place_ring_system;
use crate::traits::{HasBondOrder, HasHybridization};
use crate::units::{build_placement_graph, RigidUnit, UnitKind};

/// Compute 2D coordinates for every vertex of the molecular graph.
///
/// The result is indexed by vertex id and is a pure function of the
/// graph, the ring list, and the configuration: repeated calls yield
/// bit-identical coordinates. The only error condition is a malformed
/// ring list; every well-formed input produces a complete layout, with
/// degenerate shapes degraded rather than rejected.
pub fn generate_coordinates<A, B>(
    mol: &Mol<A, B>,
    rings: &[Ring],
    config: &LayoutConfig,
) -> Result<Vec<Point>>
where
    A: HasHybridization,
    B: HasBondOrder,
{
    validate(mol, rings)?;
    let n = mol.atom_count();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut systems = classify_ring_systems(rings);
    mark_connected_systems(mol, &mut systems);
    let placement = build_placement_graph(mol, &systems);

    let mut slots: Vec<Option<Point>> = vec![None; n];
    for &ui in &placement.order {
        let unit = &placement.units[ui];
        match unit.kind {
            UnitKind::RingSystem(si) => {
                let local = place_ring_system(&systems[si], rings, config.bond_length);
                match unit.parent_bond {
                    Some((p, c)) => {
                        attach_unit(mol, &local, p, c, &mut slots, config.bond_length)
                    }
                    None => {
                        for (atom, point) in local {
                            slots[atom.index()] = Some(point);
                        }
                    }
                }
            }
            UnitKind::Chain | UnitKind::SingleAtom => {
                let path = oriented_path(unit);
                match unit.parent_bond {
                    Some((p, c)) => {
                        if let Some(origin) = slots[p.index()] {
                            let theta = branch_direction(mol, &slots, p, c);
                            slots[c.index()] =
                                Some(origin + Point::from_angle(theta) * config.bond_length);
                        }
                    }
                    None => {
                        slots[path[0].index()] = Some(Point::ZERO);
                    }
                }
                extend_chain(mol, &mut slots, &path, config.bond_length);
            }
        }
    }
    attach_pending(mol, &mut slots, config.bond_length);

    let mut coords: Vec<Point> = slots
        .into_iter()
        .map(|s| s.expect("attach_pending leaves no vertex without a coordinate"))
        .collect();

    let fragments = connected_components(mol);
    if fragments.len() > 1 {
        // fragments were each built around the origin; pull them apart
        // before relaxation so cross-fragment repulsion never fires
        pack_fragments(&mut coords, &fragments, config.fragment_gap);
    }

    if config.relax {
        let (in_ring, ring_bond) = ring_membership(mol, rings);
        relax(mol, &in_ring, &ring_bond, &mut coords, config);
    }

    if config.normalize_orientation {
        for fragment in &fragments {
            let members: Vec<usize> = fragment.iter().map(|a| a.index()).collect();
            normalize_members(&mut coords, &members);
        }
    }
    if fragments.len() > 1 {
        pack_fragments(&mut coords, &fragments, config.fragment_gap);
    }

    Ok(coords)
}

fn validate<A, B>(mol: &Mol<A, B>, rings: &[Ring]) -> Result<()> {
    let n = mol.atom_count();
    for (ri, ring) in rings.iter().enumerate() {
        if ring.len() < 3 {
            return Err(Error::RingTooSmall {
                ring: ri,
                len: ring.len(),
            });
        }
        let mut seen: FxHashSet<NodeIndex> = FxHashSet::default();
        for &atom in &ring.atoms {
            if atom.index() >= n {
                return Err(Error::UnknownRingVertex {
                    ring: ri,
                    vertex: atom.index(),
                });
            }
            if !seen.insert(atom) {
                return Err(Error::DuplicateRingVertex {
                    ring: ri,
                    vertex: atom.index(),
                });
            }
        }
    }
    Ok(())
}

/// Per-atom and per-bond ring membership derived from the ring list.
fn ring_membership<A, B>(mol: &Mol<A, B>, rings: &[Ring]) -> (Vec<bool>, Vec<bool>) {
    let mut in_ring = vec![false; mol.atom_count()];
    let mut ring_bond = vec![false; mol.bond_count()];
    for ring in rings {
        let len = ring.atoms.len();
        for (i, &a) in ring.atoms.iter().enumerate() {
            in_ring[a.index()] = true;
            let b = ring.atoms[(i + 1) % len];
            if let Some(e) = mol.bond_between(a, b) {
                ring_bond[e.index()] = true;
            }
        }
    }
    (in_ring, ring_bond)
}

/// A chain's atoms with the parent-side attachment endpoint first.
fn oriented_path(unit: &RigidUnit) -> Vec<NodeIndex> {
    let mut path = unit.atoms.clone();
    if let Some((_, c)) = unit.parent_bond {
        if path.last() == Some(&c) {
            path.reverse();
        }
    }
    path
}

fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![NodeIndex::new(start)];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(current);
            for nb in mol.neighbors_sorted(current) {
                if !visited[nb.index()] {
                    stack.push(nb);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Line fragments up left to right on a shared baseline, in order of
/// their lowest vertex id.
fn pack_fragments(coords: &mut [Point], fragments: &[Vec<NodeIndex>], gap: f64) {
    let mut cursor = 0.0;
    for fragment in fragments {
        let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
        let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
        for &a in fragment {
            let p = coords[a.index()];
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let shift_x = cursor - min_x;
        let shift_y = -(min_y + max_y) / 2.0;
        for &a in fragment {
            coords[a.index()] += Point::new(shift_x, shift_y);
        }
        cursor += (max_x - min_x) + gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::tests::fixtures::{benzene, mol_of_edges, n};

    #[test]
    fn empty_graph_empty_map() {
        let mol = Mol::<Atom, Bond>::new();
        let coords = generate_coordinates(&mol, &[], &LayoutConfig::default()).unwrap();
        assert!(coords.is_empty());
    }

    #[test]
    fn single_atom_at_origin() {
        let mut mol = Mol::<Atom, Bond>::new();
        mol.add_atom(Atom::default());
        let coords = generate_coordinates(&mol, &[], &LayoutConfig::default()).unwrap();
        assert_eq!(coords.len(), 1);
        assert!(coords[0].norm() < 1e-12);
    }

    #[test]
    fn ring_referencing_missing_vertex_is_rejected() {
        let mol = mol_of_edges(3, &[(0, 1), (1, 2)]);
        let bad = vec![Ring::new(vec![n(0), n(1), n(7)])];
        let err = generate_coordinates(&mol, &bad, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownRingVertex { ring: 0, vertex: 7 }));
    }

    #[test]
    fn ring_with_duplicate_vertex_is_rejected() {
        let mol = mol_of_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let bad = vec![Ring::new(vec![n(0), n(1), n(1)])];
        let err = generate_coordinates(&mol, &bad, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateRingVertex { ring: 0, vertex: 1 }));
    }

    #[test]
    fn undersized_ring_is_rejected() {
        let mol = mol_of_edges(2, &[(0, 1)]);
        let bad = vec![Ring::new(vec![n(0), n(1)])];
        let err = generate_coordinates(&mol, &bad, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, Error::RingTooSmall { ring: 0, len: 2 }));
    }

    #[test]
    fn benzene_bonds_all_unit_length() {
        let (mol, rings) = benzene();
        let coords = generate_coordinates(&mol, &rings, &LayoutConfig::default()).unwrap();
        for e in mol.bonds() {
            let (a, b) = mol.bond_endpoints(e).unwrap();
            let d = coords[a.index()].distance(coords[b.index()]);
            assert!((d - 1.0).abs() < 0.01, "bond {}-{}: {d}", a.index(), b.index());
        }
    }

    #[test]
    fn fragments_do_not_overlap() {
        // two disjoint triangles
        let mol = mol_of_edges(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let rings = vec![
            Ring::new(vec![n(0), n(1), n(2)]),
            Ring::new(vec![n(3), n(4), n(5)]),
        ];
        let coords = generate_coordinates(&mol, &rings, &LayoutConfig::default()).unwrap();
        for i in 0..3 {
            for j in 3..6 {
                assert!(coords[i].distance(coords[j]) > 1.0, "fragments kept apart");
            }
        }
    }

    #[test]
    fn relax_and_orient_flags_are_honored() {
        let (mol, rings) = benzene();
        let config = LayoutConfig {
            relax: false,
            normalize_orientation: false,
            ..LayoutConfig::default()
        };
        let raw = generate_coordinates(&mol, &rings, &config).unwrap();
        // with both passes off the bare template orientation survives:
        // the flat-top hexagon keeps two atoms on the top edge
        let max_y = raw.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        let top = raw.iter().filter(|p| (p.y - max_y).abs() < 1e-9).count();
        assert_eq!(top, 2);
    }
}
