use std::cmp::Reverse;
use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::mol::Mol;
use crate::rings::RingSystem;

/// What a placement unit is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Index into the classified ring-system list.
    RingSystem(usize),
    /// An acyclic path of degree-2-or-less non-ring atoms.
    Chain,
    /// A lone atom: degree 0, a branch point, or a one-atom substituent.
    SingleAtom,
}

/// A group of atoms moved as one piece during placement.
#[derive(Debug, Clone)]
pub struct RigidUnit {
    pub kind: UnitKind,
    /// Atom ids; chains keep path order, other kinds ascending order.
    pub atoms: Vec<NodeIndex>,
    /// Arena index of the parent unit; `None` for fragment roots.
    pub parent: Option<usize>,
    /// Connecting bond as (parent-side atom, child-side atom).
    pub parent_bond: Option<(NodeIndex, NodeIndex)>,
    pub children: Vec<usize>,
}

impl RigidUnit {
    pub fn is_ring_system(&self) -> bool {
        matches!(self.kind, UnitKind::RingSystem(_))
    }

    pub fn min_atom(&self) -> NodeIndex {
        self.atoms
            .iter()
            .copied()
            .min()
            .expect("a unit always holds at least one atom")
    }

    /// Root-selection score: ring systems outrank chains and atoms,
    /// bigger units outrank smaller ones.
    pub fn priority(&self) -> usize {
        let base = if self.is_ring_system() { 1000 } else { 0 };
        base + self.atoms.len()
    }
}

/// The rigid-unit arena plus its breadth-first placement order.
#[derive(Debug, Clone, Default)]
pub struct PlacementGraph {
    pub units: Vec<RigidUnit>,
    /// One root per connected component; the first is the global root.
    pub roots: Vec<usize>,
    /// Placement order; a parent always precedes its children.
    pub order: Vec<usize>,
    unit_of: Vec<usize>,
}

impl PlacementGraph {
    pub fn unit_of(&self, atom: NodeIndex) -> usize {
        self.unit_of[atom.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Partition the molecule into rigid units and order them for placement.
///
/// Ring systems come from the classifier; leftover atoms become chains
/// (maximal degree-2 runs, stored in path order from the lower-indexed
/// endpoint) or single atoms. The tree is a breadth-first forest rooted
/// at the highest-priority unit, expanding ring systems before chains,
/// larger units before smaller, lowest minimum atom id last. An empty
/// molecule yields an empty graph.
pub fn build_placement_graph<A, B>(mol: &Mol<A, B>, systems: &[RingSystem]) -> PlacementGraph {
    let n = mol.atom_count();
    if n == 0 {
        return PlacementGraph::default();
    }

    let mut units: Vec<RigidUnit> = Vec::new();
    let mut unit_of = vec![usize::MAX; n];

    for (si, system) in systems.iter().enumerate() {
        let ui = units.len();
        for &atom in &system.atoms {
            unit_of[atom.index()] = ui;
        }
        units.push(RigidUnit {
            kind: UnitKind::RingSystem(si),
            atoms: system.atoms.clone(),
            parent: None,
            parent_bond: None,
            children: Vec::new(),
        });
    }

    let in_ring: Vec<bool> = unit_of.iter().map(|&u| u != usize::MAX).collect();

    for idx in 0..n {
        if unit_of[idx] != usize::MAX {
            continue;
        }
        let atom = NodeIndex::new(idx);
        let degree = mol.degree(atom);
        let ui = units.len();
        if degree >= 1 && degree <= 2 {
            let path = collect_chain(mol, atom, &in_ring);
            for &a in &path {
                unit_of[a.index()] = ui;
            }
            let kind = if path.len() == 1 {
                UnitKind::SingleAtom
            } else {
                UnitKind::Chain
            };
            units.push(RigidUnit {
                kind,
                atoms: path,
                parent: None,
                parent_bond: None,
                children: Vec::new(),
            });
        } else {
            unit_of[idx] = ui;
            units.push(RigidUnit {
                kind: UnitKind::SingleAtom,
                atoms: vec![atom],
                parent: None,
                parent_bond: None,
                children: Vec::new(),
            });
        }
    }

    // one connecting bond per adjacent unit pair, lowest endpoints winning
    let mut connecting: FxHashMap<(usize, usize), (NodeIndex, NodeIndex)> = FxHashMap::default();
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let (ua, ub) = (unit_of[a.index()], unit_of[b.index()]);
        if ua == ub {
            continue;
        }
        let key = (ua.min(ub), ua.max(ub));
        let canon = if a < b { (a, b) } else { (b, a) };
        connecting
            .entry(key)
            .and_modify(|existing| {
                if canon < *existing {
                    *existing = canon;
                }
            })
            .or_insert(canon);
    }
    let mut pairs: Vec<((usize, usize), (NodeIndex, NodeIndex))> =
        connecting.into_iter().collect();
    pairs.sort_unstable();

    let mut adj: Vec<Vec<(usize, (NodeIndex, NodeIndex))>> = vec![Vec::new(); units.len()];
    for ((ua, ub), bond) in pairs {
        adj[ua].push((ub, bond));
        adj[ub].push((ua, bond));
    }
    for list in &mut adj {
        list.sort_by_key(|&(u, _)| {
            (
                !units[u].is_ring_system(),
                Reverse(units[u].atoms.len()),
                units[u].min_atom().index(),
            )
        });
    }

    let mut visited = vec![false; units.len()];
    let mut roots = Vec::new();
    let mut order = Vec::new();
    while let Some(root) = (0..units.len())
        .filter(|&u| !visited[u])
        .max_by_key(|&u| (units[u].priority(), Reverse(units[u].min_atom().index())))
    {
        visited[root] = true;
        roots.push(root);
        order.push(root);
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for i in 0..adj[current].len() {
                let (next, bond) = adj[current][i];
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                let (pa, ca) = if unit_of[bond.0.index()] == current {
                    (bond.0, bond.1)
                } else {
                    (bond.1, bond.0)
                };
                units[next].parent = Some(current);
                units[next].parent_bond = Some((pa, ca));
                units[current].children.push(next);
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    PlacementGraph {
        units,
        roots,
        order,
        unit_of,
    }
}

/// Maximal run of connected non-ring, degree-2-or-less atoms containing
/// `start`, returned in path order from the lower-indexed endpoint. A
/// cycle of such atoms cannot occur when the input ring list is complete;
/// if one does arrive the run is cut at its lowest atom instead.
fn collect_chain<A, B>(mol: &Mol<A, B>, start: NodeIndex, in_ring: &[bool]) -> Vec<NodeIndex> {
    let eligible =
        |a: NodeIndex| -> bool { !in_ring[a.index()] && mol.degree(a) >= 1 && mol.degree(a) <= 2 };

    let mut members: FxHashSet<NodeIndex> = FxHashSet::default();
    members.insert(start);
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        for nb in mol.neighbors_sorted(current) {
            if eligible(nb) && members.insert(nb) {
                stack.push(nb);
            }
        }
    }

    let mut sorted: Vec<NodeIndex> = members.iter().copied().collect();
    sorted.sort_unstable();
    let first = sorted
        .iter()
        .copied()
        .filter(|&a| {
            mol.neighbors_sorted(a)
                .into_iter()
                .filter(|nb| members.contains(nb))
                .count()
                <= 1
        })
        .min()
        .unwrap_or(sorted[0]);

    let mut path = vec![first];
    let mut placed: FxHashSet<NodeIndex> = FxHashSet::default();
    placed.insert(first);
    let mut current = first;
    loop {
        let next = mol
            .neighbors_sorted(current)
            .into_iter()
            .find(|nb| members.contains(nb) && !placed.contains(nb));
        match next {
            Some(nb) => {
                placed.insert(nb);
                path.push(nb);
                current = nb;
            }
            None => break,
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::classify_ring_systems;
    use crate::tests::fixtures::{benzene, biphenyl, chain_mol, mol_of_edges, n, toluene};

    #[test]
    fn empty_molecule_empty_graph() {
        let mol = crate::mol::Mol::<crate::atom::Atom, crate::bond::Bond>::new();
        let graph = build_placement_graph(&mol, &[]);
        assert!(graph.is_empty());
        assert!(graph.order.is_empty());
        assert!(graph.roots.is_empty());
    }

    #[test]
    fn lone_ring_is_single_root_unit() {
        let (mol, rings) = benzene();
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        assert_eq!(graph.units.len(), 1);
        assert_eq!(graph.roots, vec![0]);
        assert!(graph.units[0].is_ring_system());
        assert_eq!(graph.units[0].parent, None);
    }

    #[test]
    fn toluene_ring_parents_methyl() {
        let (mol, rings) = toluene();
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        assert_eq!(graph.units.len(), 2);
        let root = graph.roots[0];
        assert!(graph.units[root].is_ring_system());
        let child = graph.units[root].children[0];
        assert_eq!(graph.units[child].kind, UnitKind::SingleAtom);
        assert_eq!(graph.units[child].parent, Some(root));
        let (pa, ca) = graph.units[child].parent_bond.unwrap();
        assert!(graph.units[root].atoms.contains(&pa));
        assert_eq!(graph.units[child].atoms, vec![ca]);
    }

    #[test]
    fn chain_atoms_in_path_order() {
        // path 0-3-1-4-2 built out of index order
        let mol = mol_of_edges(5, &[(0, 3), (3, 1), (1, 4), (4, 2)]);
        let graph = build_placement_graph(&mol, &[]);
        assert_eq!(graph.units.len(), 1);
        assert_eq!(graph.units[0].kind, UnitKind::Chain);
        assert_eq!(
            graph.units[0].atoms,
            vec![n(0), n(3), n(1), n(4), n(2)],
            "path order from the lower-indexed endpoint"
        );
    }

    #[test]
    fn branch_point_becomes_single_atom_unit() {
        // neopentane-like star: center 0 bonded to 1..=4
        let mol = mol_of_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let graph = build_placement_graph(&mol, &[]);
        let center = graph.unit_of(n(0));
        assert_eq!(graph.units[center].kind, UnitKind::SingleAtom);
        // the center is the biggest-priority tie loser: all units have one
        // atom, so the root is the unit with the lowest atom id: the center
        assert_eq!(graph.roots, vec![center]);
        assert_eq!(graph.units[center].children.len(), 4);
    }

    #[test]
    fn ring_outranks_longer_chain_for_root() {
        // cyclopropane with a 5-atom tail: ring must be root
        let mol = mol_of_edges(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 6),
                (6, 7),
            ],
        );
        let rings = vec![crate::rings::Ring::new(vec![n(0), n(1), n(2)])];
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        let root = graph.roots[0];
        assert!(graph.units[root].is_ring_system());
    }

    #[test]
    fn biphenyl_tie_breaks_to_lower_min_atom() {
        let (mol, rings) = biphenyl();
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        assert_eq!(graph.units.len(), 2);
        let root = graph.roots[0];
        assert_eq!(graph.units[root].min_atom(), n(0));
        let child = graph.units[root].children[0];
        assert!(graph.units[child].is_ring_system());
        assert_eq!(graph.units[child].parent, Some(root));
    }

    #[test]
    fn disconnected_molecule_gets_one_root_per_fragment() {
        let mol = mol_of_edges(5, &[(0, 1), (2, 3)]);
        let graph = build_placement_graph(&mol, &[]);
        assert_eq!(graph.roots.len(), 3);
        let total: usize = graph.units.iter().map(|u| u.atoms.len()).sum();
        assert_eq!(total, 5);
        assert_eq!(graph.order.len(), graph.units.len());
    }

    #[test]
    fn order_lists_parent_before_children() {
        let (mol, rings) = toluene();
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        for (pos, &ui) in graph.order.iter().enumerate() {
            if let Some(parent) = graph.units[ui].parent {
                let parent_pos = graph.order.iter().position(|&u| u == parent).unwrap();
                assert!(parent_pos < pos);
            }
        }
    }

    #[test]
    fn every_atom_owned_by_exactly_one_unit() {
        let (mol, rings) = toluene();
        let systems = classify_ring_systems(&rings);
        let graph = build_placement_graph(&mol, &systems);
        let mut seen = vec![0usize; mol.atom_count()];
        for unit in &graph.units {
            for &a in &unit.atoms {
                seen[a.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn long_chain_is_one_unit() {
        let mol = chain_mol(6);
        let graph = build_placement_graph(&mol, &[]);
        assert_eq!(graph.units.len(), 1);
        assert_eq!(graph.units[0].kind, UnitKind::Chain);
        assert_eq!(graph.units[0].atoms.len(), 6);
    }
}
