use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

use crate::mol::Mol;

/// An externally produced minimal ring: an ordered atom cycle plus its
/// aromaticity flag. The layout engine treats rings as read-only input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<NodeIndex>,
    pub is_aromatic: bool,
}

impl Ring {
    pub fn new(atoms: Vec<NodeIndex>) -> Self {
        Self {
            atoms,
            is_aromatic: false,
        }
    }

    pub fn aromatic(atoms: Vec<NodeIndex>) -> Self {
        Self {
            atoms,
            is_aromatic: true,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    /// Canonical cyclic order: rotated so the lowest atom id comes first,
    /// reversed if needed so the second atom is the smaller of the first
    /// atom's two ring neighbors. Two rings describing the same cycle
    /// normalize identically regardless of input rotation or direction.
    pub fn normalized(&self) -> Ring {
        let len = self.atoms.len();
        if len == 0 {
            return self.clone();
        }
        let min_pos = self
            .atoms
            .iter()
            .enumerate()
            .min_by_key(|&(_, idx)| idx)
            .map(|(i, _)| i)
            .expect("ring is non-empty");

        let mut atoms = Vec::with_capacity(len);
        for i in 0..len {
            atoms.push(self.atoms[(min_pos + i) % len]);
        }
        if len > 2 && atoms[1] > atoms[len - 1] {
            atoms[1..].reverse();
        }
        Ring {
            atoms,
            is_aromatic: self.is_aromatic,
        }
    }
}

/// Topology of a ring system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingSystemKind {
    /// A single ring sharing no atoms with any other ring.
    Isolated,
    /// At least one ring pair shares a bond.
    Fused,
    /// Every sharing pair shares exactly one atom.
    Spiro,
    /// The ring-overlap graph itself contains a cycle.
    Bridged,
    /// A single ring joined to another ring system by a bond rather than
    /// a shared atom. The systems stay separate.
    Connected,
}

/// A maximal connected group of rings sharing atoms.
#[derive(Debug, Clone)]
pub struct RingSystem {
    /// Indices into the input ring list, ascending.
    pub rings: Vec<usize>,
    /// Aggregate atom set, ascending and deduplicated.
    pub atoms: Vec<NodeIndex>,
    pub kind: RingSystemKind,
}

impl RingSystem {
    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.atoms.binary_search(&atom).is_ok()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

/// Group rings into connected ring systems and tag each system's
/// topology. Pure classification: the molecule itself is not consulted.
///
/// Two rings belong to the same system when they share at least one atom.
/// Within a system, a cycle in the sharing graph means `Bridged`, any
/// pair sharing a bond means `Fused`, otherwise `Spiro`; a lone ring is
/// `Isolated`.
pub fn classify_ring_systems(rings: &[Ring]) -> Vec<RingSystem> {
    let n = rings.len();
    if n == 0 {
        return Vec::new();
    }

    let sets: Vec<FxHashSet<NodeIndex>> = rings
        .iter()
        .map(|r| r.atoms.iter().copied().collect())
        .collect();

    // shared[i][j] = number of atoms rings i and j have in common
    let mut shared = vec![vec![0usize; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let count = rings[i]
                .atoms
                .iter()
                .filter(|a| sets[j].contains(a))
                .count();
            shared[i][j] = count;
            shared[j][i] = count;
        }
    }

    let mut assigned = vec![false; n];
    let mut systems = Vec::new();
    for start in 0..n {
        if assigned[start] {
            continue;
        }
        let mut component = vec![start];
        assigned[start] = true;
        let mut cursor = 0;
        while cursor < component.len() {
            let current = component[cursor];
            cursor += 1;
            for next in 0..n {
                if !assigned[next] && shared[current][next] > 0 {
                    assigned[next] = true;
                    component.push(next);
                }
            }
        }
        component.sort_unstable();

        let kind = component_kind(&component, &shared);
        let mut atoms: Vec<NodeIndex> = component
            .iter()
            .flat_map(|&ri| rings[ri].atoms.iter().copied())
            .collect();
        atoms.sort_unstable();
        atoms.dedup();

        systems.push(RingSystem {
            rings: component,
            atoms,
            kind,
        });
    }
    systems
}

fn component_kind(component: &[usize], shared: &[Vec<usize>]) -> RingSystemKind {
    if component.len() == 1 {
        return RingSystemKind::Isolated;
    }
    let mut pairs = 0usize;
    let mut max_shared = 0usize;
    for (i, &ri) in component.iter().enumerate() {
        for &rj in &component[i + 1..] {
            if shared[ri][rj] > 0 {
                pairs += 1;
                max_shared = max_shared.max(shared[ri][rj]);
            }
        }
    }
    // a connected sharing graph with as many edges as vertices has a cycle
    if pairs >= component.len() {
        RingSystemKind::Bridged
    } else if max_shared >= 2 {
        RingSystemKind::Fused
    } else {
        RingSystemKind::Spiro
    }
}

/// Retag otherwise-isolated systems that are joined to another ring
/// system by a molecule bond. Multi-ring systems keep their internal
/// topology tag.
pub fn mark_connected_systems<A, B>(mol: &Mol<A, B>, systems: &mut [RingSystem]) {
    let n = mol.atom_count();
    let mut system_of: Vec<Option<usize>> = vec![None; n];
    for (si, system) in systems.iter().enumerate() {
        for &atom in &system.atoms {
            system_of[atom.index()] = Some(si);
        }
    }

    let mut linked = vec![false; systems.len()];
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        match (system_of[a.index()], system_of[b.index()]) {
            (Some(sa), Some(sb)) if sa != sb => {
                linked[sa] = true;
                linked[sb] = true;
            }
            _ => {}
        }
    }
    for (system, is_linked) in systems.iter_mut().zip(linked) {
        if is_linked && system.kind == RingSystemKind::Isolated {
            system.kind = RingSystemKind::Connected;
        }
    }
}
