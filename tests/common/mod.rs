//! Shared graph builders for the integration tests. Molecules are
//! constructed directly since notation parsing lives outside this crate.

use petgraph::graph::NodeIndex;
use sketchcrab::{Atom, Bond, Hybridization, Mol, Ring};

pub fn n(i: usize) -> NodeIndex {
    NodeIndex::new(i)
}

pub fn mol_of_edges(atoms: usize, edges: &[(usize, usize)]) -> Mol<Atom, Bond> {
    let mut mol = Mol::new();
    for _ in 0..atoms {
        mol.add_atom(Atom::default());
    }
    for &(a, b) in edges {
        mol.add_bond(n(a), n(b), Bond::default());
    }
    mol
}

fn sp2_mol_of_edges(atoms: usize, edges: &[(usize, usize)]) -> Mol<Atom, Bond> {
    let mut mol = Mol::new();
    for _ in 0..atoms {
        mol.add_atom(Atom::new(Hybridization::SP2));
    }
    for &(a, b) in edges {
        mol.add_bond(n(a), n(b), Bond::default());
    }
    mol
}

fn cycle_edges(ids: &[usize]) -> Vec<(usize, usize)> {
    (0..ids.len())
        .map(|i| (ids[i], ids[(i + 1) % ids.len()]))
        .collect()
}

fn merge_edges(base: &mut Vec<(usize, usize)>, extra: Vec<(usize, usize)>) {
    for e in extra {
        let rev = (e.1, e.0);
        if !base.contains(&e) && !base.contains(&rev) {
            base.push(e);
        }
    }
}

pub fn chain_mol(len: usize) -> Mol<Atom, Bond> {
    let edges: Vec<(usize, usize)> = (1..len).map(|i| (i - 1, i)).collect();
    mol_of_edges(len, &edges)
}

pub fn ring_mol(size: usize) -> (Mol<Atom, Bond>, Vec<Ring>) {
    let ids: Vec<usize> = (0..size).collect();
    let mol = mol_of_edges(size, &cycle_edges(&ids));
    let rings = vec![Ring::new(ids.into_iter().map(n).collect())];
    (mol, rings)
}

pub fn benzene() -> (Mol<Atom, Bond>, Vec<Ring>) {
    let ids: Vec<usize> = (0..6).collect();
    let mol = sp2_mol_of_edges(6, &cycle_edges(&ids));
    let rings = vec![Ring::aromatic(ids.into_iter().map(n).collect())];
    (mol, rings)
}

pub fn naphthalene() -> (Mol<Atom, Bond>, Vec<Ring>) {
    let ring_a = [0, 1, 2, 3, 4, 5];
    let ring_b = [4, 5, 6, 7, 8, 9];
    let mut edges = cycle_edges(&ring_a);
    merge_edges(&mut edges, cycle_edges(&ring_b));
    let mol = sp2_mol_of_edges(10, &edges);
    let rings = vec![
        Ring::aromatic(ring_a.iter().map(|&i| n(i)).collect()),
        Ring::aromatic(ring_b.iter().map(|&i| n(i)).collect()),
    ];
    (mol, rings)
}

/// Three hexagons fused in a straight line through opposite edges of the
/// middle ring.
pub fn anthracene() -> (Mol<Atom, Bond>, Vec<Ring>) {
    let ring_a = [0, 1, 2, 3, 4, 5];
    let ring_b = [4, 5, 6, 7, 8, 9];
    let ring_c = [7, 8, 10, 11, 12, 13];
    let mut edges = cycle_edges(&ring_a);
    merge_edges(&mut edges, cycle_edges(&ring_b));
    merge_edges(&mut edges, cycle_edges(&ring_c));
    let mol = sp2_mol_of_edges(14, &edges);
    let rings = vec![
        Ring::aromatic(ring_a.iter().map(|&i| n(i)).collect()),
        Ring::aromatic(ring_b.iter().map(|&i| n(i)).collect()),
        Ring::aromatic(ring_c.iter().map(|&i| n(i)).collect()),
    ];
    (mol, rings)
}

pub fn toluene() -> (Mol<Atom, Bond>, Vec<Ring>) {
    let (mut mol, rings) = benzene();
    let methyl = mol.add_atom(Atom::default());
    mol.add_bond(n(0), methyl, Bond::default());
    (mol, rings)
}

pub fn spiro_nonane() -> (Mol<Atom, Bond>, Vec<Ring>) {
    let ring_a = [0, 1, 2, 3, 4];
    let ring_b = [0, 5, 6, 7, 8];
    let mut edges = cycle_edges(&ring_a);
    edges.extend(cycle_edges(&ring_b));
    let mol = mol_of_edges(9, &edges);
    let rings = vec![
        Ring::new(ring_a.iter().map(|&i| n(i)).collect()),
        Ring::new(ring_b.iter().map(|&i| n(i)).collect()),
    ];
    (mol, rings)
}
