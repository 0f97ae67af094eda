use std::f64::consts::{FRAC_PI_2, PI, TAU};

use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::geometry::{centroid, line_side, reflect_across, Point, Similarity};
use crate::rings::{Ring, RingSystem};

/// Regular-polygon coordinates for a single ring.
///
/// Circumradius is `L / (2 sin(pi/n))` so every polygon edge measures one
/// bond length. Odd rings present a vertex at the top, even rings a flat
/// top edge; vertices run counterclockwise from the ring's normalized
/// order, so the orientation depends only on the cycle itself, not on how
/// the caller happened to list it.
pub fn polygon_template(ring: &Ring, bond_length: f64) -> Vec<(NodeIndex, Point)> {
    let ring = ring.normalized();
    let n = ring.atoms.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![(ring.atoms[0], Point::ZERO)],
        _ => {}
    }
    let radius = bond_length / (2.0 * (PI / n as f64).sin());
    let start = if n % 2 == 1 {
        FRAC_PI_2
    } else {
        FRAC_PI_2 + PI / n as f64
    };
    ring.atoms
        .iter()
        .enumerate()
        .map(|(k, &atom)| {
            let angle = start + TAU * k as f64 / n as f64;
            (atom, Point::from_angle(angle) * radius)
        })
        .collect()
}

/// Lay out a whole ring system in its own frame.
///
/// The first ring of the fusion sequence takes its bare template; each
/// later ring is stitched onto atoms that already have coordinates: a
/// shared bond anchors a similarity transform of the ring's template, a
/// single shared atom anchors a spiro pivot. Atoms never move once
/// placed. Output is in the system's ascending atom order.
pub fn place_ring_system(
    system: &RingSystem,
    rings: &[Ring],
    bond_length: f64,
) -> Vec<(NodeIndex, Point)> {
    let members: Vec<Ring> = system
        .rings
        .iter()
        .map(|&ri| rings[ri].normalized())
        .collect();
    let mut pending = fusion_sequence(&members);
    let mut done = vec![false; members.len()];
    let mut placed: FxHashMap<NodeIndex, Point> = FxHashMap::default();

    while !pending.is_empty() {
        let pick = pending
            .iter()
            .position(|&ri| {
                placed.is_empty() || members[ri].atoms.iter().any(|a| placed.contains_key(a))
            })
            .unwrap_or(0);
        let ri = pending.remove(pick);
        place_member(&members[ri], &members, &done, &mut placed, bond_length);
        done[ri] = true;
    }

    system
        .atoms
        .iter()
        .map(|&a| (a, placed.get(&a).copied().unwrap_or(Point::ZERO)))
        .collect()
}

fn place_member(
    ring: &Ring,
    members: &[Ring],
    done: &[bool],
    placed: &mut FxHashMap<NodeIndex, Point>,
    bond_length: f64,
) {
    let template = polygon_template(ring, bond_length);
    let tpos: FxHashMap<NodeIndex, Point> = template.iter().copied().collect();
    let shared: Vec<NodeIndex> = ring
        .atoms
        .iter()
        .copied()
        .filter(|a| placed.contains_key(a))
        .collect();

    if shared.is_empty() {
        if placed.is_empty() {
            for (atom, p) in template {
                placed.insert(atom, p);
            }
        } else {
            // no anchor at all; drop the template clear of everything placed
            let max_x = sorted_points(placed)
                .into_iter()
                .fold(f64::MIN, |m, (_, p)| m.max(p.x));
            let min_tx = template
                .iter()
                .fold(f64::MAX, |m, &(_, p)| m.min(p.x));
            let dx = max_x - min_tx + bond_length;
            for (atom, p) in template {
                placed.insert(atom, Point::new(p.x + dx, p.y));
            }
        }
        return;
    }

    if let Some((a, b)) = bonded_shared_pair(ring, placed) {
        let (wa, wb) = (placed[&a], placed[&b]);
        let (ta, tb) = (tpos[&a], tpos[&b]);
        let sim = Similarity::from_pairs(ta, wa, tb, wb);
        let mapped: Vec<(NodeIndex, Point)> = template
            .iter()
            .map(|&(atom, p)| (atom, sim.apply(p)))
            .collect();
        let new_centroid = centroid(mapped.iter().map(|&(_, p)| p));
        let anchor = anchor_centroid(a, b, members, done, placed);
        let flip = line_side(new_centroid, wa, wb) * line_side(anchor, wa, wb) > 0.0;
        for (atom, p) in mapped {
            if placed.contains_key(&atom) {
                continue;
            }
            let p = if flip { reflect_across(p, wa, wb) } else { p };
            placed.insert(atom, p);
        }
    } else {
        // spiro pivot; also the fallback for bridges whose shared atoms
        // hold no bond
        let pivot = shared
            .iter()
            .copied()
            .min()
            .expect("shared is non-empty here");
        let world_pivot = placed[&pivot];
        let t_pivot = tpos[&pivot];
        let t_centroid = centroid(template.iter().map(|&(_, p)| p));
        let system_centroid = placed_centroid(placed);
        let away = (world_pivot - system_centroid).normalized_or(Point::new(1.0, 0.0));
        let ring_dir = (t_centroid - t_pivot).normalized_or(Point::new(1.0, 0.0));
        let rot = Similarity::rotation_about(t_pivot, away.angle() - ring_dir.angle());
        let shift = world_pivot - t_pivot;
        for &(atom, p) in &template {
            if placed.contains_key(&atom) {
                continue;
            }
            placed.insert(atom, rot.apply(p) + shift);
        }
    }
}

/// First pair of cyclically adjacent ring atoms that both have world
/// coordinates. Adjacent ring atoms are bonded by construction of the
/// ring input.
fn bonded_shared_pair(
    ring: &Ring,
    placed: &FxHashMap<NodeIndex, Point>,
) -> Option<(NodeIndex, NodeIndex)> {
    let len = ring.atoms.len();
    (0..len).find_map(|i| {
        let a = ring.atoms[i];
        let b = ring.atoms[(i + 1) % len];
        (placed.contains_key(&a) && placed.contains_key(&b)).then_some((a, b))
    })
}

/// Centroid of the placed ring the new ring fuses onto, so the new ring
/// can land on the far side of the shared edge. Falls back to the whole
/// placed set when no single finished ring holds both atoms.
fn anchor_centroid(
    a: NodeIndex,
    b: NodeIndex,
    members: &[Ring],
    done: &[bool],
    placed: &FxHashMap<NodeIndex, Point>,
) -> Point {
    for (ri, ring) in members.iter().enumerate() {
        if done[ri] && ring.contains(a) && ring.contains(b) {
            return centroid(ring.atoms.iter().filter_map(|x| placed.get(x).copied()));
        }
    }
    placed_centroid(placed)
}

fn sorted_points(placed: &FxHashMap<NodeIndex, Point>) -> Vec<(NodeIndex, Point)> {
    let mut out: Vec<(NodeIndex, Point)> = placed.iter().map(|(&a, &p)| (a, p)).collect();
    out.sort_unstable_by_key(|&(a, _)| a);
    out
}

fn placed_centroid(placed: &FxHashMap<NodeIndex, Point>) -> Point {
    centroid(sorted_points(placed).into_iter().map(|(_, p)| p))
}

/// Order member rings so the longest run of bond-fused rings comes
/// first, remaining rings appended in index order. Small systems get an
/// exact longest-path search; oversized ones a greedy walk.
fn fusion_sequence(members: &[Ring]) -> Vec<usize> {
    let n = members.len();
    if n <= 1 {
        return (0..n).collect();
    }
    let sets: Vec<FxHashSet<NodeIndex>> = members
        .iter()
        .map(|r| r.atoms.iter().copied().collect())
        .collect();
    let mut fused = vec![vec![false; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let shared = members[i]
                .atoms
                .iter()
                .filter(|a| sets[j].contains(a))
                .count();
            if shared >= 2 {
                fused[i][j] = true;
                fused[j][i] = true;
            }
        }
    }

    let chain = if n <= 8 {
        longest_fused_path(&fused)
    } else {
        greedy_fused_path(&fused)
    };

    let in_chain: FxHashSet<usize> = chain.iter().copied().collect();
    let mut seq = chain;
    for ri in 0..n {
        if !in_chain.contains(&ri) {
            seq.push(ri);
        }
    }
    seq
}

fn longest_fused_path(fused: &[Vec<bool>]) -> Vec<usize> {
    let n = fused.len();
    let mut best: Vec<usize> = vec![0];
    let mut path = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    for start in 0..n {
        path.push(start);
        visited[start] = true;
        extend_path(fused, &mut path, &mut visited, &mut best);
        visited[start] = false;
        path.pop();
    }
    best
}

fn extend_path(
    fused: &[Vec<bool>],
    path: &mut Vec<usize>,
    visited: &mut Vec<bool>,
    best: &mut Vec<usize>,
) {
    if path.len() > best.len() {
        *best = path.clone();
    }
    let last = *path.last().expect("path starts non-empty");
    for next in 0..fused.len() {
        if fused[last][next] && !visited[next] {
            visited[next] = true;
            path.push(next);
            extend_path(fused, path, visited, best);
            path.pop();
            visited[next] = false;
        }
    }
}

fn greedy_fused_path(fused: &[Vec<bool>]) -> Vec<usize> {
    let n = fused.len();
    let degree = |i: usize| fused[i].iter().filter(|&&f| f).count();
    let start = (0..n)
        .min_by_key(|&i| (degree(i), i))
        .expect("at least one ring");
    let mut visited = vec![false; n];
    visited[start] = true;
    let mut path = vec![start];
    loop {
        let last = *path.last().expect("path is non-empty");
        let next = (0..n).find(|&j| fused[last][j] && !visited[j]);
        match next {
            Some(j) => {
                visited[j] = true;
                path.push(j);
            }
            None => break,
        }
    }
    path
}
