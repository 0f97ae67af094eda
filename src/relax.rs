use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::config::LayoutConfig;
use crate::geometry::{normalize_angle, Point};
use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasHybridization};

const BOND_STIFFNESS: f64 = 1.0;
const REPULSION_STIFFNESS: f64 = 1.5;
const ANGLE_STIFFNESS: f64 = 0.08;
const TIME_STEP: f64 = 0.25;
const VELOCITY_DAMPING: f64 = 0.6;
/// Ring atoms respond to forces, but barely.
const RING_DAMPING: f64 = 0.05;
const REPROJECT_EVERY: usize = 16;
/// Trigonal spacing; the preferred smaller gap at a 2-neighbor center.
const BENT_IDEAL: f64 = 2.0 * PI / 3.0;

struct Spring {
    a: usize,
    b: usize,
    target: f64,
    /// Ring bonds are never re-projected; their geometry is canonical.
    rigid: bool,
}

/// Iterative constrained refinement of a finished placement.
///
/// Bond springs, short-range repulsion between non-bonded atoms, and a
/// weak angular bias run for a bounded number of damped time steps, with
/// the exact lengths of acyclic bonds re-projected periodically so
/// numerical drift cannot accumulate. Topology and ring classification
/// are never touched; ring atoms move under heavy damping only.
pub fn relax<A, B>(
    mol: &Mol<A, B>,
    in_ring: &[bool],
    ring_bond: &[bool],
    coords: &mut [Point],
    config: &LayoutConfig,
) where
    A: HasHybridization,
    B: HasBondOrder,
{
    let n = coords.len();
    if n < 2 || config.max_relax_iterations == 0 {
        return;
    }

    let springs: Vec<Spring> = mol
        .bonds()
        .filter_map(|e| {
            let (a, b) = mol.bond_endpoints(e)?;
            let rigid = ring_bond[e.index()];
            let factor = if rigid {
                1.0
            } else {
                mol.bond(e).bond_order().length_factor()
            };
            Some(Spring {
                a: a.index(),
                b: b.index(),
                target: config.bond_length * factor,
                rigid,
            })
        })
        .collect();

    let mut bonded = vec![false; n * n];
    for s in &springs {
        bonded[s.a * n + s.b] = true;
        bonded[s.b * n + s.a] = true;
    }

    let depth = bfs_depths(mol, n);

    let mut velocity = vec![Point::ZERO; n];
    let mut force = vec![Point::ZERO; n];
    for iteration in 0..config.max_relax_iterations {
        for f in force.iter_mut() {
            *f = Point::ZERO;
        }

        for s in &springs {
            let delta = coords[s.b] - coords[s.a];
            let dir = delta.normalized_or(Point::new(1.0, 0.0));
            let pull = (delta.norm() - s.target) * BOND_STIFFNESS;
            force[s.a] += dir * pull;
            force[s.b] -= dir * pull;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if bonded[i * n + j] {
                    continue;
                }
                let delta = coords[j] - coords[i];
                let dist = delta.norm();
                if dist >= config.min_separation {
                    continue;
                }
                let dir = delta.normalized_or(Point::new(1.0, 0.0));
                let push = (config.min_separation - dist) * REPULSION_STIFFNESS;
                force[i] -= dir * push;
                force[j] += dir * push;
            }
        }

        angular_bias(mol, in_ring, coords, &mut force);

        for i in 0..n {
            let responded = if in_ring[i] {
                force[i] * RING_DAMPING
            } else {
                force[i]
            };
            velocity[i] = (velocity[i] + responded * TIME_STEP) * VELOCITY_DAMPING;
            coords[i] += velocity[i] * TIME_STEP;
        }

        if (iteration + 1) % REPROJECT_EVERY == 0 {
            reproject(&springs, &depth, coords);
        }
    }
    reproject(&springs, &depth, coords);
}

/// Nudge each vertex's neighbor fan toward its ideal angular spacing.
/// Forces land on non-ring neighbors only; canonical ring interiors are
/// left to the templates that drew them.
fn angular_bias<A, B>(mol: &Mol<A, B>, in_ring: &[bool], coords: &[Point], force: &mut [Point])
where
    A: HasHybridization,
{
    for v in mol.atoms() {
        let neighbors = mol.neighbors_sorted(v);
        if neighbors.len() < 2 {
            continue;
        }
        let origin = coords[v.index()];
        let linear = mol.atom(v).hybridization().is_linear();

        let mut around: Vec<(f64, usize)> = neighbors
            .iter()
            .map(|nb| {
                let dir = (coords[nb.index()] - origin).normalized_or(Point::new(1.0, 0.0));
                (normalize_angle(dir.angle()), nb.index())
            })
            .collect();
        around.sort_by(|x, y| {
            x.0.partial_cmp(&y.0)
                .expect("angles are finite")
                .then(x.1.cmp(&y.1))
        });

        let count = around.len();
        for k in 0..count {
            let (a_ang, a_idx) = around[k];
            let (b_ang, b_idx) = around[(k + 1) % count];
            let mut gap = b_ang - a_ang;
            if k + 1 == count {
                gap += TAU;
            }
            let ideal = ideal_gap(linear, count, gap);
            let diff = gap - ideal;
            if diff.abs() < f64::EPSILON {
                continue;
            }
            let magnitude = ANGLE_STIFFNESS * diff;
            if !in_ring[a_idx] {
                let tangent = (coords[a_idx] - origin)
                    .normalized_or(Point::new(1.0, 0.0))
                    .rotated(FRAC_PI_2);
                force[a_idx] += tangent * magnitude;
            }
            if !in_ring[b_idx] {
                let tangent = (coords[b_idx] - origin)
                    .normalized_or(Point::new(1.0, 0.0))
                    .rotated(FRAC_PI_2);
                force[b_idx] -= tangent * magnitude;
            }
        }
    }
}

/// Ideal angular gap between two consecutive neighbors of a center with
/// `count` neighbors. A bent 2-neighbor center prefers 120/240; linear
/// centers and fans of 3+ split the circle evenly.
fn ideal_gap(linear: bool, count: usize, gap: f64) -> f64 {
    if count == 2 {
        if linear {
            PI
        } else if gap <= PI {
            BENT_IDEAL
        } else {
            TAU - BENT_IDEAL
        }
    } else {
        TAU / count as f64
    }
}

/// Snap acyclic bonds back to their exact target lengths, moving the
/// endpoint breadth-first farther from its fragment's lowest atom.
fn reproject(springs: &[Spring], depth: &[usize], coords: &mut [Point]) {
    for s in springs {
        if s.rigid {
            continue;
        }
        let (anchor, moved) = if (depth[s.a], s.a) <= (depth[s.b], s.b) {
            (s.a, s.b)
        } else {
            (s.b, s.a)
        };
        let dir = (coords[moved] - coords[anchor]).normalized_or(Point::new(1.0, 0.0));
        coords[moved] = coords[anchor] + dir * s.target;
    }
}

fn bfs_depths<A, B>(mol: &Mol<A, B>, n: usize) -> Vec<usize> {
    let mut depth = vec![usize::MAX; n];
    for start in 0..n {
        if depth[start] != usize::MAX {
            continue;
        }
        depth[start] = 0;
        let mut queue = VecDeque::from([petgraph::graph::NodeIndex::new(start)]);
        while let Some(current) = queue.pop_front() {
            let d = depth[current.index()];
            for nb in mol.neighbors_sorted(current) {
                if depth[nb.index()] == usize::MAX {
                    depth[nb.index()] = d + 1;
                    queue.push_back(nb);
                }
            }
        }
    }
    depth
}
