//! Deterministic 2D coordinate generation for molecular graphs.
//!
//! Given an annotated molecular graph (atoms with hybridization classes,
//! bonds with orders, an externally computed minimal ring list), the
//! engine produces overlap-free 2D coordinates with uniform bond
//! lengths, canonical ring shapes, and a reproducible orientation. The
//! same graph always yields bit-identical coordinates, regardless of how
//! its atoms were numbered when the caller built it.
//!
//! The pipeline classifies rings into systems, partitions the molecule
//! into rigid units, renders ring systems from regular-polygon
//! templates, attaches substituent chains with hybridization-aware
//! angles, optionally relaxes residual collisions, and rotates the
//! result onto its principal axis. Parsing chemical notations,
//! extracting the ring basis, and rendering pictures are all left to the
//! surrounding toolkit; this crate is the geometry in the middle.

pub mod atom;
pub mod bond;
pub mod config;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mol;
pub mod orient;
pub mod relax;
pub mod rings;
pub mod substituents;
pub mod templates;
pub mod traits;
pub mod units;

pub use atom::{Atom, Hybridization};
pub use bond::{Bond, BondOrder};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use geometry::Point;
pub use layout::generate_coordinates;
pub use mol::Mol;
pub use rings::{
    classify_ring_systems, mark_connected_systems, Ring, RingSystem, RingSystemKind,
};
pub use traits::{HasBondOrder, HasHybridization};
pub use units::{build_placement_graph, PlacementGraph, RigidUnit, UnitKind};
