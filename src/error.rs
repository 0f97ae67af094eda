#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ring {ring} references vertex {vertex}, which is not in the graph")]
    UnknownRingVertex { ring: usize, vertex: usize },
    #[error("ring {ring} repeats vertex {vertex}")]
    DuplicateRingVertex { ring: usize, vertex: usize },
    #[error("ring {ring} has {len} vertices; a ring needs at least 3")]
    RingTooSmall { ring: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
