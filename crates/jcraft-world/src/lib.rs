//! World data: the block-state catalog, paletted chunk storage, region-file
//! loading, bootstrap generation, and block-tick scheduling.

pub mod block_state;
pub mod block_tick;
pub mod catalog;
pub mod chunk;
pub mod error;
pub mod flat;
pub mod heightmap;
pub mod region;
pub mod section;

pub use block_state::{BlockKind, BlockState};
pub use catalog::{catalog, Catalog};
pub use chunk::{Chunk, GenerationStatus};
pub use error::WorldError;
pub use section::ChunkSection;
