//! Flat bootstrap chunk generator.
//!
//! Used when no region file is configured or readable, so a fresh server is
//! immediately playable:
//! - Y = -64: bedrock
//! - Y = -63..=61: stone
//! - Y = 62..=63: dirt
//! - Y = 64: grass block
//! - above: air

use crate::block_state::{BlockKind, BlockState};
use crate::catalog::Catalog;
use crate::chunk::Chunk;

/// Top of the generated terrain.
pub const FLAT_SURFACE_Y: i32 = 64;
/// Sections per generated chunk (world floor -64, ceiling 319).
pub const FLAT_SECTION_COUNT: usize = 24;
/// Lowest section index.
pub const FLAT_MIN_SECTION_Y: i32 = -4;

/// Generate a flat chunk column at the given chunk coordinates.
pub fn generate_flat_chunk(x: i32, z: i32, catalog: &Catalog) -> Chunk {
    let bedrock = catalog.id_from_state(&BlockState::Bedrock);
    let stone = catalog.id_from_state(&BlockState::Stone);
    let dirt = catalog.id_from_state(&BlockState::Dirt);
    let grass = catalog.default_id(BlockKind::GrassBlock);

    let mut chunk = Chunk::new(x, z, FLAT_MIN_SECTION_Y, FLAT_SECTION_COUNT);
    for bx in 0..16 {
        for bz in 0..16 {
            chunk.change_block(bx, -64, bz, bedrock);
            for y in -63..=61 {
                chunk.change_block(bx, y, bz, stone);
            }
            chunk.change_block(bx, 62, bz, dirt);
            chunk.change_block(bx, 63, bz, dirt);
            chunk.change_block(bx, FLAT_SURFACE_Y, bz, grass);
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn flat_chunk_layer_layout() {
        let catalog = Catalog::new();
        let chunk = generate_flat_chunk(0, 0, &catalog);

        let bedrock = catalog.id_from_state(&BlockState::Bedrock);
        let stone = catalog.id_from_state(&BlockState::Stone);
        let dirt = catalog.id_from_state(&BlockState::Dirt);
        let grass = catalog.default_id(BlockKind::GrassBlock);

        assert_eq!(chunk.get_block(0, -64, 0), Some(bedrock));
        assert_eq!(chunk.get_block(0, -63, 0), Some(stone));
        assert_eq!(chunk.get_block(0, 61, 0), Some(stone));
        assert_eq!(chunk.get_block(0, 62, 0), Some(dirt));
        assert_eq!(chunk.get_block(0, 63, 0), Some(dirt));
        assert_eq!(chunk.get_block(0, 64, 0), Some(grass));
        assert_eq!(chunk.get_block(0, 65, 0), Some(0));
        assert_eq!(chunk.get_block(0, 319, 0), Some(0));
    }

    #[test]
    fn uniform_across_xz() {
        let catalog = Catalog::new();
        let chunk = generate_flat_chunk(5, -3, &catalog);
        let grass = catalog.default_id(BlockKind::GrassBlock);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(chunk.get_block(x, FLAT_SURFACE_Y, z), Some(grass));
                assert_eq!(chunk.get_block(x, FLAT_SURFACE_Y + 1, z), Some(0));
            }
        }
    }

    #[test]
    fn upper_sections_stay_uniform() {
        let catalog = Catalog::new();
        let chunk = generate_flat_chunk(0, 0, &catalog);
        // Sections above the surface never grew a palette.
        for section in &chunk.sections[9..] {
            assert_eq!(section.bits_per_block(), 0);
        }
    }
}
