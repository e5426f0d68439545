//! The block-state catalog: three read-only tables built once at startup.
//!
//! The tables mirror what the offline generator derives from the vendor's
//! `reports/blocks.json` and `reports/registries.json`: a linear state-id
//! space partitioned into contiguous per-kind ranges (each with a default
//! state), and an item-id → block-kind mapping. Enumeration order inside a
//! kind follows the report convention: the first-declared property varies
//! slowest, bools enumerate `true` before `false`, ints ascend, enums keep
//! declaration order.

use std::sync::OnceLock;

use crate::block_state::{Axis, BlockKind, BlockState, Facing, Half, SlabType, StairShape};

/// The global state id for air.
pub const AIR_ID: u16 = 0;

/// Per-kind slice of the linear id space.
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub start: u16,
    pub end: u16,
    pub default: u16,
}

/// Immutable block-state tables.
pub struct Catalog {
    states: Vec<BlockState>,
    info: Vec<KindInfo>,
    item_blocks: Vec<Option<BlockKind>>,
}

/// The process-wide catalog.
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::new)
}

#[derive(Default)]
struct Builder {
    states: Vec<BlockState>,
    info: Vec<KindInfo>,
}

impl Builder {
    fn single(&mut self, kind: BlockKind, state: BlockState) {
        self.grid(kind, vec![state], 0);
    }

    fn grid(&mut self, kind: BlockKind, states: Vec<BlockState>, default_index: usize) {
        assert_eq!(
            kind as usize,
            self.info.len(),
            "kinds must register in declaration order"
        );
        assert!(!states.is_empty());
        debug_assert!(states.iter().all(|s| s.kind() == kind));
        let start = self.states.len();
        assert!(start + states.len() <= u16::MAX as usize + 1);
        let default = (start + default_index) as u16;
        self.states.extend(states);
        self.info.push(KindInfo {
            start: start as u16,
            end: self.states.len() as u16,
            default,
        });
    }
}

impl Catalog {
    pub fn new() -> Self {
        let mut b = Builder::default();

        b.single(BlockKind::Air, BlockState::Air);
        b.single(BlockKind::Stone, BlockState::Stone);
        b.single(BlockKind::Granite, BlockState::Granite);
        b.single(BlockKind::PolishedGranite, BlockState::PolishedGranite);
        b.single(BlockKind::Diorite, BlockState::Diorite);
        b.single(BlockKind::PolishedDiorite, BlockState::PolishedDiorite);
        b.single(BlockKind::Andesite, BlockState::Andesite);
        b.single(BlockKind::PolishedAndesite, BlockState::PolishedAndesite);

        b.grid(
            BlockKind::GrassBlock,
            [true, false]
                .into_iter()
                .map(|snowy| BlockState::GrassBlock { snowy })
                .collect(),
            1,
        );

        b.single(BlockKind::Dirt, BlockState::Dirt);
        b.single(BlockKind::CoarseDirt, BlockState::CoarseDirt);
        b.single(BlockKind::Cobblestone, BlockState::Cobblestone);
        b.single(BlockKind::OakPlanks, BlockState::OakPlanks);
        b.single(BlockKind::SprucePlanks, BlockState::SprucePlanks);
        b.single(BlockKind::BirchPlanks, BlockState::BirchPlanks);

        b.grid(
            BlockKind::OakSapling,
            (0..=1).map(|stage| BlockState::OakSapling { stage }).collect(),
            0,
        );

        b.single(BlockKind::Bedrock, BlockState::Bedrock);

        b.grid(
            BlockKind::Water,
            (0..=15).map(|level| BlockState::Water { level }).collect(),
            0,
        );
        b.grid(
            BlockKind::Lava,
            (0..=15).map(|level| BlockState::Lava { level }).collect(),
            0,
        );

        b.single(BlockKind::Sand, BlockState::Sand);
        b.single(BlockKind::RedSand, BlockState::RedSand);
        b.single(BlockKind::Gravel, BlockState::Gravel);
        b.single(BlockKind::GoldOre, BlockState::GoldOre);
        b.single(BlockKind::IronOre, BlockState::IronOre);
        b.single(BlockKind::CoalOre, BlockState::CoalOre);

        b.grid(
            BlockKind::OakLog,
            Axis::ALL.into_iter().map(|axis| BlockState::OakLog { axis }).collect(),
            1,
        );
        b.grid(
            BlockKind::SpruceLog,
            Axis::ALL
                .into_iter()
                .map(|axis| BlockState::SpruceLog { axis })
                .collect(),
            1,
        );
        b.grid(
            BlockKind::BirchLog,
            Axis::ALL
                .into_iter()
                .map(|axis| BlockState::BirchLog { axis })
                .collect(),
            1,
        );

        {
            let mut states = Vec::with_capacity(14);
            for distance in 1..=7 {
                for persistent in [true, false] {
                    states.push(BlockState::OakLeaves {
                        distance,
                        persistent,
                    });
                }
            }
            // default: distance 7, persistent false
            b.grid(BlockKind::OakLeaves, states, 13);
        }

        b.single(BlockKind::Glass, BlockState::Glass);
        b.single(BlockKind::LapisOre, BlockState::LapisOre);
        b.single(BlockKind::LapisBlock, BlockState::LapisBlock);
        b.single(BlockKind::Sandstone, BlockState::Sandstone);
        b.single(BlockKind::WhiteWool, BlockState::WhiteWool);
        b.single(BlockKind::Dandelion, BlockState::Dandelion);
        b.single(BlockKind::Poppy, BlockState::Poppy);
        b.single(BlockKind::GoldBlock, BlockState::GoldBlock);
        b.single(BlockKind::IronBlock, BlockState::IronBlock);
        b.single(BlockKind::Bricks, BlockState::Bricks);

        b.grid(
            BlockKind::Tnt,
            [true, false]
                .into_iter()
                .map(|unstable| BlockState::Tnt { unstable })
                .collect(),
            1,
        );

        b.single(BlockKind::Bookshelf, BlockState::Bookshelf);
        b.single(BlockKind::MossyCobblestone, BlockState::MossyCobblestone);
        b.single(BlockKind::Obsidian, BlockState::Obsidian);
        b.single(BlockKind::Torch, BlockState::Torch);

        b.grid(
            BlockKind::WallTorch,
            Facing::ALL
                .into_iter()
                .map(|facing| BlockState::WallTorch { facing })
                .collect(),
            0,
        );

        {
            let mut states = Vec::with_capacity(80);
            for facing in Facing::ALL {
                for half in Half::ALL {
                    for shape in StairShape::ALL {
                        for waterlogged in [true, false] {
                            states.push(BlockState::OakStairs {
                                facing,
                                half,
                                shape,
                                waterlogged,
                            });
                        }
                    }
                }
            }
            // default: north / bottom / straight / dry
            b.grid(BlockKind::OakStairs, states, 11);
        }

        b.single(BlockKind::DiamondOre, BlockState::DiamondOre);
        b.single(BlockKind::DiamondBlock, BlockState::DiamondBlock);
        b.single(BlockKind::CraftingTable, BlockState::CraftingTable);

        b.grid(
            BlockKind::Wheat,
            (0..=7).map(|age| BlockState::Wheat { age }).collect(),
            0,
        );
        b.grid(
            BlockKind::Farmland,
            (0..=7).map(|moisture| BlockState::Farmland { moisture }).collect(),
            0,
        );

        {
            let mut states = Vec::with_capacity(8);
            for facing in Facing::ALL {
                for lit in [true, false] {
                    states.push(BlockState::Furnace { facing, lit });
                }
            }
            b.grid(BlockKind::Furnace, states, 1);
        }
        {
            let mut states = Vec::with_capacity(8);
            for facing in Facing::ALL {
                for waterlogged in [true, false] {
                    states.push(BlockState::Ladder {
                        facing,
                        waterlogged,
                    });
                }
            }
            b.grid(BlockKind::Ladder, states, 1);
        }

        b.grid(
            BlockKind::Snow,
            (1..=8).map(|layers| BlockState::Snow { layers }).collect(),
            0,
        );

        b.single(BlockKind::Ice, BlockState::Ice);
        b.single(BlockKind::Clay, BlockState::Clay);
        b.single(BlockKind::Pumpkin, BlockState::Pumpkin);
        b.single(BlockKind::Netherrack, BlockState::Netherrack);
        b.single(BlockKind::SoulSand, BlockState::SoulSand);
        b.single(BlockKind::Glowstone, BlockState::Glowstone);

        for slab in [BlockKind::OakSlab, BlockKind::StoneSlab] {
            let mut states = Vec::with_capacity(6);
            for kind in SlabType::ALL {
                for waterlogged in [true, false] {
                    states.push(match slab {
                        BlockKind::OakSlab => BlockState::OakSlab { kind, waterlogged },
                        _ => BlockState::StoneSlab { kind, waterlogged },
                    });
                }
            }
            // default: bottom / dry
            b.grid(slab, states, 3);
        }

        b.single(BlockKind::SmoothStone, BlockState::SmoothStone);
        b.single(BlockKind::EmeraldOre, BlockState::EmeraldOre);
        b.single(BlockKind::EmeraldBlock, BlockState::EmeraldBlock);

        b.grid(
            BlockKind::RedstoneOre,
            [true, false]
                .into_iter()
                .map(|lit| BlockState::RedstoneOre { lit })
                .collect(),
            1,
        );

        b.single(BlockKind::StoneBricks, BlockState::StoneBricks);

        b.grid(
            BlockKind::Deepslate,
            Axis::ALL
                .into_iter()
                .map(|axis| BlockState::Deepslate { axis })
                .collect(),
            1,
        );

        b.single(BlockKind::CobbledDeepslate, BlockState::CobbledDeepslate);

        assert_eq!(b.info.len(), BlockKind::ALL.len());

        // Item numbering shadows kind order; fluids place via buckets and
        // have no block item. A few pure items pad the tail.
        let mut item_blocks: Vec<Option<BlockKind>> = BlockKind::ALL
            .iter()
            .map(|&kind| match kind {
                BlockKind::Water | BlockKind::Lava => None,
                other => Some(other),
            })
            .collect();
        for _ in 0..4 {
            // stick, coal, diamond, emerald
            item_blocks.push(None);
        }

        let catalog = Self {
            states: b.states,
            info: b.info,
            item_blocks,
        };
        debug_assert_eq!(catalog.id_from_state(&BlockState::Air), AIR_ID);
        catalog
    }

    /// Number of states in the linear id space.
    pub fn total_states(&self) -> u16 {
        self.states.len() as u16
    }

    /// Number of item ids.
    pub fn total_items(&self) -> u32 {
        self.item_blocks.len() as u32
    }

    /// Direct index into the state table.
    pub fn state_from_id(&self, id: u16) -> BlockState {
        self.states[id as usize]
    }

    /// Range and default for a kind. O(1).
    pub fn info(&self, kind: BlockKind) -> KindInfo {
        self.info[kind as usize]
    }

    /// Default state id for a kind. O(1).
    pub fn default_id(&self, kind: BlockKind) -> u16 {
        self.info(kind).default
    }

    /// Numeric id of a typed state: range lookup by kind, then a linear scan
    /// of at most one kind's states.
    pub fn id_from_state(&self, state: &BlockState) -> u16 {
        let info = self.info(state.kind());
        let range = &self.states[info.start as usize..info.end as usize];
        let offset = range
            .iter()
            .position(|s| s == state)
            .unwrap_or_else(|| panic!("state {state:?} missing from its kind range"));
        info.start + offset as u16
    }

    /// Resolve a kind plus textual `Properties` entries to a concrete state,
    /// starting from the kind's default.
    pub fn state_from_property_list(
        &self,
        kind: BlockKind,
        properties: &[(&str, &str)],
    ) -> BlockState {
        let mut state = self.state_from_id(self.default_id(kind));
        for (name, value) in properties {
            state.set_property(name, value);
        }
        state
    }

    /// Block kind placed by an item, if the item is a block item.
    pub fn item_to_block(&self, item_id: u32) -> Option<BlockKind> {
        self.item_blocks.get(item_id as usize).copied().flatten()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_id_zero_and_stone_follows() {
        let c = Catalog::new();
        assert_eq!(c.id_from_state(&BlockState::Air), 0);
        assert_eq!(c.id_from_state(&BlockState::Stone), 1);
        assert_eq!(c.state_from_id(0), BlockState::Air);
    }

    #[test]
    fn every_id_roundtrips() {
        let c = Catalog::new();
        for id in 0..c.total_states() {
            let state = c.state_from_id(id);
            assert_eq!(c.id_from_state(&state), id, "id {id} ({state:?})");
        }
    }

    #[test]
    fn ranges_are_contiguous_and_cover_the_space() {
        let c = Catalog::new();
        let mut expected_start = 0u16;
        for &kind in BlockKind::ALL {
            let info = c.info(kind);
            assert_eq!(info.start, expected_start, "{kind:?} range start");
            assert!(info.end > info.start, "{kind:?} range is non-empty");
            expected_start = info.end;
        }
        assert_eq!(expected_start, c.total_states());
    }

    #[test]
    fn defaults_lie_inside_their_range() {
        let c = Catalog::new();
        for &kind in BlockKind::ALL {
            let info = c.info(kind);
            let default = c.default_id(kind);
            assert!(
                (info.start..info.end).contains(&default),
                "{kind:?} default out of range"
            );
            assert_eq!(c.state_from_id(default).kind(), kind);
        }
    }

    #[test]
    fn known_defaults() {
        let c = Catalog::new();
        assert_eq!(
            c.state_from_id(c.default_id(BlockKind::GrassBlock)),
            BlockState::GrassBlock { snowy: false }
        );
        assert_eq!(
            c.state_from_id(c.default_id(BlockKind::OakLog)),
            BlockState::OakLog { axis: Axis::Y }
        );
        assert_eq!(
            c.state_from_id(c.default_id(BlockKind::OakStairs)),
            BlockState::OakStairs {
                facing: Facing::North,
                half: Half::Bottom,
                shape: StairShape::Straight,
                waterlogged: false,
            }
        );
        assert_eq!(
            c.state_from_id(c.default_id(BlockKind::Water)),
            BlockState::Water { level: 0 }
        );
    }

    #[test]
    fn property_list_resolution() {
        let c = Catalog::new();
        let state = c.state_from_property_list(
            BlockKind::OakStairs,
            &[("facing", "west"), ("waterlogged", "true")],
        );
        assert_eq!(
            state,
            BlockState::OakStairs {
                facing: Facing::West,
                half: Half::Bottom,
                shape: StairShape::Straight,
                waterlogged: true,
            }
        );
        // Resolution must land on a registered id.
        let id = c.id_from_state(&state);
        assert_eq!(c.state_from_id(id), state);
    }

    #[test]
    fn item_mapping() {
        let c = Catalog::new();
        // Item ids shadow kind order: stone is item 1.
        assert_eq!(c.item_to_block(1), Some(BlockKind::Stone));
        // Fluids have no block item.
        assert_eq!(c.item_to_block(BlockKind::Water as u32), None);
        // Tail items are not blocks.
        assert_eq!(c.item_to_block(c.total_items() - 1), None);
        // Out of range is None, not a panic.
        assert_eq!(c.item_to_block(9999), None);
    }

    #[test]
    fn global_catalog_is_shared() {
        let a = catalog() as *const Catalog;
        let b = catalog() as *const Catalog;
        assert_eq!(a, b);
    }
}
