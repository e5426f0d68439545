//! Typed block states.
//!
//! Every block kind the server knows is one [`BlockKind`] variant; every
//! concrete state is a [`BlockState`] carrying that kind's property fields.
//! Property values are typed as bool, small unsigned int, or enum — the same
//! typing the vendor block report fixes at table-generation time.

// ---------------------------------------------------------------------------
// Property value enums
// ---------------------------------------------------------------------------

/// Log/pillar orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Horizontal facing, in the vendor report's value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    North,
    South,
    West,
    East,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::South, Facing::West, Facing::East];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "west" => Some(Self::West),
            "east" => Some(Self::East),
            _ => None,
        }
    }
}

/// Vertical half of a stair block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub const ALL: [Half; 2] = [Half::Top, Half::Bottom];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Stair corner shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StairShape {
    Straight,
    InnerLeft,
    InnerRight,
    OuterLeft,
    OuterRight,
}

impl StairShape {
    pub const ALL: [StairShape; 5] = [
        StairShape::Straight,
        StairShape::InnerLeft,
        StairShape::InnerRight,
        StairShape::OuterLeft,
        StairShape::OuterRight,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "straight" => Some(Self::Straight),
            "inner_left" => Some(Self::InnerLeft),
            "inner_right" => Some(Self::InnerRight),
            "outer_left" => Some(Self::OuterLeft),
            "outer_right" => Some(Self::OuterRight),
            _ => None,
        }
    }
}

/// Slab placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlabType {
    Top,
    Bottom,
    Double,
}

impl SlabType {
    pub const ALL: [SlabType; 3] = [SlabType::Top, SlabType::Bottom, SlabType::Double];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "double" => Some(Self::Double),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Block kinds
// ---------------------------------------------------------------------------

macro_rules! block_kinds {
    ($(($variant:ident, $name:literal)),+ $(,)?) => {
        /// The family tag of a block state.
        ///
        /// Declaration order is catalog registration order; the discriminant
        /// indexes the per-kind range table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum BlockKind {
            $($variant),+
        }

        impl BlockKind {
            pub const ALL: &'static [BlockKind] = &[$(BlockKind::$variant),+];

            /// Resource-location path, without the `minecraft:` namespace.
            pub fn name(self) -> &'static str {
                match self {
                    $(BlockKind::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(BlockKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

block_kinds! {
    (Air, "air"),
    (Stone, "stone"),
    (Granite, "granite"),
    (PolishedGranite, "polished_granite"),
    (Diorite, "diorite"),
    (PolishedDiorite, "polished_diorite"),
    (Andesite, "andesite"),
    (PolishedAndesite, "polished_andesite"),
    (GrassBlock, "grass_block"),
    (Dirt, "dirt"),
    (CoarseDirt, "coarse_dirt"),
    (Cobblestone, "cobblestone"),
    (OakPlanks, "oak_planks"),
    (SprucePlanks, "spruce_planks"),
    (BirchPlanks, "birch_planks"),
    (OakSapling, "oak_sapling"),
    (Bedrock, "bedrock"),
    (Water, "water"),
    (Lava, "lava"),
    (Sand, "sand"),
    (RedSand, "red_sand"),
    (Gravel, "gravel"),
    (GoldOre, "gold_ore"),
    (IronOre, "iron_ore"),
    (CoalOre, "coal_ore"),
    (OakLog, "oak_log"),
    (SpruceLog, "spruce_log"),
    (BirchLog, "birch_log"),
    (OakLeaves, "oak_leaves"),
    (Glass, "glass"),
    (LapisOre, "lapis_ore"),
    (LapisBlock, "lapis_block"),
    (Sandstone, "sandstone"),
    (WhiteWool, "white_wool"),
    (Dandelion, "dandelion"),
    (Poppy, "poppy"),
    (GoldBlock, "gold_block"),
    (IronBlock, "iron_block"),
    (Bricks, "bricks"),
    (Tnt, "tnt"),
    (Bookshelf, "bookshelf"),
    (MossyCobblestone, "mossy_cobblestone"),
    (Obsidian, "obsidian"),
    (Torch, "torch"),
    (WallTorch, "wall_torch"),
    (OakStairs, "oak_stairs"),
    (DiamondOre, "diamond_ore"),
    (DiamondBlock, "diamond_block"),
    (CraftingTable, "crafting_table"),
    (Wheat, "wheat"),
    (Farmland, "farmland"),
    (Furnace, "furnace"),
    (Ladder, "ladder"),
    (Snow, "snow"),
    (Ice, "ice"),
    (Clay, "clay"),
    (Pumpkin, "pumpkin"),
    (Netherrack, "netherrack"),
    (SoulSand, "soul_sand"),
    (Glowstone, "glowstone"),
    (OakSlab, "oak_slab"),
    (StoneSlab, "stone_slab"),
    (SmoothStone, "smooth_stone"),
    (EmeraldOre, "emerald_ore"),
    (EmeraldBlock, "emerald_block"),
    (RedstoneOre, "redstone_ore"),
    (StoneBricks, "stone_bricks"),
    (Deepslate, "deepslate"),
    (CobbledDeepslate, "cobbled_deepslate"),
}

// ---------------------------------------------------------------------------
// Block states
// ---------------------------------------------------------------------------

/// One concrete block state, keyed by kind and carrying that kind's typed
/// property fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockState {
    Air,
    Stone,
    Granite,
    PolishedGranite,
    Diorite,
    PolishedDiorite,
    Andesite,
    PolishedAndesite,
    GrassBlock { snowy: bool },
    Dirt,
    CoarseDirt,
    Cobblestone,
    OakPlanks,
    SprucePlanks,
    BirchPlanks,
    OakSapling { stage: u8 },
    Bedrock,
    Water { level: u8 },
    Lava { level: u8 },
    Sand,
    RedSand,
    Gravel,
    GoldOre,
    IronOre,
    CoalOre,
    OakLog { axis: Axis },
    SpruceLog { axis: Axis },
    BirchLog { axis: Axis },
    OakLeaves { distance: u8, persistent: bool },
    Glass,
    LapisOre,
    LapisBlock,
    Sandstone,
    WhiteWool,
    Dandelion,
    Poppy,
    GoldBlock,
    IronBlock,
    Bricks,
    Tnt { unstable: bool },
    Bookshelf,
    MossyCobblestone,
    Obsidian,
    Torch,
    WallTorch { facing: Facing },
    OakStairs {
        facing: Facing,
        half: Half,
        shape: StairShape,
        waterlogged: bool,
    },
    DiamondOre,
    DiamondBlock,
    CraftingTable,
    Wheat { age: u8 },
    Farmland { moisture: u8 },
    Furnace { facing: Facing, lit: bool },
    Ladder { facing: Facing, waterlogged: bool },
    Snow { layers: u8 },
    Ice,
    Clay,
    Pumpkin,
    Netherrack,
    SoulSand,
    Glowstone,
    OakSlab { kind: SlabType, waterlogged: bool },
    StoneSlab { kind: SlabType, waterlogged: bool },
    SmoothStone,
    EmeraldOre,
    EmeraldBlock,
    RedstoneOre { lit: bool },
    StoneBricks,
    Deepslate { axis: Axis },
    CobbledDeepslate,
}

impl BlockState {
    /// The family tag of this state.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Air => BlockKind::Air,
            Self::Stone => BlockKind::Stone,
            Self::Granite => BlockKind::Granite,
            Self::PolishedGranite => BlockKind::PolishedGranite,
            Self::Diorite => BlockKind::Diorite,
            Self::PolishedDiorite => BlockKind::PolishedDiorite,
            Self::Andesite => BlockKind::Andesite,
            Self::PolishedAndesite => BlockKind::PolishedAndesite,
            Self::GrassBlock { .. } => BlockKind::GrassBlock,
            Self::Dirt => BlockKind::Dirt,
            Self::CoarseDirt => BlockKind::CoarseDirt,
            Self::Cobblestone => BlockKind::Cobblestone,
            Self::OakPlanks => BlockKind::OakPlanks,
            Self::SprucePlanks => BlockKind::SprucePlanks,
            Self::BirchPlanks => BlockKind::BirchPlanks,
            Self::OakSapling { .. } => BlockKind::OakSapling,
            Self::Bedrock => BlockKind::Bedrock,
            Self::Water { .. } => BlockKind::Water,
            Self::Lava { .. } => BlockKind::Lava,
            Self::Sand => BlockKind::Sand,
            Self::RedSand => BlockKind::RedSand,
            Self::Gravel => BlockKind::Gravel,
            Self::GoldOre => BlockKind::GoldOre,
            Self::IronOre => BlockKind::IronOre,
            Self::CoalOre => BlockKind::CoalOre,
            Self::OakLog { .. } => BlockKind::OakLog,
            Self::SpruceLog { .. } => BlockKind::SpruceLog,
            Self::BirchLog { .. } => BlockKind::BirchLog,
            Self::OakLeaves { .. } => BlockKind::OakLeaves,
            Self::Glass => BlockKind::Glass,
            Self::LapisOre => BlockKind::LapisOre,
            Self::LapisBlock => BlockKind::LapisBlock,
            Self::Sandstone => BlockKind::Sandstone,
            Self::WhiteWool => BlockKind::WhiteWool,
            Self::Dandelion => BlockKind::Dandelion,
            Self::Poppy => BlockKind::Poppy,
            Self::GoldBlock => BlockKind::GoldBlock,
            Self::IronBlock => BlockKind::IronBlock,
            Self::Bricks => BlockKind::Bricks,
            Self::Tnt { .. } => BlockKind::Tnt,
            Self::Bookshelf => BlockKind::Bookshelf,
            Self::MossyCobblestone => BlockKind::MossyCobblestone,
            Self::Obsidian => BlockKind::Obsidian,
            Self::Torch => BlockKind::Torch,
            Self::WallTorch { .. } => BlockKind::WallTorch,
            Self::OakStairs { .. } => BlockKind::OakStairs,
            Self::DiamondOre => BlockKind::DiamondOre,
            Self::DiamondBlock => BlockKind::DiamondBlock,
            Self::CraftingTable => BlockKind::CraftingTable,
            Self::Wheat { .. } => BlockKind::Wheat,
            Self::Farmland { .. } => BlockKind::Farmland,
            Self::Furnace { .. } => BlockKind::Furnace,
            Self::Ladder { .. } => BlockKind::Ladder,
            Self::Snow { .. } => BlockKind::Snow,
            Self::Ice => BlockKind::Ice,
            Self::Clay => BlockKind::Clay,
            Self::Pumpkin => BlockKind::Pumpkin,
            Self::Netherrack => BlockKind::Netherrack,
            Self::SoulSand => BlockKind::SoulSand,
            Self::Glowstone => BlockKind::Glowstone,
            Self::OakSlab { .. } => BlockKind::OakSlab,
            Self::StoneSlab { .. } => BlockKind::StoneSlab,
            Self::SmoothStone => BlockKind::SmoothStone,
            Self::EmeraldOre => BlockKind::EmeraldOre,
            Self::EmeraldBlock => BlockKind::EmeraldBlock,
            Self::RedstoneOre { .. } => BlockKind::RedstoneOre,
            Self::StoneBricks => BlockKind::StoneBricks,
            Self::Deepslate { .. } => BlockKind::Deepslate,
            Self::CobbledDeepslate => BlockKind::CobbledDeepslate,
        }
    }

    /// Overwrite one property field from its textual form.
    ///
    /// The value is parsed by the field's stored type. An unknown property
    /// name on a kind that has fields is a contract violation and panics;
    /// properties sent for field-less kinds have nothing to overwrite and
    /// are dropped.
    pub(crate) fn set_property(&mut self, name: &str, value: &str) {
        let kind = self.kind();
        match self {
            Self::GrassBlock { snowy } => match name {
                "snowy" => *snowy = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::OakSapling { stage } => match name {
                "stage" => *stage = parse_int(name, value),
                other => unknown_property(kind, other),
            },
            Self::Water { level } | Self::Lava { level } => match name {
                "level" => *level = parse_int(name, value),
                other => unknown_property(kind, other),
            },
            Self::OakLog { axis } | Self::SpruceLog { axis } | Self::BirchLog { axis } => {
                match name {
                    "axis" => *axis = parse_enum(name, value, Axis::from_name),
                    other => unknown_property(kind, other),
                }
            }
            Self::OakLeaves {
                distance,
                persistent,
            } => match name {
                "distance" => *distance = parse_int(name, value),
                "persistent" => *persistent = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::Tnt { unstable } => match name {
                "unstable" => *unstable = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::WallTorch { facing } => match name {
                "facing" => *facing = parse_enum(name, value, Facing::from_name),
                other => unknown_property(kind, other),
            },
            Self::OakStairs {
                facing,
                half,
                shape,
                waterlogged,
            } => match name {
                "facing" => *facing = parse_enum(name, value, Facing::from_name),
                "half" => *half = parse_enum(name, value, Half::from_name),
                "shape" => *shape = parse_enum(name, value, StairShape::from_name),
                "waterlogged" => *waterlogged = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::Wheat { age } => match name {
                "age" => *age = parse_int(name, value),
                other => unknown_property(kind, other),
            },
            Self::Farmland { moisture } => match name {
                "moisture" => *moisture = parse_int(name, value),
                other => unknown_property(kind, other),
            },
            Self::Furnace { facing, lit } => match name {
                "facing" => *facing = parse_enum(name, value, Facing::from_name),
                "lit" => *lit = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::Ladder {
                facing,
                waterlogged,
            } => match name {
                "facing" => *facing = parse_enum(name, value, Facing::from_name),
                "waterlogged" => *waterlogged = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::Snow { layers } => match name {
                "layers" => *layers = parse_int(name, value),
                other => unknown_property(kind, other),
            },
            Self::OakSlab {
                kind: slab_kind,
                waterlogged,
            }
            | Self::StoneSlab {
                kind: slab_kind,
                waterlogged,
            } => match name {
                "type" => *slab_kind = parse_enum(name, value, SlabType::from_name),
                "waterlogged" => *waterlogged = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::RedstoneOre { lit } => match name {
                "lit" => *lit = parse_bool(name, value),
                other => unknown_property(kind, other),
            },
            Self::Deepslate { axis } => match name {
                "axis" => *axis = parse_enum(name, value, Axis::from_name),
                other => unknown_property(kind, other),
            },
            // Field-less kinds: nothing to overwrite.
            _ => {}
        }
    }
}

fn parse_bool(name: &str, value: &str) -> bool {
    match value {
        "true" => true,
        "false" => false,
        other => panic!("property {name}: expected bool, got {other:?}"),
    }
}

fn parse_int(name: &str, value: &str) -> u8 {
    value
        .parse()
        .unwrap_or_else(|_| panic!("property {name}: expected int, got {value:?}"))
}

fn parse_enum<T>(name: &str, value: &str, from_name: impl Fn(&str) -> Option<T>) -> T {
    from_name(value).unwrap_or_else(|| panic!("property {name}: unknown value {value:?}"))
}

fn unknown_property(kind: BlockKind, name: &str) -> ! {
    panic!("unknown property {name:?} for block {}", kind.name())
}
