//! Static NBT fragments embedded in the join-game payload: the registry
//! codec (dimension types + biomes) and the overworld dimension blob.

use std::sync::OnceLock;

use jcraft_nbt::{NbtWriter, Tag};

/// The registry codec sent with every join.
pub fn dimension_codec() -> &'static [u8] {
    static CODEC: OnceLock<Vec<u8>> = OnceLock::new();
    CODEC.get_or_init(build_dimension_codec)
}

/// The overworld dimension element sent with every join.
pub fn overworld_dimension() -> &'static [u8] {
    static DIMENSION: OnceLock<Vec<u8>> = OnceLock::new();
    DIMENSION.get_or_init(|| {
        let mut w = NbtWriter::new();
        w.compound("");
        write_overworld_fields(&mut w);
        w.end();
        w.into_bytes()
    })
}

fn build_dimension_codec() -> Vec<u8> {
    let mut w = NbtWriter::new();
    w.compound("");

    w.compound("minecraft:dimension_type");
    w.string("type", "minecraft:dimension_type");
    w.list("value", Tag::Compound, 1);
    {
        w.string("name", "minecraft:overworld");
        w.int("id", 0);
        w.compound("element");
        write_overworld_fields(&mut w);
        w.end();
        w.end();
    }
    w.end();

    w.compound("minecraft:worldgen/biome");
    w.string("type", "minecraft:worldgen/biome");
    w.list("value", Tag::Compound, 1);
    {
        w.string("name", "minecraft:plains");
        w.int("id", 1);
        w.compound("element");
        w.string("precipitation", "rain");
        w.float("temperature", 0.8);
        w.float("downfall", 0.4);
        w.string("category", "plains");
        w.compound("effects");
        w.int("sky_color", 7_907_327);
        w.int("water_fog_color", 329_011);
        w.int("fog_color", 12_638_463);
        w.int("water_color", 4_159_204);
        w.compound("mood_sound");
        w.string("sound", "minecraft:ambient.cave");
        w.int("tick_delay", 6000);
        w.double("offset", 2.0);
        w.int("block_search_extent", 8);
        w.end();
        w.end();
        w.end();
        w.end();
    }
    w.end();

    w.end();
    w.into_bytes()
}

fn write_overworld_fields(w: &mut NbtWriter) {
    w.byte("piglin_safe", 0);
    w.byte("natural", 1);
    w.float("ambient_light", 0.0);
    w.string("infiniburn", "#minecraft:infiniburn_overworld");
    w.byte("respawn_anchor_works", 0);
    w.byte("has_skylight", 1);
    w.byte("bed_works", 1);
    w.string("effects", "minecraft:overworld");
    w.byte("has_raids", 1);
    w.int("min_y", -64);
    w.int("height", 384);
    w.int("logical_height", 384);
    w.double("coordinate_scale", 1.0);
    w.byte("ultrawarm", 0);
    w.byte("has_ceiling", 0);
}
