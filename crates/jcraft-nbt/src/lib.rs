//! NBT (Named Binary Tag) codec for Minecraft Java Edition.
//!
//! Java NBT is big-endian throughout. The reader is a forward tokenizer over
//! a byte slice — no tree is materialized, and arrays are exposed as lazy
//! views into the input. The writer is a flat emitter of tag headers and
//! payloads.

pub mod error;
pub mod reader;
pub mod tag;
pub mod writer;

pub use error::NbtError;
pub use reader::{ByteArrayView, IntArrayView, LongArrayView, NbtReader, Payload, Token};
pub use tag::Tag;
pub use writer::NbtWriter;
