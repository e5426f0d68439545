//! Game state: the tickable world manager, the player roster, and the
//! update fan-out that turns simulation effects into clientbound packets.

pub mod player;
pub mod registry_nbt;
pub mod update;
pub mod world;

pub use player::{DimensionKind, Outbound, OutboundSender, Player, PlayerId, Vec3};
pub use update::WorldUpdate;
pub use world::WorldManager;
