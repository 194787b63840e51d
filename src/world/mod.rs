mod builtin;
pub mod grid;
mod loader;
mod model;
mod validator;

pub use builtin::BuiltinWorld;
pub use grid::{GRID_ITEM, grid_room_id};
pub use loader::{load_world_from_file, load_world_from_str};

pub use model::{Connection, Room, WorldDefinition};
pub use validator::{ValidationError, validate_world};
