//! World Store: rooms, directed exits, and the backends that hold them.
//!
//! A store is owned by a single session and used synchronously. Writes are
//! upserts; reads treat a missing room as an ordinary `None`. The only error a
//! store surfaces is [`StoreError::Unavailable`].

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::collections::HashMap;

use crate::config::StoreConfig;
use crate::world::{Connection, Room, grid};

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Outgoing exits of one room: direction -> destination room id.
pub type Exits = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

pub trait WorldStore {
    /// Creates the room and connection relations if absent. Never erases data.
    fn initialize(&mut self) -> Result<(), StoreError>;

    /// Initializes, then drops every room and connection.
    fn reset(&mut self) -> Result<(), StoreError>;

    /// Inserts or replaces the room with `room.id`.
    fn put_room(&mut self, room: Room) -> Result<(), StoreError>;

    /// Inserts or replaces `(from_room, direction) -> to_room`.
    ///
    /// Neither end is checked against the rooms relation; dangling exits are
    /// representable.
    fn connect(
        &mut self,
        from_room: &str,
        to_room: &str,
        direction: &str,
    ) -> Result<(), StoreError>;

    fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError>;

    /// Exits leaving `id`. An unknown room and a room without exits both
    /// yield an empty map.
    fn get_exits(&self, id: &str) -> Result<Exits, StoreError>;

    /// All rooms, sorted by id.
    fn rooms(&self) -> Result<Vec<Room>, StoreError>;

    /// All connections, sorted by `(from_room, direction)`.
    fn connections(&self) -> Result<Vec<Connection>, StoreError>;

    /// Replaces the whole world with a `size` x `size` lattice.
    fn generate_grid(&mut self, size: usize) -> Result<(), StoreError> {
        grid::populate_grid(self, size)
    }
}

/// Opens the backend named by `config` and initializes it.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn WorldStore>, StoreError> {
    let mut store: Box<dyn WorldStore> = match config {
        StoreConfig::Memory => Box::new(MemoryStore::new()),
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { path } if path.as_os_str() == ":memory:" => {
            Box::new(SqliteStore::open_in_memory()?)
        }
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { path } => Box::new(SqliteStore::open(path)?),
        #[cfg(not(feature = "sqlite"))]
        StoreConfig::Sqlite { path } => {
            return Err(StoreError::Unavailable(format!(
                "sqlite support not compiled in (requested '{}')",
                path.display()
            )));
        }
    };
    store.initialize()?;
    Ok(store)
}

impl<S: WorldStore + ?Sized> WorldStore for Box<S> {
    fn initialize(&mut self) -> Result<(), StoreError> {
        (**self).initialize()
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        (**self).reset()
    }

    fn put_room(&mut self, room: Room) -> Result<(), StoreError> {
        (**self).put_room(room)
    }

    fn connect(
        &mut self,
        from_room: &str,
        to_room: &str,
        direction: &str,
    ) -> Result<(), StoreError> {
        (**self).connect(from_room, to_room, direction)
    }

    fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError> {
        (**self).get_room(id)
    }

    fn get_exits(&self, id: &str) -> Result<Exits, StoreError> {
        (**self).get_exits(id)
    }

    fn rooms(&self) -> Result<Vec<Room>, StoreError> {
        (**self).rooms()
    }

    fn connections(&self) -> Result<Vec<Connection>, StoreError> {
        (**self).connections()
    }

    fn generate_grid(&mut self, size: usize) -> Result<(), StoreError> {
        (**self).generate_grid(size)
    }
}
