//! Game configuration, read from TOML.
//!
//! ```toml
//! start_room = "room_0_0"
//!
//! [store]
//! backend = "sqlite"
//! path = "rooms.db"
//!
//! [world]
//! source = "grid"
//! size = 3
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::world::BuiltinWorld;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Overrides the world's own starting room.
    pub start_room: Option<String>,
    pub store: StoreConfig,
    pub world: WorldSource,
}

/// Where rooms and connections live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    /// `path` may be `":memory:"` for a throwaway database.
    Sqlite { path: PathBuf },
}

/// What gets loaded into the store at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum WorldSource {
    Builtin {
        #[serde(default)]
        name: BuiltinWorld,
    },
    Grid {
        #[serde(default = "default_grid_size")]
        size: usize,
    },
    File {
        path: PathBuf,
    },
    /// Play whatever the store already holds.
    Existing,
}

impl Default for WorldSource {
    fn default() -> Self {
        WorldSource::Builtin {
            name: BuiltinWorld::default(),
        }
    }
}

fn default_grid_size() -> usize {
    3
}

pub fn load_config_from_str(contents: &str) -> io::Result<GameConfig> {
    toml::from_str(contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub fn load_config(path: &Path) -> io::Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
    load_config_from_str(&contents).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {e}", path.display()),
        )
    })
}
