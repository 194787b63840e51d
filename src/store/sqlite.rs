//! SQLite-backed World Store. Persistent across process restarts.
//!
//! Two relations: `rooms(id, name, description, items_json)` and
//! `connections(from_room, to_room, direction)` keyed by
//! `(from_room, direction)`. Upserts use `INSERT OR REPLACE`.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{OptionalExtension, params};

use super::{Exits, StoreError, WorldStore};
use crate::world::{Connection, Room, grid};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY,
        name TEXT,
        description TEXT NOT NULL,
        items_json TEXT
    );
    CREATE TABLE IF NOT EXISTS connections (
        from_room TEXT NOT NULL,
        to_room TEXT NOT NULL,
        direction TEXT NOT NULL,
        PRIMARY KEY (from_room, direction)
    );
"#;

/// Columns added to `rooms` after its first release; older files get them
/// on `initialize`.
const ROOM_COLUMNS: [(&str, &str); 2] = [("name", "TEXT"), ("items_json", "TEXT")];

/// Owns one SQLite connection for the lifetime of the session.
pub struct SqliteStore {
    conn: rusqlite::Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file. Call `initialize` before use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = rusqlite::Connection::open(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot open '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "opened sqlite world store");
        Ok(Self { conn })
    }

    /// Private in-memory database; gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    fn room_columns(&self) -> Result<HashSet<String>, StoreError> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(rooms)")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        let columns = names.collect::<Result<HashSet<_>, _>>()?;
        Ok(columns)
    }

    /// Adds any of `ROOM_COLUMNS` an older `rooms` table lacks.
    fn upgrade_rooms(&mut self) -> Result<(), StoreError> {
        let existing = self.room_columns()?;
        for (column, decl) in ROOM_COLUMNS {
            if !existing.contains(column) {
                self.conn
                    .execute_batch(&format!("ALTER TABLE rooms ADD COLUMN {column} {decl}"))?;
                tracing::info!(column, "added missing column to rooms table");
            }
        }
        Ok(())
    }
}

/// Decodes the `items_json` column. Anything other than a JSON array of
/// strings reads as no items.
fn decode_items(room_id: &str, raw: ValueRef<'_>) -> Vec<String> {
    let text = match raw {
        ValueRef::Null => return Vec::new(),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!(room = room_id, "items_json is not valid utf-8; using no items");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(
                room = room_id,
                kind = ?other.data_type(),
                "items_json has unexpected type; using no items"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(text) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(room = room_id, error = %e, "malformed items_json; using no items");
            Vec::new()
        }
    }
}

fn room_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Room> {
    let id: String = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    let description: String = row.get(2)?;
    let items = decode_items(&id, row.get_ref(3)?);
    Ok(Room {
        name: name.unwrap_or_else(|| id.clone()),
        id,
        description,
        items,
    })
}

impl WorldStore for SqliteStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        self.upgrade_rooms()
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.initialize()?;
        self.conn.execute_batch("DELETE FROM connections; DELETE FROM rooms;")?;
        tracing::debug!("cleared sqlite world store");
        Ok(())
    }

    fn put_room(&mut self, room: Room) -> Result<(), StoreError> {
        let items_json = serde_json::to_string(&room.items).unwrap_or_else(|_| "[]".to_string());
        self.conn.execute(
            "INSERT OR REPLACE INTO rooms (id, name, description, items_json) VALUES (?1, ?2, ?3, ?4)",
            params![room.id, room.name, room.description, items_json],
        )?;
        Ok(())
    }

    fn connect(
        &mut self,
        from_room: &str,
        to_room: &str,
        direction: &str,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO connections (from_room, to_room, direction) VALUES (?1, ?2, ?3)",
            params![from_room, to_room, direction],
        )?;
        Ok(())
    }

    fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError> {
        let room = self
            .conn
            .query_row(
                "SELECT id, name, description, items_json FROM rooms WHERE id = ?1",
                params![id],
                room_from_row,
            )
            .optional()?;
        Ok(room)
    }

    fn get_exits(&self, id: &str) -> Result<Exits, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT direction, to_room FROM connections WHERE from_room = ?1")?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let exits = rows.collect::<Result<Exits, _>>()?;
        Ok(exits)
    }

    fn rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, items_json FROM rooms ORDER BY id")?;
        let rows = stmt.query_map([], room_from_row)?;
        let rooms = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    fn connections(&self) -> Result<Vec<Connection>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT from_room, to_room, direction FROM connections ORDER BY from_room, direction",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Connection {
                from_room: row.get(0)?,
                to_room: row.get(1)?,
                direction: row.get(2)?,
            })
        })?;
        let connections = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(connections)
    }

    /// Same lattice as the default, written in a single transaction.
    fn generate_grid(&mut self, size: usize) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN")?;
        match grid::populate_grid(self, size) {
            Ok(()) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback, "rollback after failed grid generation");
                }
                Err(e)
            }
        }
    }
}
