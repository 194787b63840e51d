//! In-memory World Store. Not persistent.

use std::collections::HashMap;

use super::{Exits, StoreError, WorldStore};
use crate::world::{Connection, Room};

/// Hash-map backed store for one session.
///
/// Rooms are keyed by id; exits are keyed by source room, then direction, so
/// a second `connect` with the same `(from_room, direction)` overwrites.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: HashMap<String, Room>,
    exits: HashMap<String, Exits>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorldStore for MemoryStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        tracing::debug!(rooms = self.rooms.len(), "clearing in-memory world store");
        self.rooms.clear();
        self.exits.clear();
        Ok(())
    }

    fn put_room(&mut self, room: Room) -> Result<(), StoreError> {
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    fn connect(
        &mut self,
        from_room: &str,
        to_room: &str,
        direction: &str,
    ) -> Result<(), StoreError> {
        self.exits
            .entry(from_room.to_string())
            .or_default()
            .insert(direction.to_string(), to_room.to_string());
        Ok(())
    }

    fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.get(id).cloned())
    }

    fn get_exits(&self, id: &str) -> Result<Exits, StoreError> {
        Ok(self.exits.get(id).cloned().unwrap_or_default())
    }

    fn rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<Room> = self.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rooms)
    }

    fn connections(&self) -> Result<Vec<Connection>, StoreError> {
        let mut connections: Vec<Connection> = self
            .exits
            .iter()
            .flat_map(|(from, exits)| {
                exits
                    .iter()
                    .map(move |(direction, to)| Connection::new(from, to, direction))
            })
            .collect();
        connections.sort_by(|a, b| {
            (a.from_room.as_str(), a.direction.as_str())
                .cmp(&(b.from_room.as_str(), b.direction.as_str()))
        });
        Ok(connections)
    }
}
