use std::collections::HashSet;

use crate::store::{StoreError, WorldStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reports structural problems in the world held by `store`.
///
/// Dangling exits are legal to store; this is for authors and `--check`.
pub fn validate_world<S: WorldStore + ?Sized>(
    store: &S,
    start_room: &str,
) -> Result<Vec<ValidationError>, StoreError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    let rooms = store.rooms()?;
    let room_ids: HashSet<&str> = rooms.iter().map(|r| r.id.as_str()).collect();

    // Rooms must not be empty
    if rooms.is_empty() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    if !room_ids.contains(start_room) {
        errors.push(ValidationError::new(format!(
            "start_room '{}' not found among rooms",
            start_room
        )));
    }

    for room in &rooms {
        if room.id.trim().is_empty() {
            errors.push(ValidationError::new("a room has an empty id"));
        }
    }

    for c in store.connections()? {
        if !room_ids.contains(c.from_room.as_str()) {
            errors.push(ValidationError::new(format!(
                "exit '{}' leaves missing room '{}'",
                c.direction, c.from_room
            )));
        }
        if !room_ids.contains(c.to_room.as_str()) {
            errors.push(ValidationError::new(format!(
                "room '{}' exit '{}' targets missing room '{}'",
                c.from_room, c.direction, c.to_room
            )));
        }
        if c.direction.trim().is_empty() {
            errors.push(ValidationError::new(format!(
                "room '{}' has an exit with an empty direction",
                c.from_room
            )));
        }
    }

    for e in &errors {
        tracing::warn!(finding = %e, "world validation");
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::world::Room;

    #[test]
    fn grid_world_is_clean() {
        let mut store = MemoryStore::new();
        store.generate_grid(4).unwrap();
        assert!(validate_world(&store, "room_0_0").unwrap().is_empty());
    }

    #[test]
    fn empty_world_reports_missing_rooms_and_start() {
        let store = MemoryStore::new();
        let errors = validate_world(&store, "hall").unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "world has no rooms");
    }

    #[test]
    fn dangling_exits_are_reported_not_rejected() {
        let mut store = MemoryStore::new();
        store.put_room(Room::new("hall", "Hall", "stone")).unwrap();
        store.connect("hall", "cellar", "down").unwrap();
        store.connect("attic", "hall", "down").unwrap();
        store.connect("hall", "hall", " ").unwrap();

        let messages: Vec<String> = validate_world(&store, "hall")
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();

        assert!(
            messages.contains(&"room 'hall' exit 'down' targets missing room 'cellar'".to_string())
        );
        assert!(messages.contains(&"exit 'down' leaves missing room 'attic'".to_string()));
        assert!(
            messages.contains(&"room 'hall' has an exit with an empty direction".to_string())
        );
        assert_eq!(messages.len(), 3);
    }
}
