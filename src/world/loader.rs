use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use super::model::{Connection, Room, WorldDefinition};
use crate::store::{StoreError, WorldStore};

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
}

#[derive(Deserialize)]
struct WorldHeader {
    id: String,
    name: String,
    start_room: String,
    #[serde(default)]
    desc: String,
}

#[derive(Deserialize)]
struct RoomConfig {
    id: String,

    /// Falls back to the room id when omitted.
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    desc: String,

    #[serde(default)]
    items: Vec<String>,

    #[serde(default)]
    exit: Vec<ExitConfig>, // [[room.exit]]
}

#[derive(Deserialize)]
struct ExitConfig {
    direction: String,
    target: String,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> io::Result<WorldDefinition> {
    let contents = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
    load_world_from_str(&contents)
}

/// Load a world from TOML text.
pub fn load_world_from_str(contents: &str) -> io::Result<WorldDefinition> {
    let world_file: WorldFile = toml::from_str(contents).map_err(|e| invalid(e.to_string()))?;

    if world_file.world.id.trim().is_empty() {
        return Err(invalid("world.id may not be empty"));
    }
    if world_file.world.start_room.trim().is_empty() {
        return Err(invalid("world.start_room may not be empty"));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut rooms: Vec<Room> = Vec::with_capacity(world_file.room.len());
    let mut connections: Vec<Connection> = Vec::new();

    for room_cfg in world_file.room {
        if room_cfg.id.trim().is_empty() {
            return Err(invalid("room id may not be empty"));
        }
        if !seen.insert(room_cfg.id.clone()) {
            return Err(invalid(format!("Duplicate room id: {}", room_cfg.id)));
        }

        for exit in room_cfg.exit {
            let direction = exit.direction.trim().to_lowercase();
            if direction.is_empty() {
                return Err(invalid(format!(
                    "room '{}' has an exit with an empty direction",
                    room_cfg.id
                )));
            }
            connections.push(Connection::new(&room_cfg.id, exit.target, direction));
        }

        let name = room_cfg
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| room_cfg.id.clone());

        rooms.push(
            Room::new(room_cfg.id, name, normalize_multiline_desc(&room_cfg.desc))
                .with_items(room_cfg.items),
        );
    }

    if !seen.contains(&world_file.world.start_room) {
        return Err(invalid(format!(
            "start_room '{}' not found among rooms",
            world_file.world.start_room
        )));
    }

    Ok(WorldDefinition {
        id: world_file.world.id,
        name: world_file.world.name,
        desc: normalize_multiline_desc(&world_file.world.desc),
        start_room: world_file.world.start_room,
        rooms,
        connections,
    })
}

impl WorldDefinition {
    /// Replaces whatever `store` holds with this world.
    pub fn install<S: WorldStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.reset()?;
        for room in &self.rooms {
            store.put_room(room.clone())?;
        }
        for c in &self.connections {
            store.connect(&c.from_room, &c.to_room, &c.direction)?;
        }
        tracing::info!(
            world = %self.id,
            rooms = self.rooms.len(),
            connections = self.connections.len(),
            "installed world"
        );
        Ok(())
    }
}

/// Joins wrapped TOML lines with a space; one blank line becomes a newline,
/// two or more become a paragraph break. Indentation is dropped.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut blank_run = 0usize;

    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !result.is_empty() {
            result.push_str(match blank_run {
                0 => " ",
                1 => "\n",
                _ => "\n\n",
            });
        }
        result.push_str(line);
        blank_run = 0;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const MANOR: &str = r#"
        [world]
        id = "manor"
        name = "The Manor"
        start_room = "hall"

        [[room]]
        id = "hall"
        name = "Hall"
        desc = """
            A dimly lit hallway
            with rough stone walls.

            A heavy oak door leads east.
        """
        items = ["torch"]

        [[room.exit]]
        direction = "East"
        target = "kitchen"

        [[room]]
        id = "kitchen"
        desc = "Dusty pots hang from the ceiling."

        [[room.exit]]
        direction = "west"
        target = "hall"
    "#;

    #[test]
    fn loads_rooms_exits_and_defaults() {
        let world = load_world_from_str(MANOR).unwrap();
        assert_eq!(world.id, "manor");
        assert_eq!(world.start_room, "hall");
        assert_eq!(world.rooms.len(), 2);

        let hall = &world.rooms[0];
        assert_eq!(
            hall.description,
            "A dimly lit hallway with rough stone walls.\nA heavy oak door leads east."
        );
        assert_eq!(hall.items, vec!["torch".to_string()]);

        let kitchen = &world.rooms[1];
        assert_eq!(kitchen.name, "kitchen");
        assert!(kitchen.items.is_empty());

        assert!(world
            .connections
            .contains(&Connection::new("hall", "kitchen", "east")));
    }

    #[test]
    fn install_replaces_store_contents() {
        let world = load_world_from_str(MANOR).unwrap();
        let mut store = MemoryStore::new();
        store.generate_grid(2).unwrap();

        world.install(&mut store).unwrap();

        assert!(store.get_room("room_0_0").unwrap().is_none());
        assert_eq!(store.get_exits("hall").unwrap()["east"], "kitchen");
        assert_eq!(store.get_exits("kitchen").unwrap()["west"], "hall");
    }

    #[test]
    fn rejects_duplicate_rooms() {
        let src = r#"
            [world]
            id = "w"
            name = "W"
            start_room = "a"
            [[room]]
            id = "a"
            [[room]]
            id = "a"
        "#;
        let err = load_world_from_str(src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Duplicate room id"));
    }

    #[test]
    fn rejects_missing_start_room() {
        let src = r#"
            [world]
            id = "w"
            name = "W"
            start_room = "nowhere"
            [[room]]
            id = "a"
        "#;
        let err = load_world_from_str(src).unwrap_err();
        assert!(err.to_string().contains("start_room 'nowhere'"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = load_world_from_str("[world\nid = ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_world_from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("here.toml"));
    }

    #[test]
    fn normalizes_blank_line_runs() {
        assert_eq!(normalize_multiline_desc("  a\n  b  "), "a b");
        assert_eq!(normalize_multiline_desc("a\n\nb"), "a\nb");
        assert_eq!(normalize_multiline_desc("\n\na\n\n\n\nb\n"), "a\n\nb");
        assert_eq!(normalize_multiline_desc(""), "");
    }
}
