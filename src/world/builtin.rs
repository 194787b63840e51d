//! Small hand-authored worlds that ship with the crate.

use serde::Deserialize;

use super::model::{Connection, Room, WorldDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinWorld {
    /// Hall and kitchen joined by an east/west door.
    #[default]
    Manor,
    /// Cave and forest clearing joined by an east/west passage.
    Cave,
}

impl BuiltinWorld {
    pub fn definition(self) -> WorldDefinition {
        match self {
            BuiltinWorld::Manor => manor(),
            BuiltinWorld::Cave => cave(),
        }
    }
}

impl std::str::FromStr for BuiltinWorld {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manor" => Ok(BuiltinWorld::Manor),
            "cave" => Ok(BuiltinWorld::Cave),
            other => Err(format!("unknown builtin world '{other}' (expected 'manor' or 'cave')")),
        }
    }
}

fn manor() -> WorldDefinition {
    WorldDefinition {
        id: "manor".into(),
        name: "The Manor".into(),
        desc: String::new(),
        start_room: "hall".into(),
        rooms: vec![
            Room::new(
                "hall",
                "Hall",
                "A dimly lit hallway with rough stone walls. Faintly glowing torches \
                 cast long shadows across the cracked floor, and cobwebs hang in the \
                 corners. Ancient portraits, nearly faded to nothing, line the walls \
                 with ghostly faces. A heavy oak door, its iron handle worn smooth, \
                 leads east.",
            ),
            Room::new(
                "kitchen",
                "Kitchen",
                "Dusty pots hang from the ceiling above a scarred wooden table. \
                 A large stone hearth dominates one side, still carrying the faint \
                 smell of old herbs and smoke. Rusty utensils litter the counters, \
                 and a grimy window barely lets in any light. An archway to the \
                 west returns to the hallway.",
            ),
        ],
        connections: vec![
            Connection::new("hall", "kitchen", "east"),
            Connection::new("kitchen", "hall", "west"),
        ],
    }
}

fn cave() -> WorldDefinition {
    WorldDefinition {
        id: "cave".into(),
        name: "Cave and Clearing".into(),
        desc: String::new(),
        start_room: "room1".into(),
        rooms: vec![
            Room::new(
                "room1",
                "Cave",
                "You are in a small, dimly lit cave. A narrow passage leads east.",
            ),
            Room::new(
                "room2",
                "Forest Clearing",
                "You stand in a forest clearing. Paths lead west and south.",
            ),
        ],
        // The southern path in the clearing is scenery only.
        connections: vec![
            Connection::new("room1", "room2", "east"),
            Connection::new("room2", "room1", "west"),
        ],
    }
}
