use serde::{Deserialize, Serialize};

/////////////////////////
/// WORLD RECORD TYPES ///
/////////////////////////

/// A named location with a description and the items lying in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Room {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Room {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// Directed exit `from_room --direction--> to_room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from_room: String,
    pub to_room: String,
    pub direction: String,
}

impl Connection {
    pub fn new(
        from_room: impl Into<String>,
        to_room: impl Into<String>,
        direction: impl Into<String>,
    ) -> Self {
        Connection {
            from_room: from_room.into(),
            to_room: to_room.into(),
            direction: direction.into(),
        }
    }
}

/// A complete hand-authored world, ready to be installed into a store.
#[derive(Debug, Clone)]
pub struct WorldDefinition {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub start_room: String,
    pub rooms: Vec<Room>,
    pub connections: Vec<Connection>,
}
