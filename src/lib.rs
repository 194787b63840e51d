pub mod config;
pub mod engine;
pub mod store;
pub mod world;

use std::io;

use config::{GameConfig, WorldSource};
use engine::{
    DirectionMatch, MessageKind, Output, Transcript, compass_direction, match_direction,
    render_exits, render_room, render_unknown_room, resolve_exit, strip_move_verb,
};
use store::{StoreError, WorldStore};

pub use world::{load_world_from_file, load_world_from_str};

/// Result of asking to move in a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { to: String },
    InvalidDirection,
}

impl MoveOutcome {
    /// Short status recorded as the tool message in the transcript.
    pub fn as_tool_result(&self) -> &'static str {
        match self {
            MoveOutcome::Moved { .. } => "MOVED",
            MoveOutcome::InvalidDirection => "INVALID_DIRECTION",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("the store holds no rooms; nowhere to start")]
    EmptyWorld,
}

/// Loads the configured world into `store` and returns the starting room id.
pub fn prepare_world<S: WorldStore + ?Sized>(
    store: &mut S,
    config: &GameConfig,
) -> Result<String, SetupError> {
    let default_start = match &config.world {
        WorldSource::Builtin { name } => {
            let def = name.definition();
            def.install(store)?;
            def.start_room
        }
        WorldSource::File { path } => {
            let def = load_world_from_file(path)?;
            def.install(store)?;
            def.start_room
        }
        WorldSource::Grid { size } => {
            store.generate_grid(*size)?;
            if *size == 0 {
                return Err(SetupError::EmptyWorld);
            }
            world::grid_room_id(0, 0)
        }
        WorldSource::Existing => match &config.start_room {
            Some(start) => start.clone(),
            None => store
                .rooms()?
                .into_iter()
                .next()
                .map(|r| r.id)
                .ok_or(SetupError::EmptyWorld)?,
        },
    };
    Ok(config.start_room.clone().unwrap_or(default_start))
}

/// One play session over a world store.
pub struct GameState<S: WorldStore> {
    pub store: S,
    pub start_room: String,
    pub current_room_id: String,
    pub transcript: Transcript,
    pub turn_index: u64,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    use crate::store::MemoryStore;

    #[derive(Serialize)]
    struct WasmStepResult {
        blocks: Vec<engine::OutputBlock>,
        quit: bool,
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    #[wasm_bindgen]
    pub struct WasmGame {
        state: GameState<MemoryStore>,
        initialized: bool,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Create a game from a TOML world string. Call `init()` to get the initial render.
        #[wasm_bindgen(constructor)]
        pub fn new(world_toml: &str) -> Result<WasmGame, JsValue> {
            let def = load_world_from_str(world_toml).map_err(js_err)?;
            let mut store = MemoryStore::new();
            def.install(&mut store).map_err(js_err)?;
            Ok(WasmGame {
                state: GameState::new(store, def.start_room),
                initialized: false,
            })
        }

        /// Create a game on a `size` x `size` grid, starting in the top-left room.
        #[wasm_bindgen(js_name = fromGrid)]
        pub fn from_grid(size: usize) -> Result<WasmGame, JsValue> {
            let mut store = MemoryStore::new();
            store.generate_grid(size).map_err(js_err)?;
            Ok(WasmGame {
                state: GameState::new(store, world::grid_room_id(0, 0)),
                initialized: false,
            })
        }

        /// Initialize the game and return the initial render output.
        #[wasm_bindgen]
        pub fn init(&mut self) -> Result<JsValue, JsValue> {
            self.initialized = true;
            let out = self.state.initialize().map_err(js_err)?;
            to_value(&WasmStepResult {
                blocks: out.blocks,
                quit: false,
            })
            .map_err(js_err)
        }

        /// Process a player command and return the resulting output blocks and quit flag.
        #[wasm_bindgen]
        pub fn step(&mut self, input: &str) -> Result<JsValue, JsValue> {
            if !self.initialized {
                let _ = self.init()?;
            }
            let (out, quit) = self.state.step(input).map_err(js_err)?;
            to_value(&WasmStepResult {
                blocks: out.blocks,
                quit,
            })
            .map_err(js_err)
        }
    }
}

impl<S: WorldStore> GameState<S> {
    pub fn new(store: S, start_room: impl Into<String>) -> Self {
        let start_room = start_room.into();
        GameState {
            store,
            current_room_id: start_room.clone(),
            start_room,
            transcript: Transcript::new(),
            turn_index: 0,
        }
    }

    /// Puts the player in the start room and renders it.
    pub fn initialize(&mut self) -> Result<Output, StoreError> {
        self.current_room_id = self.start_room.clone();
        self.transcript.clear();
        self.turn_index = 0;
        let out = self.look()?;
        self.transcript.push(MessageKind::Assistant, out.narration());
        Ok(out)
    }

    fn look(&self) -> Result<Output, StoreError> {
        let mut out = Output::new();
        let exits = self.store.get_exits(&self.current_room_id)?;
        match self.store.get_room(&self.current_room_id)? {
            Some(room) => render_room(&mut out, &room, &exits),
            None => {
                tracing::warn!(room = %self.current_room_id, "current room not in store");
                render_unknown_room(&mut out, &exits);
            }
        }
        Ok(out)
    }

    /// Moves through the exit named `direction` (case-insensitive) if the
    /// current room has one.
    pub fn move_room(&mut self, direction: &str) -> Result<MoveOutcome, StoreError> {
        let exits = self.store.get_exits(&self.current_room_id)?;
        let outcome = match resolve_exit(&exits, direction) {
            Some(to) => {
                tracing::debug!(from = %self.current_room_id, to = %to, direction, "moved");
                self.current_room_id = to.clone();
                self.turn_index += 1;
                MoveOutcome::Moved { to: to.clone() }
            }
            None => MoveOutcome::InvalidDirection,
        };
        Ok(outcome)
    }

    /// Process a single player input; returns (output, quit?)
    pub fn step(&mut self, input: &str) -> Result<(Output, bool), StoreError> {
        let mut out = Output::new();
        let input = input.trim();
        if input.is_empty() {
            return Ok((out, false));
        }

        let lower = input.to_lowercase();
        if lower == "again" || lower == "g" {
            let previous = self.transcript.last_user().map(|m| m.content.clone());
            return match previous {
                Some(previous) => self.step(&previous),
                None => {
                    out.say("There is nothing to repeat.");
                    Ok((out, false))
                }
            };
        }

        let mut quit = false;
        self.transcript.push(MessageKind::User, input);

        if lower == "quit" || lower == "exit" || lower == "q" {
            out.say("Goodbye.");
            quit = true;
        } else if lower == "look" || lower == "l" {
            out = self.look()?;
        } else if lower == "exits" {
            let exits = self.store.get_exits(&self.current_room_id)?;
            render_exits(&mut out, &exits);
        } else {
            let exits = self.store.get_exits(&self.current_room_id)?;
            match match_direction(&lower, &exits) {
                DirectionMatch::Unique(direction) => {
                    self.walk(&mut out, &direction)?;
                }
                DirectionMatch::Ambiguous(candidates) => {
                    out.say(format!(
                        "That direction is ambiguous here. Did you mean: {}?",
                        candidates.join(", ")
                    ));
                }
                DirectionMatch::None => {
                    match strip_move_verb(&lower).or_else(|| compass_direction(&lower)) {
                        Some(direction) => self.walk(&mut out, direction)?,
                        None => out.say("I don't understand that command."),
                    }
                }
            }
        }

        if !out.is_empty() {
            self.transcript.push(MessageKind::Assistant, out.narration());
        }
        Ok((out, quit))
    }

    fn walk(&mut self, out: &mut Output, direction: &str) -> Result<(), StoreError> {
        let outcome = self.move_room(direction)?;
        match &outcome {
            MoveOutcome::Moved { .. } => {
                // A new room starts a fresh conversation, opened by the move command.
                let command = self.transcript.last_user().cloned();
                self.transcript.clear();
                if let Some(command) = command {
                    self.transcript.push(command.kind, command.content);
                }
                self.transcript.push(MessageKind::Tool, outcome.as_tool_result());
                out.event(format!("You go {direction}."));
                let arrived = self.look()?;
                out.blocks.extend(arrived.blocks);
            }
            MoveOutcome::InvalidDirection => {
                self.transcript.push(MessageKind::Tool, outcome.as_tool_result());
                out.say("You can't go that way.");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::engine::OutputBlock;
    use crate::store::MemoryStore;
    use crate::world::BuiltinWorld;

    fn manor_game() -> GameState<MemoryStore> {
        let mut store = MemoryStore::new();
        let def = BuiltinWorld::Manor.definition();
        def.install(&mut store).unwrap();
        GameState::new(store, def.start_room)
    }

    fn grid_game(size: usize) -> GameState<MemoryStore> {
        let mut store = MemoryStore::new();
        store.generate_grid(size).unwrap();
        GameState::new(store, "room_0_0")
    }

    #[test]
    fn initialize_renders_start_room() {
        let mut game = manor_game();
        let out = game.initialize().unwrap();
        assert_eq!(out.blocks[0], OutputBlock::Title("Hall".into()));
        assert_eq!(
            out.blocks.last(),
            Some(&OutputBlock::Exits(vec!["east".into()]))
        );
    }

    #[test]
    fn moving_east_then_west_returns_to_hall() {
        let mut game = manor_game();
        game.initialize().unwrap();

        let (out, quit) = game.step("go East").unwrap();
        assert!(!quit);
        assert_eq!(game.current_room_id, "kitchen");
        assert!(out.blocks.contains(&OutputBlock::Title("Kitchen".into())));

        game.step("w").unwrap();
        assert_eq!(game.current_room_id, "hall");
        assert_eq!(game.turn_index, 2);
    }

    #[test]
    fn invalid_direction_stays_put() {
        let mut game = manor_game();
        game.initialize().unwrap();
        let (out, _) = game.step("go north").unwrap();
        assert_eq!(game.current_room_id, "hall");
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text("You can't go that way.".into())]
        );
        let tool = game
            .transcript
            .messages()
            .iter()
            .find(|m| m.kind == MessageKind::Tool)
            .unwrap();
        assert_eq!(tool.content, "INVALID_DIRECTION");
    }

    #[test]
    fn move_clears_transcript_before_tool_result() {
        let mut game = manor_game();
        game.initialize().unwrap();
        game.step("look").unwrap();
        game.step("east").unwrap();

        let kinds: Vec<MessageKind> = game.transcript.messages().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MessageKind::User, MessageKind::Tool, MessageKind::Assistant]
        );
        assert_eq!(game.transcript.messages()[0].content, "east");
        assert_eq!(game.transcript.messages()[1].content, "MOVED");
    }

    #[test]
    fn bare_blocked_direction_cannot_be_walked() {
        let mut game = manor_game();
        game.initialize().unwrap();
        for cmd in ["north", "N", "down"] {
            let (out, quit) = game.step(cmd).unwrap();
            assert!(!quit);
            assert_eq!(game.current_room_id, "hall");
            assert_eq!(
                out.blocks,
                vec![OutputBlock::Text("You can't go that way.".into())]
            );
            let tool = game.transcript.messages().iter().rev().nth(1).unwrap();
            assert_eq!(tool.kind, MessageKind::Tool);
            assert_eq!(tool.content, "INVALID_DIRECTION");
        }
    }

    #[test]
    fn again_repeats_the_last_command() {
        let mut game = grid_game(3);
        game.initialize().unwrap();
        let (out, _) = game.step("again").unwrap();
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text("There is nothing to repeat.".into())]
        );

        game.step("south").unwrap();
        game.step("g").unwrap();
        assert_eq!(game.current_room_id, "room_2_0");
        assert_eq!(game.transcript.last_user().unwrap().content, "south");
    }

    #[test]
    fn unknown_command_and_quit() {
        let mut game = manor_game();
        game.initialize().unwrap();
        let (out, quit) = game.step("dance wildly").unwrap();
        assert!(!quit);
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text("I don't understand that command.".into())]
        );
        let (_, quit) = game.step("QUIT").unwrap();
        assert!(quit);
    }

    #[test]
    fn ambiguous_abbreviation_lists_candidates() {
        let mut store = MemoryStore::new();
        store.put_room(world::Room::new("a", "A", "Stairwell.")).unwrap();
        store.connect("a", "b", "south").unwrap();
        store.connect("a", "c", "stairs").unwrap();
        let mut game = GameState::new(store, "a");
        let (out, _) = game.step("s").unwrap();
        assert_eq!(game.current_room_id, "a");
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text(
                "That direction is ambiguous here. Did you mean: south, stairs?".into()
            )]
        );
    }

    #[test]
    fn unknown_start_room_degrades_gracefully() {
        let mut game = GameState::new(MemoryStore::new(), "nowhere");
        let out = game.initialize().unwrap();
        assert!(matches!(out.blocks[0], OutputBlock::Text(_)));
        let (out, _) = game.step("north").unwrap();
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text("You can't go that way.".into())]
        );
        let (out, _) = game.step("dance").unwrap();
        assert_eq!(
            out.blocks,
            vec![OutputBlock::Text("I don't understand that command.".into())]
        );
    }

    #[test]
    fn grid_walk_reaches_far_corner() {
        let mut game = grid_game(3);
        game.initialize().unwrap();
        for cmd in ["s", "south", "east", "go e"] {
            game.step(cmd).unwrap();
        }
        assert_eq!(game.current_room_id, "room_2_2");
        assert_eq!(game.move_room("south").unwrap(), MoveOutcome::InvalidDirection);
        assert_eq!(
            game.move_room("NORTH").unwrap(),
            MoveOutcome::Moved {
                to: "room_1_2".into()
            }
        );
    }

    #[test]
    fn prepare_world_picks_start_rooms() {
        let mut store = MemoryStore::new();

        let cfg = GameConfig::default();
        assert_eq!(prepare_world(&mut store, &cfg).unwrap(), "hall");

        let cfg = GameConfig {
            world: WorldSource::Grid { size: 2 },
            ..GameConfig::default()
        };
        assert_eq!(prepare_world(&mut store, &cfg).unwrap(), "room_0_0");

        let cfg = GameConfig {
            world: WorldSource::Existing,
            ..GameConfig::default()
        };
        assert_eq!(prepare_world(&mut store, &cfg).unwrap(), "room_0_0");
        assert_eq!(store.rooms().unwrap().len(), 4);

        let cfg = GameConfig {
            start_room: Some("room_1_1".into()),
            world: WorldSource::Existing,
            store: StoreConfig::Memory,
        };
        assert_eq!(prepare_world(&mut store, &cfg).unwrap(), "room_1_1");
    }

    #[test]
    fn prepare_world_rejects_empty_worlds() {
        let mut store = MemoryStore::new();
        let cfg = GameConfig {
            world: WorldSource::Existing,
            ..GameConfig::default()
        };
        assert!(matches!(
            prepare_world(&mut store, &cfg),
            Err(SetupError::EmptyWorld)
        ));
        let cfg = GameConfig {
            world: WorldSource::Grid { size: 0 },
            ..GameConfig::default()
        };
        assert!(matches!(
            prepare_world(&mut store, &cfg),
            Err(SetupError::EmptyWorld)
        ));
    }
}
