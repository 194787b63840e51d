use serde::Serialize;
use std::fmt;

/// One piece of a turn's narration, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputBlock {
    Title(String),
    Text(String),
    Items(Vec<String>),
    Event(String),
    Exits(Vec<String>),
}

impl fmt::Display for OutputBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputBlock::Title(t) => write!(f, "{t}"),
            OutputBlock::Text(t) | OutputBlock::Event(t) => write!(f, "{t}"),
            OutputBlock::Items(items) => write!(f, "You see: {}", items.join(", ")),
            OutputBlock::Exits(dirs) if dirs.is_empty() => write!(f, "Exits: (none)"),
            OutputBlock::Exits(dirs) => write!(f, "Exits: {}", dirs.join(", ")),
        }
    }
}

#[derive(Default, Debug, Serialize)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `block`, keeping an existing exits block at the end.
    fn push(&mut self, block: OutputBlock) {
        match self.blocks.last() {
            Some(OutputBlock::Exits(_)) => {
                let at = self.blocks.len() - 1;
                self.blocks.insert(at, block);
            }
            _ => self.blocks.push(block),
        }
    }

    pub fn title(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.push(OutputBlock::Title(s));
        }
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.push(OutputBlock::Text(s));
        }
    }

    pub fn items(&mut self, items: &[String]) {
        if !items.is_empty() {
            self.push(OutputBlock::Items(items.to_vec()));
        }
    }

    pub fn event(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.push(OutputBlock::Event(s));
        }
    }

    /// Replaces any earlier exits block with this one, sorted and deduped.
    /// The exits block is always the last block.
    pub fn set_exits(&mut self, mut directions: Vec<String>) {
        directions.sort();
        directions.dedup();
        self.blocks.retain(|b| !matches!(b, OutputBlock::Exits(_)));
        self.blocks.push(OutputBlock::Exits(directions));
    }

    /// Title and text blocks joined into one narration string.
    pub fn narration(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !matches!(b, OutputBlock::Exits(_)))
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
