mod movement;
mod output;
mod render;
mod transcript;

pub use movement::{
    DirectionMatch, compass_direction, match_direction, resolve_exit, strip_move_verb,
};
pub use output::{Output, OutputBlock};
pub use render::{render_exits, render_room, render_unknown_room};
pub use transcript::{Message, MessageKind, Transcript};
