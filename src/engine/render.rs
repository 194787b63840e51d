use crate::engine::output::Output;
use crate::store::Exits;
use crate::world::Room;

pub fn render_room(out: &mut Output, room: &Room, exits: &Exits) {
    out.title(room.name.clone());
    out.say(room.description.trim());
    out.items(&room.items);
    render_exits(out, exits);
}

pub fn render_exits(out: &mut Output, exits: &Exits) {
    out.set_exits(exits.keys().cloned().collect());
}

/// Narration for a current room id the store does not know.
pub fn render_unknown_room(out: &mut Output, exits: &Exits) {
    out.say("You are somewhere the map does not describe. Everything is grey and indistinct.");
    render_exits(out, exits);
}
