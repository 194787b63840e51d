//! Rectangular lattice worlds.

use crate::store::{StoreError, WorldStore};

use super::model::Room;

/// Placeholder item on every room where `(row + col)` is even.
pub const GRID_ITEM: &str = "stone";

pub fn grid_room_id(row: usize, col: usize) -> String {
    format!("room_{row}_{col}")
}

fn grid_room(row: usize, col: usize) -> Room {
    let room = Room::new(
        grid_room_id(row, col),
        format!("Room ({row}, {col})"),
        format!("You are in the room at row {row}, column {col}."),
    );
    if (row + col) % 2 == 0 {
        room.with_items([GRID_ITEM])
    } else {
        room
    }
}

/// Resets `store`, then writes a `size` x `size` lattice wired to its
/// north/south/east/west neighbours. Edge rooms get no exit off the grid.
pub fn populate_grid<S: WorldStore + ?Sized>(store: &mut S, size: usize) -> Result<(), StoreError> {
    store.reset()?;

    for row in 0..size {
        for col in 0..size {
            store.put_room(grid_room(row, col))?;
        }
    }

    for row in 0..size {
        for col in 0..size {
            let here = grid_room_id(row, col);
            if row > 0 {
                store.connect(&here, &grid_room_id(row - 1, col), "north")?;
            }
            if row + 1 < size {
                store.connect(&here, &grid_room_id(row + 1, col), "south")?;
            }
            if col + 1 < size {
                store.connect(&here, &grid_room_id(row, col + 1), "east")?;
            }
            if col > 0 {
                store.connect(&here, &grid_room_id(row, col - 1), "west")?;
            }
        }
    }

    tracing::debug!(size, rooms = size * size, "generated grid world");
    Ok(())
}
