//! Authoritative room, wall, and door bookkeeping.

use std::collections::{BTreeMap, BTreeSet};

use bw4t_core::{CellCoord, CellRect, PlacementError, RoomId};

/// Room stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct RoomState {
    /// Human-readable name provided at placement time.
    pub(crate) name: String,
    /// Region of cells spanned by the room, walls included.
    pub(crate) region: CellRect,
    /// Cell on the perimeter that acts as the room's door, if any.
    pub(crate) door: Option<CellCoord>,
}

/// State of a single door carved into a room wall.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DoorState {
    pub(crate) room: RoomId,
    pub(crate) open: bool,
}

/// Registry that stores rooms and derives wall and door lookups.
#[derive(Debug, Default)]
pub(crate) struct RoomRegistry {
    entries: BTreeMap<RoomId, RoomState>,
    walls: BTreeSet<CellCoord>,
    doors: BTreeMap<CellCoord, DoorState>,
    next_room_id: u32,
}

impl RoomRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs a room, registering its perimeter as walls.
    ///
    /// The door cell, when provided, is excluded from the wall set and starts
    /// in its closed state.
    pub(crate) fn insert(
        &mut self,
        name: String,
        region: CellRect,
        door: Option<CellCoord>,
    ) -> Result<RoomId, PlacementError> {
        if let Some(door) = door {
            if !region.on_perimeter(door) {
                return Err(PlacementError::DoorNotOnWall);
            }
        }

        let id = RoomId::new(self.next_room_id);
        self.next_room_id = self.next_room_id.saturating_add(1);

        for column in region.origin().column()..region.right() {
            for row in region.origin().row()..region.bottom() {
                let cell = CellCoord::new(column, row);
                if !region.on_perimeter(cell) {
                    continue;
                }
                if door == Some(cell) {
                    continue;
                }
                let _ = self.walls.insert(cell);
            }
        }

        if let Some(door) = door {
            let _ = self.doors.insert(door, DoorState { room: id, open: false });
        }

        let _ = self.entries.insert(id, RoomState { name, region, door });
        Ok(id)
    }

    pub(crate) fn is_wall(&self, cell: CellCoord) -> bool {
        self.walls.contains(&cell)
    }

    pub(crate) fn door(&self, cell: CellCoord) -> Option<DoorState> {
        self.doors.get(&cell).copied()
    }

    pub(crate) fn set_door_open(&mut self, cell: CellCoord, open: bool) {
        if let Some(state) = self.doors.get_mut(&cell) {
            state.open = open;
        }
    }

    pub(crate) fn rooms(&self) -> impl Iterator<Item = (RoomId, &RoomState)> {
        self.entries.iter().map(|(id, state)| (*id, state))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.walls.clear();
        self.doors.clear();
        self.next_room_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw4t_core::CellRectSize;

    fn region() -> CellRect {
        CellRect::from_origin_and_size(CellCoord::new(2, 2), CellRectSize::new(5, 5))
    }

    #[test]
    fn door_cell_is_not_a_wall() {
        let mut registry = RoomRegistry::new();
        let door = CellCoord::new(4, 6);
        let _ = registry
            .insert("room_0".to_owned(), region(), Some(door))
            .expect("room inserts");

        assert!(!registry.is_wall(door));
        assert!(registry.is_wall(CellCoord::new(2, 2)));
        assert!(registry.is_wall(CellCoord::new(6, 6)));
        assert!(!registry.is_wall(CellCoord::new(4, 4)));
        assert!(!registry.door(door).expect("door exists").open);
    }

    #[test]
    fn door_off_the_perimeter_is_rejected() {
        let mut registry = RoomRegistry::new();
        let result = registry.insert("room_0".to_owned(), region(), Some(CellCoord::new(4, 4)));
        assert_eq!(result, Err(PlacementError::DoorNotOnWall));
    }

    #[test]
    fn doorless_rooms_seal_their_perimeter() {
        let mut registry = RoomRegistry::new();
        let _ = registry
            .insert("world_bounds".to_owned(), region(), None)
            .expect("room inserts");

        for column in 2..7 {
            assert!(registry.is_wall(CellCoord::new(column, 2)));
            assert!(registry.is_wall(CellCoord::new(column, 6)));
        }
    }
}
