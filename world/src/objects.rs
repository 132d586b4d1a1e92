//! Authoritative environment object storage and identifier allocation.

use std::collections::BTreeMap;

use bw4t_core::{BlockColor, BlockShape, CellCoord, ObjectId, ZoneId};

/// Movable, collectible block stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct BlockState {
    /// Cell the block occupies, or `None` while an agent carries it.
    pub(crate) cell: Option<CellCoord>,
    /// Shape the block presents for matching.
    pub(crate) shape: BlockShape,
    /// Color the block presents for matching.
    pub(crate) color: BlockColor,
}

/// Non-interactive marker describing a required delivery.
#[derive(Clone, Debug)]
pub(crate) struct GhostState {
    /// Drop-off zone the marker belongs to.
    pub(crate) zone: ZoneId,
    /// Cell a matching block must eventually occupy.
    pub(crate) cell: CellCoord,
    /// Shape the delivered block must present.
    pub(crate) shape: BlockShape,
    /// Color the delivered block must present.
    pub(crate) color: BlockColor,
}

/// Floor tile marking a cell as part of a drop-off zone.
#[derive(Clone, Debug)]
pub(crate) struct ZoneTileState {
    /// Drop-off zone the tile belongs to.
    pub(crate) zone: ZoneId,
    /// Cell covered by the tile.
    pub(crate) cell: CellCoord,
}

/// Registry that stores environment objects and allocates identifiers.
///
/// Blocks, ghost markers, and zone tiles share one identifier space.
#[derive(Debug, Default)]
pub(crate) struct ObjectRegistry {
    blocks: BTreeMap<ObjectId, BlockState>,
    ghosts: BTreeMap<ObjectId, GhostState>,
    zone_tiles: BTreeMap<ObjectId, ZoneTileState>,
    next_object_id: u32,
}

impl ObjectRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id = self.next_object_id.saturating_add(1);
        id
    }

    pub(crate) fn insert_block(
        &mut self,
        cell: CellCoord,
        shape: BlockShape,
        color: BlockColor,
    ) -> ObjectId {
        let id = self.allocate();
        let _ = self.blocks.insert(
            id,
            BlockState {
                cell: Some(cell),
                shape,
                color,
            },
        );
        id
    }

    pub(crate) fn insert_ghost(
        &mut self,
        zone: ZoneId,
        cell: CellCoord,
        shape: BlockShape,
        color: BlockColor,
    ) -> ObjectId {
        let id = self.allocate();
        let _ = self.ghosts.insert(
            id,
            GhostState {
                zone,
                cell,
                shape,
                color,
            },
        );
        id
    }

    pub(crate) fn insert_zone_tile(&mut self, zone: ZoneId, cell: CellCoord) -> ObjectId {
        let id = self.allocate();
        let _ = self.zone_tiles.insert(id, ZoneTileState { zone, cell });
        id
    }

    pub(crate) fn block(&self, id: ObjectId) -> Option<&BlockState> {
        self.blocks.get(&id)
    }

    pub(crate) fn block_mut(&mut self, id: ObjectId) -> Option<&mut BlockState> {
        self.blocks.get_mut(&id)
    }

    pub(crate) fn blocks(&self) -> impl Iterator<Item = (ObjectId, &BlockState)> {
        self.blocks.iter().map(|(id, state)| (*id, state))
    }

    pub(crate) fn ghosts(&self) -> impl Iterator<Item = (ObjectId, &GhostState)> {
        self.ghosts.iter().map(|(id, state)| (*id, state))
    }

    pub(crate) fn zone_tiles(&self) -> impl Iterator<Item = (ObjectId, &ZoneTileState)> {
        self.zone_tiles.iter().map(|(id, state)| (*id, state))
    }

    /// Blocks currently resting on the provided cell, in ascending id order.
    pub(crate) fn blocks_at(&self, cell: CellCoord) -> Vec<ObjectId> {
        self.blocks
            .iter()
            .filter(|(_, state)| state.cell == Some(cell))
            .map(|(id, _)| *id)
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.blocks.clear();
        self.ghosts.clear();
        self.zone_tiles.clear();
        self.next_object_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_space_is_shared_and_ascending() {
        let mut registry = ObjectRegistry::new();
        let block = registry.insert_block(
            CellCoord::new(1, 1),
            BlockShape::new(0),
            BlockColor::from_rgb(0, 8, 0xff),
        );
        let ghost = registry.insert_ghost(
            ZoneId::new(0),
            CellCoord::new(2, 2),
            BlockShape::new(0),
            BlockColor::from_rgb(0, 8, 0xff),
        );
        let tile = registry.insert_zone_tile(ZoneId::new(0), CellCoord::new(2, 2));

        assert!(block < ghost);
        assert!(ghost < tile);
    }

    #[test]
    fn blocks_at_reports_ascending_identifiers() {
        let mut registry = ObjectRegistry::new();
        let cell = CellCoord::new(3, 3);
        let first = registry.insert_block(cell, BlockShape::new(0), BlockColor::from_rgb(1, 2, 3));
        let second = registry.insert_block(cell, BlockShape::new(1), BlockColor::from_rgb(4, 5, 6));
        let _elsewhere = registry.insert_block(
            CellCoord::new(9, 9),
            BlockShape::new(2),
            BlockColor::from_rgb(7, 8, 9),
        );

        assert_eq!(registry.blocks_at(cell), vec![first, second]);
    }

    #[test]
    fn carried_blocks_leave_the_grid() {
        let mut registry = ObjectRegistry::new();
        let cell = CellCoord::new(3, 3);
        let id = registry.insert_block(cell, BlockShape::new(0), BlockColor::from_rgb(1, 2, 3));

        registry.block_mut(id).expect("block exists").cell = None;
        assert!(registry.blocks_at(cell).is_empty());
    }
}
