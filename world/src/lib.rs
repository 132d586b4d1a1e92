#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Block World for Teams.

use bw4t_core::{
    AgentId, CellCoord, Command, DoorError, DropError, Event, GrabError, MoveError, ObjectId,
    PlacementError, Tick, WELCOME_BANNER,
};

mod agents;
mod objects;
mod rooms;

use agents::AgentRegistry;
use objects::ObjectRegistry;
use rooms::RoomRegistry;

/// Reach, in cells, within which agents can operate doors and grab blocks.
const INTERACTION_RANGE: u32 = 1;

/// Describes the discrete cell layout of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
}

impl Grid {
    const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cell columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the provided cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Represents the authoritative Block World state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    tick: Tick,
    rooms: RoomRegistry,
    objects: ObjectRegistry,
    agents: AgentRegistry,
}

impl World {
    /// Creates an empty world awaiting grid configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(0, 0),
            tick: Tick::new(0),
            rooms: RoomRegistry::new(),
            objects: ObjectRegistry::new(),
            agents: AgentRegistry::new(),
        }
    }

    fn reset(&mut self, columns: u32, rows: u32) {
        self.grid = Grid::new(columns, rows);
        self.tick = Tick::new(0);
        self.rooms.clear();
        self.objects.clear();
        self.agents.clear();
    }

    /// Reports whether a cell blocks entry regardless of agent occupancy.
    fn is_impassable(&self, cell: CellCoord) -> bool {
        if self.rooms.is_wall(cell) {
            return true;
        }
        matches!(self.rooms.door(cell), Some(door) if !door.open)
    }

    fn placement_target_error(&self, cell: CellCoord) -> Option<PlacementError> {
        if !self.grid.contains(cell) {
            return Some(PlacementError::OutOfBounds);
        }
        if self.is_impassable(cell) {
            return Some(PlacementError::Blocked);
        }
        None
    }

    fn move_target_error(&self, destination: Option<CellCoord>) -> Result<CellCoord, MoveError> {
        let destination = destination.ok_or(MoveError::OutOfBounds)?;
        if !self.grid.contains(destination) {
            return Err(MoveError::OutOfBounds);
        }
        if self.rooms.is_wall(destination) {
            return Err(MoveError::Wall);
        }
        if matches!(self.rooms.door(destination), Some(door) if !door.open) {
            return Err(MoveError::DoorClosed);
        }
        if self.agents.agent_at(destination).is_some() {
            return Err(MoveError::Occupied);
        }
        Ok(destination)
    }

    fn operate_door(
        &mut self,
        agent: AgentId,
        door: CellCoord,
        open: bool,
    ) -> Result<(), DoorError> {
        let agent_cell = self
            .agents
            .agent(agent)
            .ok_or(DoorError::MissingAgent)?
            .cell;
        let state = self.rooms.door(door).ok_or(DoorError::MissingDoor)?;
        if agent_cell.manhattan_distance(door) > INTERACTION_RANGE {
            return Err(DoorError::OutOfReach);
        }
        if state.open == open {
            return Err(DoorError::AlreadyInState);
        }
        self.rooms.set_door_open(door, open);
        Ok(())
    }

    fn grab_block(&mut self, agent: AgentId, object: ObjectId) -> Result<CellCoord, GrabError> {
        let agent_state = self.agents.agent(agent).ok_or(GrabError::MissingAgent)?;
        if agent_state.carried.is_some() {
            return Err(GrabError::HandsFull);
        }
        let agent_cell = agent_state.cell;

        let block_cell = self
            .objects
            .block(object)
            .and_then(|block| block.cell)
            .ok_or(GrabError::MissingBlock)?;
        if agent_cell.manhattan_distance(block_cell) > INTERACTION_RANGE {
            return Err(GrabError::OutOfReach);
        }

        if let Some(block) = self.objects.block_mut(object) {
            block.cell = None;
        }
        if let Some(state) = self.agents.agent_mut(agent) {
            state.carried = Some(object);
        }
        Ok(block_cell)
    }

    fn drop_block(&mut self, agent: AgentId) -> Result<(ObjectId, CellCoord), DropError> {
        let state = self.agents.agent(agent).ok_or(DropError::MissingAgent)?;
        let object = state.carried.ok_or(DropError::NothingCarried)?;
        let cell = state.cell;

        if let Some(block) = self.objects.block_mut(object) {
            block.cell = Some(cell);
        }
        if let Some(state) = self.agents.agent_mut(agent) {
            state.carried = None;
        }
        Ok((object, cell))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.reset(columns, rows);
            out_events.push(Event::GridConfigured { columns, rows });
        }
        Command::PlaceRoom { name, region, door } => {
            let within_grid = region.right() <= world.grid.columns()
                && region.bottom() <= world.grid.rows()
                && region.size().width() > 0
                && region.size().height() > 0;
            if !within_grid {
                out_events.push(Event::PlacementRejected {
                    reason: PlacementError::OutOfBounds,
                });
                return;
            }
            match world.rooms.insert(name, region, door) {
                Ok(room) => out_events.push(Event::RoomPlaced { room, region }),
                Err(reason) => out_events.push(Event::PlacementRejected { reason }),
            }
        }
        Command::PlaceBlock { cell, shape, color } => {
            if let Some(reason) = world.placement_target_error(cell) {
                out_events.push(Event::PlacementRejected { reason });
                return;
            }
            let object = world.objects.insert_block(cell, shape, color);
            out_events.push(Event::BlockPlaced { object, cell });
        }
        Command::PlaceGhostBlock {
            zone,
            cell,
            shape,
            color,
        } => {
            if let Some(reason) = world.placement_target_error(cell) {
                out_events.push(Event::PlacementRejected { reason });
                return;
            }
            let object = world.objects.insert_ghost(zone, cell, shape, color);
            out_events.push(Event::GhostBlockPlaced { object, zone, cell });
        }
        Command::PlaceZoneTile { zone, cell } => {
            if let Some(reason) = world.placement_target_error(cell) {
                out_events.push(Event::PlacementRejected { reason });
                return;
            }
            let object = world.objects.insert_zone_tile(zone, cell);
            out_events.push(Event::ZoneTilePlaced { object, zone, cell });
        }
        Command::SpawnAgent { cell, team } => {
            if let Some(reason) = world.placement_target_error(cell) {
                out_events.push(Event::PlacementRejected { reason });
                return;
            }
            if world.agents.agent_at(cell).is_some() {
                out_events.push(Event::PlacementRejected {
                    reason: PlacementError::Blocked,
                });
                return;
            }
            let agent = world.agents.insert(cell, team);
            out_events.push(Event::AgentSpawned { agent, cell });
        }
        Command::Tick => {
            world.tick = world.tick.next();
            out_events.push(Event::TimeAdvanced { tick: world.tick });
        }
        Command::MoveAgent { agent, direction } => {
            let Some(from) = world.agents.agent(agent).map(|state| state.cell) else {
                out_events.push(Event::MoveRejected {
                    agent,
                    direction,
                    reason: MoveError::MissingAgent,
                });
                return;
            };
            match world.move_target_error(from.step(direction)) {
                Ok(to) => {
                    if let Some(state) = world.agents.agent_mut(agent) {
                        state.cell = to;
                    }
                    out_events.push(Event::AgentMoved { agent, from, to });
                }
                Err(reason) => out_events.push(Event::MoveRejected {
                    agent,
                    direction,
                    reason,
                }),
            }
        }
        Command::OpenDoor { agent, door } => match world.operate_door(agent, door, true) {
            Ok(()) => out_events.push(Event::DoorOpened { door, agent }),
            Err(reason) => out_events.push(Event::DoorActionRejected {
                agent,
                door,
                reason,
            }),
        },
        Command::CloseDoor { agent, door } => match world.operate_door(agent, door, false) {
            Ok(()) => out_events.push(Event::DoorClosed { door, agent }),
            Err(reason) => out_events.push(Event::DoorActionRejected {
                agent,
                door,
                reason,
            }),
        },
        Command::GrabBlock { agent, object } => match world.grab_block(agent, object) {
            Ok(from) => out_events.push(Event::BlockGrabbed {
                agent,
                object,
                from,
            }),
            Err(reason) => out_events.push(Event::GrabRejected {
                agent,
                object,
                reason,
            }),
        },
        Command::DropBlock { agent } => match world.drop_block(agent) {
            Ok((object, at)) => out_events.push(Event::BlockDropped { agent, object, at }),
            Err(reason) => out_events.push(Event::DropRejected { agent, reason }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bw4t_core::{
        AgentId, BlockColor, BlockShape, CellCoord, CellRect, ObjectId, RoomId, Tick, ZoneId,
    };

    use super::{Grid, World};

    /// Retrieves the welcome banner that adapters may display to users.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the world's grid dimensions.
    #[must_use]
    pub fn grid(world: &World) -> Grid {
        world.grid
    }

    /// Current value of the simulation clock.
    #[must_use]
    pub fn tick(world: &World) -> Tick {
        world.tick
    }

    /// Reports whether agents can enter the cell, ignoring agent occupancy.
    #[must_use]
    pub fn passable(world: &World, cell: CellCoord) -> bool {
        world.grid.contains(cell) && !world.is_impassable(cell)
    }

    /// Returns the agent occupying the provided cell, if any.
    #[must_use]
    pub fn agent_at(world: &World, cell: CellCoord) -> Option<AgentId> {
        world.agents.agent_at(cell)
    }

    /// Blocks resting on the provided cell, in ascending identifier order.
    ///
    /// The first entry is the candidate the delivery checker matches against.
    #[must_use]
    pub fn blocks_at(world: &World, cell: CellCoord) -> Vec<ObjectId> {
        world.objects.blocks_at(cell)
    }

    /// Retrieves the snapshot of a single block, if the world knows it.
    #[must_use]
    pub fn block(world: &World, id: ObjectId) -> Option<BlockSnapshot> {
        world.objects.block(id).map(|state| BlockSnapshot {
            id,
            cell: state.cell,
            shape: state.shape,
            color: state.color,
            carried_by: world
                .agents
                .agents()
                .find(|(_, agent)| agent.carried == Some(id))
                .map(|(agent, _)| agent),
        })
    }

    /// Captures a read-only view of the rooms installed in the world.
    #[must_use]
    pub fn room_view(world: &World) -> RoomView {
        let snapshots = world
            .rooms
            .rooms()
            .map(|(id, state)| RoomSnapshot {
                id,
                name: state.name.clone(),
                region: state.region,
                door: state.door,
            })
            .collect();
        RoomView { snapshots }
    }

    /// Captures a read-only view of every door carved into a room wall.
    #[must_use]
    pub fn door_view(world: &World) -> DoorView {
        let mut snapshots: Vec<DoorSnapshot> = world
            .rooms
            .rooms()
            .filter_map(|(_, state)| {
                let cell = state.door?;
                let door = world.rooms.door(cell)?;
                Some(DoorSnapshot {
                    room: door.room,
                    cell,
                    open: door.open,
                })
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        DoorView { snapshots }
    }

    /// Captures a read-only view of the blocks known to the world.
    #[must_use]
    pub fn block_view(world: &World) -> BlockView {
        let carried_by = |object: ObjectId| {
            world
                .agents
                .agents()
                .find(|(_, state)| state.carried == Some(object))
                .map(|(id, _)| id)
        };
        let snapshots = world
            .objects
            .blocks()
            .map(|(id, state)| BlockSnapshot {
                id,
                cell: state.cell,
                shape: state.shape,
                color: state.color,
                carried_by: carried_by(id),
            })
            .collect();
        BlockView { snapshots }
    }

    /// Captures a read-only view of the ghost goal markers.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        let snapshots = world
            .objects
            .ghosts()
            .map(|(id, state)| GhostSnapshot {
                id,
                zone: state.zone,
                cell: state.cell,
                shape: state.shape,
                color: state.color,
            })
            .collect();
        GhostView { snapshots }
    }

    /// Captures a read-only view of the drop-off zone floor tiles.
    #[must_use]
    pub fn zone_tile_view(world: &World) -> ZoneTileView {
        let snapshots = world
            .objects
            .zone_tiles()
            .map(|(id, state)| ZoneTileSnapshot {
                id,
                zone: state.zone,
                cell: state.cell,
            })
            .collect();
        ZoneTileView { snapshots }
    }

    /// Captures a read-only view of the agents inhabiting the world.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots = world
            .agents
            .agents()
            .map(|(id, state)| AgentSnapshot {
                id,
                cell: state.cell,
                team: state.team.clone(),
                carried: state.carried,
            })
            .collect();
        AgentView { snapshots }
    }

    /// Read-only snapshot describing all rooms within the world.
    #[derive(Clone, Debug)]
    pub struct RoomView {
        snapshots: Vec<RoomSnapshot>,
    }

    impl RoomView {
        /// Iterator over the captured room snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &RoomSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<RoomSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single room used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RoomSnapshot {
        /// Identifier allocated to the room by the world.
        pub id: RoomId,
        /// Name provided when the room was placed.
        pub name: String,
        /// Region of cells spanned by the room, walls included.
        pub region: CellRect,
        /// Cell acting as the room's door, if any.
        pub door: Option<CellCoord>,
    }

    /// Read-only snapshot describing all doors within the world.
    #[derive(Clone, Debug)]
    pub struct DoorView {
        snapshots: Vec<DoorSnapshot>,
    }

    impl DoorView {
        /// Iterator over the captured door snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &DoorSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<DoorSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single door used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DoorSnapshot {
        /// Room the door belongs to.
        pub room: RoomId,
        /// Cell the door occupies.
        pub cell: CellCoord,
        /// Indicates whether agents can currently pass through.
        pub open: bool,
    }

    /// Read-only snapshot describing all blocks within the world.
    #[derive(Clone, Debug, Default)]
    pub struct BlockView {
        snapshots: Vec<BlockSnapshot>,
    }

    impl BlockView {
        /// Iterator over the captured block snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &BlockSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<BlockSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single block used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BlockSnapshot {
        /// Identifier allocated to the block by the world.
        pub id: ObjectId,
        /// Cell the block occupies, or `None` while carried.
        pub cell: Option<CellCoord>,
        /// Shape the block presents for matching.
        pub shape: BlockShape,
        /// Color the block presents for matching.
        pub color: BlockColor,
        /// Agent carrying the block, if any.
        pub carried_by: Option<AgentId>,
    }

    /// Read-only snapshot describing all ghost goal markers within the world.
    #[derive(Clone, Debug, Default)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Iterator over the captured ghost snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<GhostSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single ghost goal marker.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GhostSnapshot {
        /// Identifier allocated to the marker by the world.
        pub id: ObjectId,
        /// Drop-off zone the marker belongs to.
        pub zone: ZoneId,
        /// Cell a matching block must eventually occupy.
        pub cell: CellCoord,
        /// Shape the delivered block must present.
        pub shape: BlockShape,
        /// Color the delivered block must present.
        pub color: BlockColor,
    }

    /// Read-only snapshot describing all drop-off zone tiles.
    #[derive(Clone, Debug, Default)]
    pub struct ZoneTileView {
        snapshots: Vec<ZoneTileSnapshot>,
    }

    impl ZoneTileView {
        /// Iterator over the captured tile snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &ZoneTileSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ZoneTileSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single drop-off zone tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ZoneTileSnapshot {
        /// Identifier allocated to the tile by the world.
        pub id: ObjectId,
        /// Drop-off zone the tile belongs to.
        pub zone: ZoneId,
        /// Cell covered by the tile.
        pub cell: CellCoord,
    }

    /// Read-only snapshot describing all agents within the world.
    #[derive(Clone, Debug, Default)]
    pub struct AgentView {
        snapshots: Vec<AgentSnapshot>,
    }

    impl AgentView {
        /// Iterator over the captured agent snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<AgentSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single agent used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct AgentSnapshot {
        /// Identifier allocated to the agent by the world.
        pub id: AgentId,
        /// Cell the agent currently occupies.
        pub cell: CellCoord,
        /// Team label the agent was spawned with.
        pub team: String,
        /// Block the agent carries, if any.
        pub carried: Option<ObjectId>,
    }
}
