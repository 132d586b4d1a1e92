#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Block World for Teams scenario.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Canonical banner emitted when the scenario boots.
pub const WELCOME_BANNER: &str = "Welcome to Block World for Teams.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the world to an empty grid with the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
    },
    /// Installs a walled room, optionally carrying a single door cell.
    PlaceRoom {
        /// Human-readable name identifying the room.
        name: String,
        /// Region of cells spanned by the room, walls included.
        region: CellRect,
        /// Cell on the room's perimeter that acts as its door, if any.
        door: Option<CellCoord>,
    },
    /// Places a movable, collectible block at the provided cell.
    PlaceBlock {
        /// Cell the block initially occupies.
        cell: CellCoord,
        /// Shape the block presents to agents and the goal checker.
        shape: BlockShape,
        /// Color the block presents to agents and the goal checker.
        color: BlockColor,
    },
    /// Places a non-interactive ghost marker describing a required delivery.
    PlaceGhostBlock {
        /// Drop-off zone the marker belongs to.
        zone: ZoneId,
        /// Cell a matching block must eventually occupy.
        cell: CellCoord,
        /// Shape the delivered block must present.
        shape: BlockShape,
        /// Color the delivered block must present.
        color: BlockColor,
    },
    /// Marks a cell as part of a drop-off zone's floor area.
    PlaceZoneTile {
        /// Drop-off zone the tile belongs to.
        zone: ZoneId,
        /// Cell covered by the tile.
        cell: CellCoord,
    },
    /// Spawns an agent at the provided cell.
    SpawnAgent {
        /// Cell the agent initially occupies.
        cell: CellCoord,
        /// Team label the agent reports in snapshots.
        team: String,
    },
    /// Advances the simulation clock by one tick.
    Tick,
    /// Requests that an agent advance a single cell in the given direction.
    MoveAgent {
        /// Identifier of the agent attempting to move.
        agent: AgentId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that an agent open the door at the provided cell.
    OpenDoor {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Cell of the door to operate.
        door: CellCoord,
    },
    /// Requests that an agent close the door at the provided cell.
    CloseDoor {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Cell of the door to operate.
        door: CellCoord,
    },
    /// Requests that an agent pick up the identified block.
    GrabBlock {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Identifier of the block to pick up.
        object: ObjectId,
    },
    /// Requests that an agent put down its carried block at its own cell.
    DropBlock {
        /// Identifier of the acting agent.
        agent: AgentId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was reset to the provided dimensions.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
    },
    /// Confirms that a room was installed into the world.
    RoomPlaced {
        /// Identifier assigned to the room by the world.
        room: RoomId,
        /// Region of cells spanned by the room, walls included.
        region: CellRect,
    },
    /// Confirms that a block was placed into the world.
    BlockPlaced {
        /// Identifier assigned to the block by the world.
        object: ObjectId,
        /// Cell the block occupies.
        cell: CellCoord,
    },
    /// Confirms that a ghost goal marker was placed into the world.
    GhostBlockPlaced {
        /// Identifier assigned to the marker by the world.
        object: ObjectId,
        /// Drop-off zone the marker belongs to.
        zone: ZoneId,
        /// Cell a matching block must eventually occupy.
        cell: CellCoord,
    },
    /// Confirms that a drop-off zone tile was placed into the world.
    ZoneTilePlaced {
        /// Identifier assigned to the tile by the world.
        object: ObjectId,
        /// Drop-off zone the tile belongs to.
        zone: ZoneId,
        /// Cell covered by the tile.
        cell: CellCoord,
    },
    /// Confirms that an agent was spawned into the world.
    AgentSpawned {
        /// Identifier assigned to the agent by the world.
        agent: AgentId,
        /// Cell the agent occupies after spawning.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick value reached after advancing the clock.
        tick: Tick,
    },
    /// Confirms that an agent successfully moved between two cells.
    AgentMoved {
        /// Identifier of the agent that advanced.
        agent: AgentId,
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after completing the move.
        to: CellCoord,
    },
    /// Confirms that a door transitioned to its open state.
    DoorOpened {
        /// Cell of the operated door.
        door: CellCoord,
        /// Identifier of the agent that operated the door.
        agent: AgentId,
    },
    /// Confirms that a door transitioned to its closed state.
    DoorClosed {
        /// Cell of the operated door.
        door: CellCoord,
        /// Identifier of the agent that operated the door.
        agent: AgentId,
    },
    /// Confirms that an agent picked up a block.
    BlockGrabbed {
        /// Identifier of the carrying agent.
        agent: AgentId,
        /// Identifier of the grabbed block.
        object: ObjectId,
        /// Cell the block occupied before leaving the grid.
        from: CellCoord,
    },
    /// Confirms that an agent put down its carried block.
    BlockDropped {
        /// Identifier of the delivering agent.
        agent: AgentId,
        /// Identifier of the dropped block.
        object: ObjectId,
        /// Cell the block occupies after the drop.
        at: CellCoord,
    },
    /// Reports that a placement command was rejected.
    PlacementRejected {
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a movement request was rejected.
    MoveRejected {
        /// Identifier of the agent that attempted to move.
        agent: AgentId,
        /// Direction of the attempted step.
        direction: Direction,
        /// Specific reason the step failed.
        reason: MoveError,
    },
    /// Reports that a door operation was rejected.
    DoorActionRejected {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Cell of the targeted door.
        door: CellCoord,
        /// Specific reason the operation failed.
        reason: DoorError,
    },
    /// Reports that a grab request was rejected.
    GrabRejected {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Identifier of the targeted block.
        object: ObjectId,
        /// Specific reason the grab failed.
        reason: GrabError,
    },
    /// Reports that a drop request was rejected.
    DropRejected {
        /// Identifier of the acting agent.
        agent: AgentId,
        /// Specific reason the drop failed.
        reason: DropError,
    },
}

/// Discrete simulation time step counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tick(u64);

impl Tick {
    /// Creates a tick counter with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tick.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the tick that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an environment object.
///
/// Blocks, ghost markers, and zone tiles share one identifier space so any
/// object can be addressed uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a drop-off zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a new zone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position within a drop-off zone's delivery order.
///
/// Rank 0 is the slot closest to the bottom of the grid; deliveries must
/// land in ascending rank order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(u32);

impl Rank {
    /// Creates a new rank with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the rank.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Shape a block presents to agents and the goal checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockShape(u8);

impl BlockShape {
    /// Creates a new shape tag with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the shape.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Color a block presents to agents and the goal checker.
///
/// Serializes as a `#rrggbb` string so scenario files can use the familiar
/// hex palette notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl BlockColor {
    /// Creates a new block color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for BlockColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Error produced when parsing a `#rrggbb` color string fails.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a #rrggbb color string")]
pub struct ColorParseError(String);

impl FromStr for BlockColor {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(value.to_owned()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(value.to_owned()));
        }

        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(value.to_owned()))
        };

        Ok(Self {
            red: component(0..2)?,
            green: component(2..4)?,
            blue: component(4..6)?,
        })
    }
}

impl Serialize for BlockColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row 0 is the top of the grid; larger rows sit closer to the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in the provided direction, when one
    /// exists within the coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Exclusive column bound of the rectangle.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.origin.column().saturating_add(self.size.width())
    }

    /// Exclusive row bound of the rectangle.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.origin.row().saturating_add(self.size.height())
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.origin.column()
            && cell.column() < self.right()
            && cell.row() >= self.origin.row()
            && cell.row() < self.bottom()
    }

    /// Reports whether the provided cell lies on the rectangle's perimeter.
    #[must_use]
    pub fn on_perimeter(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && (cell.column() == self.origin.column()
                || cell.column() == self.right().saturating_sub(1)
                || cell.row() == self.origin.row()
                || cell.row() == self.bottom().saturating_sub(1))
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Reasons a placement command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested region or cell extends beyond the configured grid.
    #[error("placement extends beyond the grid bounds")]
    OutOfBounds,
    /// The requested door cell does not lie on the room's perimeter.
    #[error("door cell is not part of the room's wall")]
    DoorNotOnWall,
    /// The requested cell is blocked by a wall, door, or agent.
    #[error("target cell is blocked")]
    Blocked,
}

/// Reasons a movement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// No agent with the provided identifier exists.
    #[error("no such agent")]
    MissingAgent,
    /// The destination lies beyond the configured grid.
    #[error("destination is outside the grid")]
    OutOfBounds,
    /// The destination cell is a wall.
    #[error("destination is a wall")]
    Wall,
    /// The destination cell is a door in its closed state.
    #[error("destination door is closed")]
    DoorClosed,
    /// The destination cell is occupied by another agent.
    #[error("destination is occupied by another agent")]
    Occupied,
}

/// Reasons a door operation may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum DoorError {
    /// No agent with the provided identifier exists.
    #[error("no such agent")]
    MissingAgent,
    /// No door exists at the provided cell.
    #[error("no door at the target cell")]
    MissingDoor,
    /// The acting agent stands too far from the door.
    #[error("door is out of reach")]
    OutOfReach,
    /// The door is already in the requested state.
    #[error("door is already in the requested state")]
    AlreadyInState,
}

/// Reasons a grab request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GrabError {
    /// No agent with the provided identifier exists.
    #[error("no such agent")]
    MissingAgent,
    /// No movable block with the provided identifier sits on the grid.
    #[error("no such block on the grid")]
    MissingBlock,
    /// The targeted block sits too far from the acting agent.
    #[error("block is out of reach")]
    OutOfReach,
    /// The acting agent already carries a block.
    #[error("agent already carries a block")]
    HandsFull,
}

/// Reasons a drop request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum DropError {
    /// No agent with the provided identifier exists.
    #[error("no such agent")]
    MissingAgent,
    /// The acting agent carries nothing.
    #[error("agent carries no block")]
    NothingCarried,
}
