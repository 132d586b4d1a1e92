#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural layout generation for Block World scenarios.
//!
//! Turns a [`LayoutConfig`] into a [`WorldPlan`]: room and door geometry,
//! probabilistically sampled collectible blocks, ranked drop-off zones with
//! their ghost goal markers, and agent spawn cells. The plan lowers to a
//! command batch the adapter submits to the world.

use bw4t_core::{
    BlockColor, BlockShape, CellCoord, CellRect, CellRectSize, Command, ZoneId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const RNG_STREAM_BLOCK_PRESENCE: &str = "block-presence";
const RNG_STREAM_BLOCK_APPEARANCE: &str = "block-appearance";
const RNG_STREAM_GHOST_APPEARANCE: &str = "ghost-appearance";

/// Name assigned to the door-less room that seals the world perimeter.
pub const WORLD_BOUNDS_NAME: &str = "world_bounds";

/// Configuration parameters consumed by the layout generator.
///
/// The defaults reproduce the classic teaching scenario: three rooms in one
/// row, one drop-off zone requiring three deliveries, and two agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of each room in cells, walls included.
    pub room_width: u32,
    /// Height of each room in cells, walls included.
    pub room_height: u32,
    /// Number of rooms to place.
    pub room_count: u32,
    /// Maximum number of rooms placed side by side before wrapping.
    pub rooms_per_row: u32,
    /// Expected number of blocks sampled into each room.
    pub average_blocks_per_room: f64,
    /// Shapes blocks and ghost markers draw from.
    pub block_shapes: Vec<BlockShape>,
    /// Colors blocks and ghost markers draw from.
    pub block_colors: Vec<BlockColor>,
    /// Number of drop-off zones to place.
    pub drop_zone_count: u32,
    /// Number of deliveries each drop-off zone requires.
    pub blocks_needed: u32,
    /// Width of the hallways surrounding rooms, in cells.
    pub hallway_space: u32,
    /// Number of teams to spawn agents for.
    pub team_count: u32,
    /// Number of agents spawned per team.
    pub agents_per_team: u32,
    /// Seed all layout sampling derives from.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            room_width: 5,
            room_height: 5,
            room_count: 3,
            rooms_per_row: 3,
            average_blocks_per_room: 3.0,
            block_shapes: vec![BlockShape::new(0)],
            block_colors: vec![
                BlockColor::from_rgb(0x00, 0x08, 0xff),
                BlockColor::from_rgb(0xff, 0x15, 0x00),
                BlockColor::from_rgb(0x0d, 0xff, 0x00),
            ],
            drop_zone_count: 1,
            blocks_needed: 3,
            hallway_space: 2,
            team_count: 1,
            agents_per_team: 2,
            seed: 1,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), LayoutError> {
        if self.room_count == 0 {
            return Err(LayoutError::NoRooms);
        }
        if self.rooms_per_row == 0 {
            return Err(LayoutError::NoRoomsPerRow);
        }
        if self.room_width < 3 || self.room_height < 3 {
            return Err(LayoutError::RoomTooSmall {
                width: self.room_width,
                height: self.room_height,
            });
        }
        if !self.average_blocks_per_room.is_finite() || self.average_blocks_per_room < 0.0 {
            return Err(LayoutError::InvalidBlockAverage(
                self.average_blocks_per_room,
            ));
        }
        if self.block_shapes.is_empty() {
            return Err(LayoutError::EmptyShapePalette);
        }
        if self.block_colors.is_empty() {
            return Err(LayoutError::EmptyColorPalette);
        }
        if self.drop_zone_count == 0 {
            return Err(LayoutError::NoDropZones);
        }
        if self.blocks_needed == 0 {
            return Err(LayoutError::NoBlocksNeeded);
        }

        let (columns, _) = world_size(self);
        let agent_count = self.team_count.saturating_mul(self.agents_per_team);
        if agent_count > columns.saturating_sub(2) {
            return Err(LayoutError::TooManyAgents {
                agents: agent_count,
                capacity: columns.saturating_sub(2),
            });
        }
        Ok(())
    }
}

/// Reasons a configuration cannot be turned into a world plan.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The configuration requests zero rooms.
    #[error("at least one room is required")]
    NoRooms,
    /// The configuration requests zero rooms per row.
    #[error("at least one room per row is required")]
    NoRoomsPerRow,
    /// Rooms must be large enough to hold walls, a door, and an interior.
    #[error("room size {width}x{height} leaves no interior")]
    RoomTooSmall {
        /// Configured room width.
        width: u32,
        /// Configured room height.
        height: u32,
    },
    /// The expected block count per room is negative or not a number.
    #[error("average blocks per room {0} is not usable")]
    InvalidBlockAverage(f64),
    /// No block shapes were provided to sample from.
    #[error("block shape palette is empty")]
    EmptyShapePalette,
    /// No block colors were provided to sample from.
    #[error("block color palette is empty")]
    EmptyColorPalette,
    /// The configuration requests zero drop-off zones.
    #[error("at least one drop-off zone is required")]
    NoDropZones,
    /// Drop-off zones must require at least one delivery.
    #[error("at least one needed block per zone is required")]
    NoBlocksNeeded,
    /// The spawn row cannot hold the requested number of agents.
    #[error("{agents} agents do not fit the spawn row capacity of {capacity}")]
    TooManyAgents {
        /// Total agents requested across all teams.
        agents: u32,
        /// Free cells available on the spawn row.
        capacity: u32,
    },
}

/// Complete placement plan derived from a [`LayoutConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldPlan {
    /// Number of cell columns in the generated world.
    pub columns: u32,
    /// Number of cell rows in the generated world.
    pub rows: u32,
    /// Rooms to install, the sealed world perimeter included.
    pub rooms: Vec<RoomPlan>,
    /// Collectible blocks sampled into room interiors.
    pub blocks: Vec<BlockPlan>,
    /// Drop-off zones with their floor tiles and ghost goal markers.
    pub zones: Vec<ZonePlan>,
    /// Agent spawn cells on the top hallway row.
    pub agents: Vec<AgentPlan>,
}

impl WorldPlan {
    /// Lowers the plan into the command batch that realises it.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::ConfigureGrid {
            columns: self.columns,
            rows: self.rows,
        }];
        for room in &self.rooms {
            commands.push(Command::PlaceRoom {
                name: room.name.clone(),
                region: room.region,
                door: room.door,
            });
        }
        for block in &self.blocks {
            commands.push(Command::PlaceBlock {
                cell: block.cell,
                shape: block.shape,
                color: block.color,
            });
        }
        for zone in &self.zones {
            for tile in &zone.tiles {
                commands.push(Command::PlaceZoneTile {
                    zone: zone.zone,
                    cell: *tile,
                });
            }
            for ghost in &zone.ghosts {
                commands.push(Command::PlaceGhostBlock {
                    zone: zone.zone,
                    cell: ghost.cell,
                    shape: ghost.shape,
                    color: ghost.color,
                });
            }
        }
        for agent in &self.agents {
            commands.push(Command::SpawnAgent {
                cell: agent.cell,
                team: agent.team.clone(),
            });
        }
        commands
    }
}

/// Room described by a world plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomPlan {
    /// Name the room is installed under.
    pub name: String,
    /// Region of cells spanned by the room, walls included.
    pub region: CellRect,
    /// Door cell on the room's bottom wall, absent for the world perimeter.
    pub door: Option<CellCoord>,
}

/// Collectible block described by a world plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPlan {
    /// Cell the block initially occupies.
    pub cell: CellCoord,
    /// Sampled shape.
    pub shape: BlockShape,
    /// Sampled color.
    pub color: BlockColor,
}

/// Drop-off zone described by a world plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZonePlan {
    /// Identifier of the zone.
    pub zone: ZoneId,
    /// Floor tiles covered by the zone, top to bottom.
    pub tiles: Vec<CellCoord>,
    /// Ghost goal markers, bottom to top. The bottom marker is rank 0.
    pub ghosts: Vec<GhostPlan>,
}

/// Ghost goal marker described by a world plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostPlan {
    /// Cell a matching block must eventually occupy.
    pub cell: CellCoord,
    /// Sampled shape the delivery must match.
    pub shape: BlockShape,
    /// Sampled color the delivery must match.
    pub color: BlockColor,
}

/// Agent spawn described by a world plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentPlan {
    /// Cell the agent spawns on.
    pub cell: CellCoord,
    /// Team label the agent carries.
    pub team: String,
}

/// Computes the grid dimensions implied by the provided configuration.
///
/// The width must fit either the widest room row or the spread of drop-off
/// zones; the height stacks room rows, hallways, and the zone columns.
#[must_use]
pub fn world_size(config: &LayoutConfig) -> (u32, u32) {
    let room_rows = config.room_count.div_ceil(config.rooms_per_row);

    let rooms_width = config.rooms_per_row * config.room_width + 2 * config.hallway_space;
    let zones_width =
        (config.drop_zone_count + 1) * config.hallway_space + config.drop_zone_count;
    let width = rooms_width.max(zones_width) + 2;

    let height = room_rows * config.room_height
        + (room_rows + 1) * config.hallway_space
        + config.blocks_needed
        + 2;

    (width, height)
}

/// Generates the world plan for the provided configuration.
pub fn generate(config: &LayoutConfig) -> Result<WorldPlan, LayoutError> {
    config.validate()?;

    let (columns, rows) = world_size(config);
    let mut presence_rng = stream_rng(config.seed, RNG_STREAM_BLOCK_PRESENCE);
    let mut appearance_rng = stream_rng(config.seed, RNG_STREAM_BLOCK_APPEARANCE);
    let mut ghost_rng = stream_rng(config.seed, RNG_STREAM_GHOST_APPEARANCE);

    let mut rooms = vec![RoomPlan {
        name: WORLD_BOUNDS_NAME.to_owned(),
        region: CellRect::from_origin_and_size(
            CellCoord::new(0, 0),
            CellRectSize::new(columns, rows),
        ),
        door: None,
    }];
    let mut blocks = Vec::new();

    for room_nr in 0..config.room_count {
        let row = room_nr / config.rooms_per_row;
        let column = room_nr % config.rooms_per_row;

        let room_x = 2 + config.hallway_space + config.room_width * column;
        let room_y = 2 + config.hallway_space * (row + 1) + config.room_height * row;
        let origin = CellCoord::new(room_x, room_y);

        // Door sits on the bottom wall, just right of the room's center.
        let door = CellCoord::new(
            room_x + config.room_width.div_ceil(2),
            room_y + config.room_height - 1,
        );

        rooms.push(RoomPlan {
            name: format!("room_{room_nr}"),
            region: CellRect::from_origin_and_size(
                origin,
                CellRectSize::new(config.room_width, config.room_height),
            ),
            door: Some(door),
        });

        let candidates = block_candidate_cells(origin, door, config.room_width);
        if candidates.is_empty() {
            continue;
        }
        let probability =
            (config.average_blocks_per_room / candidates.len() as f64).min(1.0);
        for cell in candidates {
            if !presence_rng.gen_bool(probability) {
                continue;
            }
            let (shape, color) = sample_appearance(&mut appearance_rng, config);
            blocks.push(BlockPlan { cell, shape, color });
        }
    }

    let mut zones = Vec::new();
    let zone_stride = config.hallway_space + 1;
    let mut zone_x = columns.div_ceil(2) - (config.drop_zone_count / 2) * zone_stride;
    let bottom_row = rows - 2;
    for zone_nr in 0..config.drop_zone_count {
        let top_row = bottom_row - (config.blocks_needed - 1);
        let tiles = (top_row..=bottom_row)
            .map(|row| CellCoord::new(zone_x, row))
            .collect();
        let ghosts = (0..config.blocks_needed)
            .map(|rank| {
                let (shape, color) = sample_appearance(&mut ghost_rng, config);
                GhostPlan {
                    cell: CellCoord::new(zone_x, bottom_row - rank),
                    shape,
                    color,
                }
            })
            .collect();
        zones.push(ZonePlan {
            zone: ZoneId::new(zone_nr),
            tiles,
            ghosts,
        });
        zone_x += zone_stride;
    }

    let mut agents = Vec::new();
    let mut spawn_x = 1;
    for team_nr in 0..config.team_count {
        let team = format!("Team {team_nr}");
        for _ in 0..config.agents_per_team {
            agents.push(AgentPlan {
                cell: CellCoord::new(spawn_x, 1),
                team: team.clone(),
            });
            spawn_x += 1;
        }
    }

    Ok(WorldPlan {
        columns,
        rows,
        rooms,
        blocks,
        zones,
        agents,
    })
}

/// Interior cells of a room that may receive a sampled block.
///
/// Rows start one above the door row and skip every other row upward; the
/// door's column stays free so deliveries are never walled in behind it.
fn block_candidate_cells(origin: CellCoord, door: CellCoord, room_width: u32) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    let mut row = door.row() - 1;
    while row > origin.row() {
        for column in (origin.column() + 1)..door.column() {
            cells.push(CellCoord::new(column, row));
        }
        for column in (door.column() + 1)..(origin.column() + room_width - 1) {
            cells.push(CellCoord::new(column, row));
        }
        if row < origin.row() + 2 {
            break;
        }
        row -= 2;
    }
    cells
}

fn sample_appearance(rng: &mut ChaCha8Rng, config: &LayoutConfig) -> (BlockShape, BlockColor) {
    let shape = config.block_shapes[rng.gen_range(0..config.block_shapes.len())];
    let color = config.block_colors[rng.gen_range(0..config.block_colors.len())];
    (shape, color)
}

fn stream_rng(seed: u64, label: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_labeled_seed(seed, label))
}

fn derive_labeled_seed(seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
