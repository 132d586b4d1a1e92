#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Delivery-order checking for drop-off zones.
//!
//! The goal is initialised in two explicit phases: [`CollectionGoal::discover`]
//! scans the world's ghost goal markers once and builds the per-zone rank
//! slots, and [`CollectionGoal::evaluate`] re-scans the slot locations on
//! every tick, stamping deliveries and recomputing satisfaction wholesale.

use std::collections::BTreeMap;

use bw4t_core::{BlockColor, BlockShape, CellCoord, Rank, Tick, ZoneId};
use bw4t_world::{query, World};
use thiserror::Error;

/// One required delivery within a drop-off zone.
///
/// Slots are created once at discovery and mutated in place every tick; they
/// are never destroyed during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankSlot {
    rank: Rank,
    cell: CellCoord,
    shape: BlockShape,
    color: BlockColor,
    delivered: Option<Tick>,
}

impl RankSlot {
    /// Position of the slot within its zone's delivery order.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// Cell a matching block must occupy.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Shape the delivered block must present.
    #[must_use]
    pub const fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Color the delivered block must present.
    #[must_use]
    pub const fn color(&self) -> BlockColor {
        self.color
    }

    /// Tick the slot's delivery was first observed, if it still holds.
    #[must_use]
    pub const fn delivered(&self) -> Option<Tick> {
        self.delivered
    }
}

/// Outcome of a single goal evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalReport {
    /// Indicates whether every zone received its deliveries in order.
    pub satisfied: bool,
    /// Number of slots satisfied across all zones, counted per zone as the
    /// longest prefix of ranks delivered in strictly increasing tick order.
    pub progress: u32,
    /// Total number of slots across all zones.
    pub total: u32,
}

impl GoalReport {
    /// Progress expressed as a fraction of the total slot count.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.progress) / f64::from(self.total)
    }
}

/// Errors surfaced while discovering drop-off zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The world holds no ghost goal markers to build zones from.
    #[error("no ghost goal markers found in the world")]
    NoGoalBlocks,
    /// A zone's markers do not form one contiguous column.
    #[error("ghost goal markers of zone {0:?} do not form a contiguous column")]
    BrokenColumn(ZoneId),
}

/// Tracks per-zone delivery order against the world's ghost goal markers.
#[derive(Clone, Debug)]
pub struct CollectionGoal {
    zones: BTreeMap<ZoneId, Vec<RankSlot>>,
}

impl CollectionGoal {
    /// One-time setup: builds rank slots from the world's ghost markers.
    ///
    /// Markers are grouped by zone and ranked by descending row, so the
    /// marker closest to the bottom of the grid becomes rank 0.
    pub fn discover(world: &World) -> Result<Self, DiscoveryError> {
        let mut markers: BTreeMap<ZoneId, Vec<query::GhostSnapshot>> = BTreeMap::new();
        for ghost in query::ghost_view(world).iter() {
            markers.entry(ghost.zone).or_default().push(*ghost);
        }
        if markers.is_empty() {
            return Err(DiscoveryError::NoGoalBlocks);
        }

        let mut zones = BTreeMap::new();
        for (zone, ghosts) in markers {
            let bottom = ghosts
                .iter()
                .map(|ghost| ghost.cell)
                .max_by_key(|cell| cell.row())
                .ok_or(DiscoveryError::BrokenColumn(zone))?;

            let mut slots = Vec::with_capacity(ghosts.len());
            for rank in 0..ghosts.len() as u32 {
                let cell = bottom
                    .row()
                    .checked_sub(rank)
                    .map(|row| CellCoord::new(bottom.column(), row))
                    .ok_or(DiscoveryError::BrokenColumn(zone))?;
                let ghost = ghosts
                    .iter()
                    .find(|ghost| ghost.cell == cell)
                    .ok_or(DiscoveryError::BrokenColumn(zone))?;
                slots.push(RankSlot {
                    rank: Rank::new(rank),
                    cell,
                    shape: ghost.shape,
                    color: ghost.color,
                    delivered: None,
                });
            }
            let _ = zones.insert(zone, slots);
        }

        Ok(Self { zones })
    }

    /// Per-tick update: stamps deliveries and recomputes satisfaction.
    ///
    /// A slot's stamp is set when the first block at its location matches the
    /// expected shape and color and the stamp was previously unset; it is
    /// cleared when no block is present; a mismatched block leaves the stamp
    /// untouched.
    pub fn evaluate(&mut self, world: &World) -> GoalReport {
        let now = query::tick(world);

        for slots in self.zones.values_mut() {
            for slot in slots.iter_mut() {
                let blocks = query::blocks_at(world, slot.cell);
                match blocks.first() {
                    Some(first) => {
                        let matches = query::block(world, *first).is_some_and(|block| {
                            block.shape == slot.shape && block.color == slot.color
                        });
                        if matches && slot.delivered.is_none() {
                            slot.delivered = Some(now);
                        }
                    }
                    None => slot.delivered = None,
                }
            }
        }

        self.report()
    }

    /// Recomputes satisfaction and progress from the current stamps.
    fn report(&self) -> GoalReport {
        let mut satisfied = true;
        let mut progress = 0;
        let mut total = 0;

        for slots in self.zones.values() {
            let mut prefix = 0u32;
            let mut previous: Option<Tick> = None;
            for slot in slots {
                match slot.delivered {
                    Some(tick) if previous.map_or(true, |earlier| earlier < tick) => {
                        prefix += 1;
                        previous = Some(tick);
                    }
                    _ => break,
                }
            }
            satisfied = satisfied && prefix as usize == slots.len();
            progress += prefix;
            total += slots.len() as u32;
        }

        GoalReport {
            satisfied,
            progress,
            total,
        }
    }

    /// Number of discovered drop-off zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Rank slots of the provided zone, in ascending rank order.
    #[must_use]
    pub fn slots(&self, zone: ZoneId) -> Option<&[RankSlot]> {
        self.zones.get(&zone).map(Vec::as_slice)
    }
}
