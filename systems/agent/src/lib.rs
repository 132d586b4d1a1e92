#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent decision system and the brain template users fill in.
//!
//! The [`Agents`] system owns one [`Brain`] per spawned agent. On every tick
//! it assembles an [`Observation`] per agent from world queries, consults the
//! brains in ascending agent-id order, and lowers returned actions to world
//! commands. Brains stay pure: they see snapshots and answer with intents.

use std::collections::BTreeMap;
use std::fmt;

use bw4t_core::{AgentId, CellCoord, Command, Direction, Event, ObjectId, Tick};
use bw4t_world::{
    query,
    query::{AgentSnapshot, BlockSnapshot, DoorSnapshot, GhostSnapshot, RoomSnapshot, ZoneTileSnapshot},
    World,
};

/// Everything an agent perceives when asked for a decision.
#[derive(Clone, Debug)]
pub struct Observation {
    /// Current value of the simulation clock.
    pub tick: Tick,
    /// Snapshot of the observing agent itself.
    pub me: AgentSnapshot,
    /// Snapshots of every block, carried blocks included.
    pub blocks: Vec<BlockSnapshot>,
    /// Ghost goal markers describing the required deliveries.
    pub ghosts: Vec<GhostSnapshot>,
    /// Floor tiles of the drop-off zones.
    pub zone_tiles: Vec<ZoneTileSnapshot>,
    /// Rooms installed in the world, the sealed perimeter included.
    pub rooms: Vec<RoomSnapshot>,
    /// Doors and their current open state.
    pub doors: Vec<DoorSnapshot>,
}

/// Action an agent intends to perform during the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentAction {
    /// Step one cell in the provided direction.
    Move(Direction),
    /// Open the door at the provided cell.
    OpenDoor(CellCoord),
    /// Close the door at the provided cell.
    CloseDoor(CellCoord),
    /// Pick up the identified block.
    Grab(ObjectId),
    /// Put the carried block down at the current cell.
    Drop,
}

/// Decision seam implemented by agent brains.
pub trait Brain: fmt::Debug {
    /// Called once with the first observation, before any decision is made.
    fn initialize(&mut self, observation: &Observation) {
        let _ = observation;
    }

    /// Produces the agent's intent for the current tick, if any.
    fn decide(&mut self, observation: &Observation) -> Option<AgentAction>;
}

/// Brain template whose decision logic is intentionally left unimplemented.
///
/// A working collector could reason roughly like this on every tick:
///
/// 1. Carrying a block? Find the lowest unfilled slot among the ghost
///    markers, walk toward it, and [`AgentAction::Drop`] once on the cell.
/// 2. Hands free and the next required block already spotted somewhere?
///    Walk to it (opening doors on the way) and [`AgentAction::Grab`] it.
/// 3. Otherwise pick a room not yet visited, enter through its door, and
///    record the blocks seen inside for step 2.
///
/// Track visited rooms and spotted blocks in fields on your brain; the
/// observation is rebuilt from scratch every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateBrain;

impl Brain for TemplateBrain {
    fn decide(&mut self, observation: &Observation) -> Option<AgentAction> {
        let _ = observation;
        None
    }
}

/// System that drives registered brains each tick.
#[derive(Debug, Default)]
pub struct Agents {
    brains: BTreeMap<AgentId, Box<dyn Brain>>,
    initialized: bool,
}

impl Agents {
    /// Creates a system with no registered brains.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the brain that will steer the provided agent.
    ///
    /// Registering a second brain for the same agent replaces the first.
    pub fn register(&mut self, agent: AgentId, brain: Box<dyn Brain>) {
        let _ = self.brains.insert(agent, brain);
    }

    /// Number of registered brains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.brains.len()
    }

    /// Reports whether no brains are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    /// Consumes world events and queries to emit one command per decision.
    ///
    /// Brains are only consulted when the event batch contains a
    /// [`Event::TimeAdvanced`]; the first such call also runs each brain's
    /// `initialize` hook.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for (agent, brain) in self.brains.iter_mut() {
            let Some(observation) = observe(world, *agent) else {
                continue;
            };
            if !self.initialized {
                brain.initialize(&observation);
            }
            if let Some(action) = brain.decide(&observation) {
                out.push(lower(*agent, action));
            }
        }
        self.initialized = true;
    }
}

/// Assembles the observation the provided agent perceives.
#[must_use]
pub fn observe(world: &World, agent: AgentId) -> Option<Observation> {
    let me = query::agent_view(world)
        .into_vec()
        .into_iter()
        .find(|snapshot| snapshot.id == agent)?;
    Some(Observation {
        tick: query::tick(world),
        me,
        blocks: query::block_view(world).into_vec(),
        ghosts: query::ghost_view(world).into_vec(),
        zone_tiles: query::zone_tile_view(world).into_vec(),
        rooms: query::room_view(world).into_vec(),
        doors: query::door_view(world).into_vec(),
    })
}

fn lower(agent: AgentId, action: AgentAction) -> Command {
    match action {
        AgentAction::Move(direction) => Command::MoveAgent { agent, direction },
        AgentAction::OpenDoor(door) => Command::OpenDoor { agent, door },
        AgentAction::CloseDoor(door) => Command::CloseDoor { agent, door },
        AgentAction::Grab(object) => Command::GrabBlock { agent, object },
        AgentAction::Drop => Command::DropBlock { agent },
    }
}
