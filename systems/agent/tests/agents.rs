use bw4t_core::{CellCoord, Command, Direction, Event};
use bw4t_system_agent::{AgentAction, Agents, Brain, Observation, TemplateBrain};
use bw4t_world::{apply, World};

fn seeded_world() -> (World, bw4t_core::AgentId) {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureGrid {
            columns: 6,
            rows: 6,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::SpawnAgent {
            cell: CellCoord::new(1, 1),
            team: "Team 0".to_owned(),
        },
        &mut events,
    );
    let agent = events
        .iter()
        .find_map(|event| match event {
            Event::AgentSpawned { agent, .. } => Some(*agent),
            _ => None,
        })
        .expect("agent spawns");
    (world, agent)
}

fn tick_events(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::Tick, &mut events);
    events
}

#[test]
fn template_brain_never_acts() {
    let (mut world, agent) = seeded_world();
    let mut agents = Agents::new();
    agents.register(agent, Box::new(TemplateBrain));

    let events = tick_events(&mut world);
    let mut commands = Vec::new();
    agents.handle(&events, &world, &mut commands);

    assert!(
        commands.is_empty(),
        "the template brain must not emit commands",
    );
}

/// Brain that walks east until told to stop, tracking its initialization.
#[derive(Debug, Default)]
struct EastwardBrain {
    initialized: bool,
    steps: u32,
}

impl Brain for EastwardBrain {
    fn initialize(&mut self, _observation: &Observation) {
        self.initialized = true;
    }

    fn decide(&mut self, observation: &Observation) -> Option<AgentAction> {
        assert!(self.initialized, "decide must run after initialize");
        assert_eq!(observation.me.cell.row(), 1);
        self.steps += 1;
        Some(AgentAction::Move(Direction::East))
    }
}

#[test]
fn decisions_lower_to_world_commands() {
    let (mut world, agent) = seeded_world();
    let mut agents = Agents::new();
    agents.register(agent, Box::new(EastwardBrain::default()));

    let events = tick_events(&mut world);
    let mut commands = Vec::new();
    agents.handle(&events, &world, &mut commands);

    assert_eq!(
        commands,
        vec![Command::MoveAgent {
            agent,
            direction: Direction::East,
        }],
    );
}

#[test]
fn brains_rest_until_time_advances() {
    let (world, agent) = seeded_world();
    let mut agents = Agents::new();
    agents.register(agent, Box::new(EastwardBrain::default()));

    let mut commands = Vec::new();
    agents.handle(&[], &world, &mut commands);

    assert!(
        commands.is_empty(),
        "no tick was observed, so no decisions should be made",
    );
}

#[test]
fn observation_reflects_the_driving_loop() {
    let (mut world, agent) = seeded_world();
    let mut agents = Agents::new();
    agents.register(agent, Box::new(EastwardBrain::default()));

    // Drive three ticks, applying the emitted commands between them.
    for expected_column in 2..=4 {
        let events = tick_events(&mut world);
        let mut commands = Vec::new();
        agents.handle(&events, &world, &mut commands);
        let mut follow_up = Vec::new();
        for command in commands {
            apply(&mut world, command, &mut follow_up);
        }
        assert!(
            matches!(follow_up.as_slice(), [Event::AgentMoved { to, .. }] if *to == CellCoord::new(expected_column, 1)),
            "agent should step east, got {follow_up:?}",
        );
    }
}
