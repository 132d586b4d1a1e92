use bw4t_core::{CellCoord, Event};
use bw4t_system_layout::{generate, world_size, LayoutConfig, LayoutError};
use bw4t_world::{apply, query, World};

#[test]
fn default_world_size_matches_classic_scenario() {
    let config = LayoutConfig::default();
    assert_eq!(world_size(&config), (21, 14));
}

#[test]
fn width_grows_with_drop_zone_spread() {
    let config = LayoutConfig {
        room_count: 1,
        rooms_per_row: 1,
        drop_zone_count: 6,
        ..LayoutConfig::default()
    };
    let (columns, _) = world_size(&config);

    // Six zones spread across seven hallway gaps outgrow the single room row.
    assert_eq!(columns, 7 * 2 + 6 + 2);
}

#[test]
fn rooms_are_tiled_with_bottom_center_doors() {
    let plan = generate(&LayoutConfig::default()).expect("default config generates");

    let named: Vec<&str> = plan.rooms.iter().map(|room| room.name.as_str()).collect();
    assert_eq!(named, vec!["world_bounds", "room_0", "room_1", "room_2"]);

    let bounds = &plan.rooms[0];
    assert_eq!(bounds.region.origin(), CellCoord::new(0, 0));
    assert_eq!(bounds.region.size().width(), plan.columns);
    assert_eq!(bounds.door, None);

    let first = &plan.rooms[1];
    assert_eq!(first.region.origin(), CellCoord::new(4, 4));
    assert_eq!(first.door, Some(CellCoord::new(7, 8)));

    let second = &plan.rooms[2];
    assert_eq!(second.region.origin(), CellCoord::new(9, 4));
    assert_eq!(second.door, Some(CellCoord::new(12, 8)));

    let third = &plan.rooms[3];
    assert_eq!(third.region.origin(), CellCoord::new(14, 4));
    assert_eq!(third.door, Some(CellCoord::new(17, 8)));
}

#[test]
fn blocks_land_on_room_interior_candidates_only() {
    let plan = generate(&LayoutConfig::default()).expect("default config generates");

    for block in &plan.blocks {
        let room = plan
            .rooms
            .iter()
            .skip(1)
            .find(|room| room.region.contains(block.cell))
            .expect("block should land inside a room");
        assert!(
            !room.region.on_perimeter(block.cell),
            "block at {:?} sits on a wall",
            block.cell,
        );
        let door = room.door.expect("rooms carry doors");
        assert_ne!(
            block.cell.column(),
            door.column(),
            "the door column must stay free",
        );
    }
}

#[test]
fn saturated_average_fills_every_candidate_cell() {
    let config = LayoutConfig {
        average_blocks_per_room: 100.0,
        ..LayoutConfig::default()
    };
    let plan = generate(&config).expect("saturated config generates");

    // Four candidate cells per 5x5 room, three rooms.
    assert_eq!(plan.blocks.len(), 12);
}

#[test]
fn drop_zone_ghosts_stack_upward_from_the_bottom() {
    let plan = generate(&LayoutConfig::default()).expect("default config generates");

    assert_eq!(plan.zones.len(), 1);
    let zone = &plan.zones[0];
    assert_eq!(zone.tiles.len(), 3);
    assert_eq!(zone.ghosts.len(), 3);

    // Rank 0 sits on the bottom tile; later ranks stack upward.
    assert_eq!(zone.ghosts[0].cell, CellCoord::new(11, 12));
    assert_eq!(zone.ghosts[1].cell, CellCoord::new(11, 11));
    assert_eq!(zone.ghosts[2].cell, CellCoord::new(11, 10));
    assert_eq!(zone.tiles.first(), Some(&CellCoord::new(11, 10)));
    assert_eq!(zone.tiles.last(), Some(&CellCoord::new(11, 12)));
}

#[test]
fn agents_line_up_on_the_top_hallway_row() {
    let config = LayoutConfig {
        team_count: 2,
        agents_per_team: 2,
        ..LayoutConfig::default()
    };
    let plan = generate(&config).expect("two-team config generates");

    let cells: Vec<CellCoord> = plan.agents.iter().map(|agent| agent.cell).collect();
    assert_eq!(
        cells,
        vec![
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(3, 1),
            CellCoord::new(4, 1),
        ],
    );
    assert_eq!(plan.agents[0].team, "Team 0");
    assert_eq!(plan.agents[3].team, "Team 1");
}

#[test]
fn generation_is_deterministic_for_equal_configs() {
    let config = LayoutConfig::default();
    assert_eq!(
        generate(&config).expect("generates"),
        generate(&config).expect("generates"),
    );
}

#[test]
fn degenerate_configs_are_rejected() {
    let no_rooms = LayoutConfig {
        room_count: 0,
        ..LayoutConfig::default()
    };
    assert_eq!(generate(&no_rooms).unwrap_err(), LayoutError::NoRooms);

    let tiny_rooms = LayoutConfig {
        room_width: 2,
        ..LayoutConfig::default()
    };
    assert_eq!(
        generate(&tiny_rooms).unwrap_err(),
        LayoutError::RoomTooSmall {
            width: 2,
            height: 5,
        },
    );

    let no_colors = LayoutConfig {
        block_colors: Vec::new(),
        ..LayoutConfig::default()
    };
    assert_eq!(
        generate(&no_colors).unwrap_err(),
        LayoutError::EmptyColorPalette,
    );

    let crowded = LayoutConfig {
        team_count: 10,
        agents_per_team: 10,
        ..LayoutConfig::default()
    };
    assert!(matches!(
        generate(&crowded).unwrap_err(),
        LayoutError::TooManyAgents { .. },
    ));
}

#[test]
fn plan_commands_build_a_world_without_rejections() {
    let plan = generate(&LayoutConfig::default()).expect("default config generates");

    let mut world = World::new();
    let mut events = Vec::new();
    for command in plan.commands() {
        apply(&mut world, command, &mut events);
    }

    let rejected: Vec<&Event> = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::PlacementRejected { .. }
                    | Event::MoveRejected { .. }
                    | Event::DoorActionRejected { .. },
            )
        })
        .collect();
    assert!(rejected.is_empty(), "unexpected rejections: {rejected:?}");

    assert_eq!(query::ghost_view(&world).into_vec().len(), 3);
    assert_eq!(query::zone_tile_view(&world).into_vec().len(), 3);
    assert_eq!(query::agent_view(&world).into_vec().len(), 2);
    assert_eq!(query::room_view(&world).into_vec().len(), 4);
    assert_eq!(
        query::block_view(&world).into_vec().len(),
        plan.blocks.len(),
    );
}
