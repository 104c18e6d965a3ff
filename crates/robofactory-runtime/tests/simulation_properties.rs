//! Integration tests - dispatch, percepts, movement and notifications
//! exercised through the public facade.

use robofactory_runtime::prelude::*;

fn world(seed: u64) -> Simulation {
    Simulation::from_config(SimulationConfig {
        obstacle_count: 0,
        seed: Some(seed),
        ..SimulationConfig::default()
    })
    .unwrap()
}

fn run(sim: &mut Simulation, agent: &str, literal: &str) -> bool {
    let call: ActionCall = literal.parse().expect("test literal should parse");
    sim.dispatch_call(agent, &call)
}

fn battery_of(sim: &Simulation, name: &str) -> u8 {
    sim.agent(name).unwrap().robot().unwrap().battery.level()
}

#[test]
fn init_then_percepts_reflect_initial_values() {
    let mut sim = world(1);
    assert!(run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 80, 5, 10)"));

    assert!(sim.percept("d_bot_1", "initialized").is_some());
    assert_eq!(sim.percept("d_bot_1", "current_position").unwrap().to_string(), "current_position(5,10)");
    assert_eq!(sim.percept("d_bot_1", "batteryLevel").unwrap().to_string(), "batteryLevel(80)");
    assert_eq!(sim.agent("d_bot_1").unwrap().id(), AgentId(0));
}

#[test]
fn reinit_overwrites_previous_state() {
    let mut sim = world(2);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 80, 5, 10)");
    run(&mut sim, "d_bot_1", "update_carrying_package(true)");
    assert!(run(&mut sim, "d_bot_1", "init_dbot(d_bot_1, 30, 1, 1)"));

    let agent = sim.agent("d_bot_1").unwrap();
    assert_eq!(agent.location(), Cell::new(1, 1));
    assert_eq!(battery_of(&sim, "d_bot_1"), 30);
    assert!(!agent.robot().unwrap().status.carrying_cargo);
    assert_eq!(sim.registry().len(), 1);
    assert_eq!(sim.percepts("d_bot_1").iter().filter(|p| p.predicate == "batteryLevel").count(), 1);
}

#[test]
fn explicit_battery_updates_are_range_checked() {
    let mut sim = world(3);
    run(&mut sim, "d_bot_2", "init_agent(d_bot_2, 60, 3, 3)");

    assert!(!run(&mut sim, "d_bot_2", "update_battery_level(101)"));
    assert!(!run(&mut sim, "d_bot_2", "update_battery_level(-1)"));
    assert_eq!(battery_of(&sim, "d_bot_2"), 60);
    assert_eq!(sim.percept("d_bot_2", "batteryLevel").unwrap().args, vec![Term::Int(60)]);

    assert!(run(&mut sim, "d_bot_2", "update_battery_level(0)"));
    assert_eq!(battery_of(&sim, "d_bot_2"), 0);
    assert!(run(&mut sim, "d_bot_2", "update_battery_level(100)"));
    assert_eq!(battery_of(&sim, "d_bot_2"), 100);
}

#[test]
fn battery_never_leaves_range_while_moving() {
    let mut sim = world(4);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 3, 6, 6)");
    for _ in 0..10 {
        assert!(run(&mut sim, "d_bot_1", "move_towards_target(8, 10, 6, 6)"));
    }
    assert_eq!(battery_of(&sim, "d_bot_1"), 0);
    assert!(sim.percept("d_bot_1", "lowBattery").is_some());
}

#[test]
fn boxed_in_agent_never_moves() {
    let mut sim = world(5);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 6, 6)");
    run(&mut sim, "d_bot_2", "init_agent(d_bot_2, 100, 5, 6)");
    run(&mut sim, "d_bot_3", "init_agent(d_bot_3, 100, 7, 6)");
    run(&mut sim, "d_bot_4", "init_agent(d_bot_4, 100, 6, 5)");
    run(&mut sim, "d_bot_5", "init_agent(d_bot_5, 100, 6, 7)");

    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));

    for _ in 0..50 {
        assert!(run(&mut sim, "d_bot_1", "move_towards_target(0, 0, 6, 6)"));
        assert!(run(&mut sim, "d_bot_1", "move_randomly(6, 6)"));
    }
    assert_eq!(sim.agent("d_bot_1").unwrap().location(), Cell::new(6, 6));
    assert!(
        recorder.events().iter().all(|e| !matches!(e, ModelEvent::AgentMoved { .. })),
        "no movement means no agent_moved"
    );
}

#[test]
fn agent_ringed_by_obstacles_never_moves() {
    let mut grid = GridState::new(13, 13);
    let mut setup = NotificationHub::new();
    for cell in [Cell::new(5, 6), Cell::new(7, 6), Cell::new(6, 5), Cell::new(6, 7)] {
        assert!(grid.place(Landmark::Obstacle, cell, &mut setup));
    }
    let config = SimulationConfig { seed: Some(21), ..SimulationConfig::default() };
    let mut sim = Simulation::with_grid(config, grid).unwrap();
    assert_eq!(sim.grid().obstacles().len(), 4);
    assert!(run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 6, 6)"));

    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));
    for _ in 0..50 {
        assert!(run(&mut sim, "d_bot_1", "move_towards_target(0, 0, 6, 6)"));
        assert!(run(&mut sim, "d_bot_1", "move_randomly(6, 6)"));
    }
    assert_eq!(sim.agent("d_bot_1").unwrap().location(), Cell::new(6, 6));
    assert_eq!(sim.percept("d_bot_1", "current_position").unwrap().to_string(), "current_position(6,6)");
    assert!(recorder.events().iter().all(|e| !matches!(e, ModelEvent::AgentMoved { .. })));
}

#[test]
fn blocked_move_still_reports_battery_drain() {
    let mut sim = world(22);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 50, 6, 6)");
    run(&mut sim, "d_bot_2", "init_agent(d_bot_2, 100, 5, 6)");
    run(&mut sim, "d_bot_3", "init_agent(d_bot_3, 100, 7, 6)");
    run(&mut sim, "d_bot_4", "init_agent(d_bot_4, 100, 6, 5)");
    run(&mut sim, "d_bot_5", "init_agent(d_bot_5, 100, 6, 7)");

    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));
    assert!(run(&mut sim, "d_bot_1", "move_towards_target(0, 0, 6, 6)"));

    assert_eq!(battery_of(&sim, "d_bot_1"), 49);
    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        ModelEvent::AgentUpdated { agent: AgentId(0), .. }
    ));
}

#[test]
fn empty_battery_move_emits_no_update() {
    let mut sim = world(23);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 0, 6, 6)");
    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));

    assert!(run(&mut sim, "d_bot_1", "move_towards_target(6, 10, 6, 6)"));
    assert!(recorder
        .events()
        .iter()
        .all(|e| !matches!(e, ModelEvent::AgentUpdated { .. })));
}

#[test]
fn extreme_targets_do_not_abort_dispatch() {
    let mut sim = world(24);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 6, 6)");

    let targets = [(0, i32::MIN), (0, i32::MAX), (i32::MIN, 6), (i32::MAX, 6)];
    for (x, y) in targets {
        let here = sim.agent("d_bot_1").unwrap().location();
        let args = [Term::from(x), Term::from(y), Term::from(here.x), Term::from(here.y)];
        assert!(sim.dispatch("d_bot_1", "move_towards_target", &args));
        let after = sim.agent("d_bot_1").unwrap().location();
        assert!(sim.grid().in_bounds(after));
        assert_eq!(after.manhattan_to(&here), 1);
    }
}

#[test]
fn closest_handles_extreme_coordinates() {
    let mut sim = world(25);
    assert!(run(
        &mut sim,
        "d_bot_1",
        "compute_closest_charging_station([[a, 2147483647, 0], [b, -2147483648, 0]], -2, 0)"
    ));
    let percept = sim.percept("d_bot_1", "closestChargingStation").unwrap();
    assert_eq!(percept.args[0], Term::string("b"));
    assert_eq!(percept.args[1], Term::Int(i64::from(i32::MIN)));
}

#[test]
fn directed_moves_make_progress_on_average() {
    let mut sim = world(6);
    let target = Cell::new(6, 11);
    let start = Cell::new(6, 3);
    let mut total_delta: i64 = 0;

    for _ in 0..500 {
        assert!(run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 6, 3)"));
        run(&mut sim, "d_bot_1", "move_towards_target(6, 11, 6, 3)");
        let after = sim.agent("d_bot_1").unwrap().location();
        total_delta += i64::from(after.manhattan_to(&target)) - i64::from(start.manhattan_to(&target));
    }
    assert!(total_delta < 0, "expected net progress, got {}", total_delta);
}

#[test]
fn every_actual_move_fires_agent_moved() {
    let mut sim = world(7);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 2, 2)");
    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));

    let mut moves = 0;
    for _ in 0..30 {
        let before = sim.agent("d_bot_1").unwrap().location();
        run(&mut sim, "d_bot_1", "move_towards_target(10, 10, 0, 0)");
        let after = sim.agent("d_bot_1").unwrap().location();
        if before != after {
            moves += 1;
        }
    }
    let moved_events = recorder
        .events()
        .into_iter()
        .filter(|e| matches!(e, ModelEvent::AgentMoved { agent: AgentId(0), .. }))
        .count();
    assert_eq!(moved_events, moves);
}

#[test]
fn consecutive_position_updates_leave_one_percept() {
    let mut sim = world(8);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 2, 2)");
    run(&mut sim, "d_bot_1", "move_randomly(2, 2)");
    run(&mut sim, "d_bot_1", "move_randomly(2, 2)");

    let positions: Vec<_> = sim
        .percepts("d_bot_1")
        .iter()
        .filter(|p| p.predicate == "current_position")
        .collect();
    assert_eq!(positions.len(), 1);
    let location = sim.agent("d_bot_1").unwrap().location();
    assert_eq!(positions[0].args, vec![Term::from(location.x), Term::from(location.y)]);
}

#[test]
fn closest_station_prefers_nearest_then_first() {
    let mut sim = world(9);
    assert!(run(
        &mut sim,
        "d_bot_1",
        r#"compute_closest_charging_station([["A", 0, 0], ["B", 3, 4]], 0, 0)"#
    ));
    assert_eq!(
        sim.percept("d_bot_1", "closestChargingStation").unwrap().to_string(),
        r#"closestChargingStation("A",0,0)"#
    );

    assert!(run(
        &mut sim,
        "d_bot_1",
        r#"compute_closest_charging_station([["east", 7, 5], ["west", 3, 5]], 5, 5)"#
    ));
    let percept = sim.percept("d_bot_1", "closestChargingStation").unwrap();
    assert_eq!(percept.args[0], Term::string("east"));
    assert_eq!(sim.percepts("d_bot_1").len(), 1, "replaced, not appended");
}

#[test]
fn closest_with_no_candidates_keeps_old_percept() {
    let mut sim = world(10);
    run(&mut sim, "d_bot_1", r#"compute_closest_robot([["d_bot_2", 1, 1]], 0, 0)"#);
    assert!(run(&mut sim, "d_bot_1", "compute_closest_robot([], 0, 0)"));
    assert_eq!(
        sim.percept("d_bot_1", "closestRobot").unwrap().to_string(),
        r#"closestRobot("d_bot_2",1,1)"#
    );
}

#[test]
fn malformed_closest_request_is_rejected() {
    let mut sim = world(11);
    assert!(!run(&mut sim, "d_bot_1", r#"compute_closest_charging_station([["A", 0]], 0, 0)"#));
    assert!(sim.percepts("d_bot_1").is_empty());
}

#[test]
fn two_observers_each_see_one_cell_update() {
    let mut sim = world(12);
    let first = EventRecorder::new();
    let second = EventRecorder::new();
    sim.subscribe(Box::new(first.clone()));
    sim.subscribe(Box::new(second.clone()));

    assert!(run(&mut sim, "ch_st_1", "register_charging_station(10, 3)"));

    let expected = vec![ModelEvent::CellUpdated { location: Cell::new(10, 3) }];
    assert_eq!(first.events(), expected);
    assert_eq!(second.events(), expected);
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let mut sim = world(13);
    let recorder = EventRecorder::new();
    let id = sim.subscribe(Box::new(recorder.clone()));
    assert!(sim.unsubscribe(id));

    run(&mut sim, "ch_st_2", "register_charging_station(1, 1)");
    assert!(recorder.is_empty());
}

#[test]
fn flag_updates_notify_only_on_change() {
    let mut sim = world(14);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 2, 2)");
    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));

    assert!(run(&mut sim, "d_bot_1", "update_malfunctioning(true)"));
    assert!(run(&mut sim, "d_bot_1", "update_malfunctioning(true)"));
    assert!(run(&mut sim, "d_bot_1", "update_seeking_charging_station(true)"));

    assert_eq!(recorder.len(), 2);
    let status = sim.agent("d_bot_1").unwrap().robot().unwrap().status;
    assert!(status.malfunctioning && status.seeking_charging_station);
}

#[test]
fn carrying_package_flag_round_trip() {
    let mut sim = world(15);
    run(&mut sim, "d_bot_1", "init_dbot(d_bot_1, 100, 4, 4)");
    assert!(run(&mut sim, "d_bot_1", "update_carrying_package(true)"));
    assert!(sim.agent("d_bot_1").unwrap().robot().unwrap().status.carrying_cargo);
    assert!(run(&mut sim, "d_bot_1", "update_carrying_package(false)"));
    assert!(!sim.agent("d_bot_1").unwrap().robot().unwrap().status.carrying_cargo);
}

#[test]
fn invalid_requests_change_nothing() {
    let mut sim = world(16);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 50, 2, 2)");
    let before = sim.snapshot();

    assert!(!sim.dispatch("d_bot_1", "unknown_action", &[Term::atom("param")]));
    assert!(!sim.dispatch("d_bot_1", "move_towards_target", &[Term::Int(1)]));
    assert!(!sim.dispatch("d_bot_1", "update_charging", &[Term::Int(1)]));
    assert!(!sim.dispatch("d_bot_1", "init_agent", &[Term::atom("d_bot_1"), Term::string("x"), Term::Int(1), Term::Int(1)]));
    assert!(!run(&mut sim, "d_bot_9", "move_randomly(0, 0)"));

    assert_eq!(sim.snapshot(), before);
}

#[test]
fn human_technician_moves_without_battery() {
    let mut sim = world(17);
    assert!(run(&mut sim, "humn_1", "init_human(0, 12)"));
    assert_eq!(sim.agent("humn_1").unwrap().id(), AgentId(10));
    assert!(run(&mut sim, "humn_1", "move_towards_target(6, 6, 0, 12)"));
    assert!(sim.percept("humn_1", "batteryLevel").is_none());
    assert!(sim.percept("humn_1", "current_position").is_some());
}

#[test]
fn robots_do_not_share_cells() {
    let mut sim = world(18);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 100, 6, 6)");
    run(&mut sim, "d_bot_2", "init_agent(d_bot_2, 100, 6, 7)");
    for _ in 0..100 {
        run(&mut sim, "d_bot_1", "move_randomly(6, 6)");
        run(&mut sim, "d_bot_2", "move_towards_target(6, 6, 6, 7)");
        assert_ne!(
            sim.agent("d_bot_1").unwrap().location(),
            sim.agent("d_bot_2").unwrap().location()
        );
    }
}

#[test]
fn name_table_lookups() {
    assert_eq!(Simulation::id_of(Some("d_bot_3")), 2);
    assert_eq!(Simulation::name_of(2), "d_bot_3");
    assert_eq!(Simulation::id_of(Some("robot_42")), -1);
    assert_eq!(Simulation::name_of(-1), "unknown");
    assert_eq!(Simulation::name_of(11), "unknown");
}

#[test]
fn snapshot_serializes_to_json() {
    let mut sim = world(19);
    run(&mut sim, "d_bot_1", "init_agent(d_bot_1, 55, 1, 1)");
    run(&mut sim, "ch_st_1", "register_charging_station(10, 3)");

    let json = serde_json::to_value(sim.snapshot()).unwrap();
    assert_eq!(json["width"], 13);
    assert_eq!(json["stations"]["ch_st_1"]["x"], 10);
    assert_eq!(json["agents"][0]["battery"], 55);
}
