//! Run the delivery demo.
//!
//! Robots shuttle cargo from the truck to the delivery point and go
//! recharge at the nearest station once `lowBattery` shows up. Every
//! decision goes through the same dispatch interface a reasoning layer
//! would use.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use robofactory::prelude::*;
use tracing::{debug, info};

use crate::commands::build_simulation;
use crate::config::Config;
use crate::render;

const ROBOT_NAMES: [&str; 5] = ["d_bot_1", "d_bot_2", "d_bot_3", "d_bot_4", "d_bot_5"];
const STATION_NAMES: [&str; 3] = ["ch_st_1", "ch_st_2", "ch_st_3"];

/// Per-robot tallies kept by the demo driver.
#[derive(Debug, Default)]
struct Courier {
    name: &'static str,
    deliveries: u32,
    charges: u32,
}

pub fn run(robots: Option<usize>, ticks: Option<u64>, seed: Option<u64>, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let robots = robots.unwrap_or(config.demo.robots);
    let ticks = ticks.unwrap_or(config.demo.ticks);
    let station_count = config.demo.stations;

    if robots == 0 || robots > ROBOT_NAMES.len() {
        bail!("--robots must be between 1 and {}", ROBOT_NAMES.len());
    }
    if station_count > STATION_NAMES.len() {
        bail!("demo.stations must be at most {}", STATION_NAMES.len());
    }

    let mut sim = build_simulation(&config, seed)?;
    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));
    sim.subscribe(Box::new(TracingObserver));

    let mut rng = match seed.or(config.simulation.seed) {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut cells = open_cells(&sim);
    cells.shuffle(&mut rng);
    if cells.len() < robots + station_count {
        bail!("Not enough free cells for {} robots and {} stations", robots, station_count);
    }

    println!("{} Setting up the factory floor...", "→".blue());
    let mut stations = Vec::with_capacity(station_count);
    for &name in STATION_NAMES.iter().take(station_count) {
        let cell = cells.pop().context("ran out of free cells")?;
        if act(&mut sim, name, "register_charging_station", vec![cell.x.into(), cell.y.into()]) {
            stations.push((name.to_string(), cell));
            println!("  {} {} at {}", "✓".green(), name, cell);
        }
    }

    let mut couriers = Vec::with_capacity(robots);
    for &name in ROBOT_NAMES.iter().take(robots) {
        let cell = cells.pop().context("ran out of free cells")?;
        let battery: i64 = rng.gen_range(30..=100);
        let args = vec![Term::atom(name), battery.into(), cell.x.into(), cell.y.into()];
        if !act(&mut sim, name, "init_agent", args) {
            bail!("Failed to initialize {}", name);
        }
        println!("  {} {} at {} with {}% battery", "✓".green(), name, cell, battery);
        couriers.push(Courier { name, ..Courier::default() });
    }

    println!();
    println!("{} Running {} ticks...", "→".blue(), ticks.to_string().cyan());

    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    let charge_rate = config.demo.charge_rate;
    for tick in 0..ticks {
        for courier in &mut couriers {
            if let Some(note) = step(&mut sim, courier, &stations, charge_rate)? {
                if verbose {
                    pb.println(format!("  [{}] {} {}", tick, courier.name.cyan(), note));
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let moves = recorder
        .events()
        .iter()
        .filter(|e| matches!(e, ModelEvent::AgentMoved { .. }))
        .count();

    println!();
    let snapshot = sim.snapshot();
    render::print_world(&snapshot);
    println!();
    render::print_legend();
    println!();
    render::print_robots(&snapshot, sim.config().low_battery_threshold);

    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    let delivered: u32 = couriers.iter().map(|c| c.deliveries).sum();
    println!("  Deliveries:  {}", delivered.to_string().green());
    println!("  Recharges:   {}", couriers.iter().map(|c| c.charges).sum::<u32>().to_string().yellow());
    println!("  Moves:       {}", moves.to_string().cyan());
    for courier in &couriers {
        println!("    {} delivered {}", courier.name, courier.deliveries);
    }

    Ok(())
}

/// Free cells without any landmark.
fn open_cells(sim: &Simulation) -> Vec<Cell> {
    let grid = sim.grid();
    (0..grid.height())
        .flat_map(|y| (0..grid.width()).map(move |x| Cell::new(x, y)))
        .filter(|c| grid.is_free(*c) && grid.landmarks_at(*c).is_empty())
        .collect()
}

fn act(sim: &mut Simulation, agent: &str, action: &str, args: Vec<Term>) -> bool {
    let call = ActionCall::new(action, args);
    let accepted = sim.dispatch_call(agent, &call);
    if !accepted {
        debug!(agent, %call, "demo request rejected");
    }
    accepted
}

fn flag(sim: &mut Simulation, agent: &str, which: StatusFlag, value: bool) -> bool {
    let atom = if value { "true" } else { "false" };
    act(sim, agent, which.action_name(), vec![Term::atom(atom)])
}

fn move_towards(sim: &mut Simulation, agent: &str, target: Cell, here: Cell) -> bool {
    act(
        sim,
        agent,
        "move_towards_target",
        vec![target.x.into(), target.y.into(), here.x.into(), here.y.into()],
    )
}

/// Read a `closestChargingStation(name, x, y)` percept back into a cell.
fn closest_station(sim: &Simulation, agent: &str) -> Option<Cell> {
    let percept = sim.percept(agent, "closestChargingStation")?;
    match percept.args.as_slice() {
        [_, x, y] => Some(Cell::new(
            i32::try_from(x.as_int()?).ok()?,
            i32::try_from(y.as_int()?).ok()?,
        )),
        _ => None,
    }
}

/// One decision for one robot. Returns a note when something noteworthy happened.
fn step(
    sim: &mut Simulation,
    courier: &mut Courier,
    stations: &[(String, Cell)],
    charge_rate: u32,
) -> Result<Option<String>> {
    let name = courier.name;
    let agent = sim.agent(name).with_context(|| format!("{} vanished", name))?;
    let here = agent.location();
    let robot = agent.robot().with_context(|| format!("{} is not a robot", name))?;
    let battery = robot.battery;
    let status = robot.status;
    let low = sim.percept(name, "lowBattery").is_some();

    if status.charging {
        if battery.level() >= Battery::MAX {
            let stopped = flag(sim, name, StatusFlag::Charging, false)
                & flag(sim, name, StatusFlag::SeekingChargingStation, false);
            return Ok(stopped.then(|| "fully charged".to_string()));
        }
        act(sim, name, "charge_battery", vec![i64::from(charge_rate).into()]);
        return Ok(None);
    }

    if (low || status.seeking_charging_station) && !stations.is_empty() {
        if !status.seeking_charging_station {
            flag(sim, name, StatusFlag::SeekingChargingStation, true);
        }
        let candidates = stations
            .iter()
            .map(|(station, cell)| Term::List(vec![Term::string(station.as_str()), cell.x.into(), cell.y.into()]))
            .collect::<Vec<_>>();
        act(
            sim,
            name,
            "compute_closest_charging_station",
            vec![Term::List(candidates), here.x.into(), here.y.into()],
        );
        let target = closest_station(sim, name).context("no closest station percept")?;
        if here.manhattan_to(&target) <= 1 {
            if !flag(sim, name, StatusFlag::Charging, true) {
                return Ok(None);
            }
            courier.charges += 1;
            info!(robot = name, station = %target, "charging started");
            return Ok(Some(format!("charging at {} ({})", target, battery)));
        }
        move_towards(sim, name, target, here);
        return Ok(None);
    }

    if status.carrying_cargo {
        let delivery = sim.delivery_location();
        if here.manhattan_to(&delivery) <= 1 {
            if !flag(sim, name, StatusFlag::CarryingCargo, false) {
                return Ok(None);
            }
            courier.deliveries += 1;
            info!(robot = name, deliveries = courier.deliveries, "cargo delivered");
            return Ok(Some("delivered cargo".to_string()));
        }
        move_towards(sim, name, delivery, here);
    } else {
        let truck = sim.truck_location();
        if here.manhattan_to(&truck) <= 1 {
            let picked = flag(sim, name, StatusFlag::CarryingCargo, true);
            return Ok(picked.then(|| "picked up cargo".to_string()));
        }
        move_towards(sim, name, truck, here);
    }
    Ok(None)
}
