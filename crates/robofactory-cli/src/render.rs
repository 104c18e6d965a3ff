//! ASCII rendering of a world snapshot.
//!
//! Row 0 is printed first. Agents are drawn over landmarks.

use colored::{ColoredString, Colorize};
use robofactory::prelude::*;

/// One drawn cell before coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Obstacle,
    Truck,
    Delivery,
    Station,
    Robot(char, DisplayStatus),
    Human,
    Other,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Glyph::Empty => '.',
            Glyph::Obstacle => '#',
            Glyph::Truck => 'T',
            Glyph::Delivery => 'D',
            Glyph::Station => 'C',
            Glyph::Robot(c, _) => c,
            Glyph::Human => 'H',
            Glyph::Other => '?',
        }
    }

    fn paint(self) -> ColoredString {
        let s = self.symbol().to_string();
        match self {
            Glyph::Empty => s.dimmed(),
            Glyph::Obstacle => s.white().bold(),
            Glyph::Truck => s.blue().bold(),
            Glyph::Delivery => s.magenta().bold(),
            Glyph::Station => s.yellow().bold(),
            Glyph::Human => s.cyan().bold(),
            Glyph::Other => s.normal(),
            Glyph::Robot(_, status) => match status {
                DisplayStatus::BatterySharing => s.bright_green().bold(),
                DisplayStatus::Charging => s.yellow(),
                DisplayStatus::Malfunctioning => s.red().bold(),
                DisplayStatus::SeekingCharging => s.bright_red(),
                DisplayStatus::HelpingRobot => s.bright_cyan(),
                DisplayStatus::CarryingCargo => s.green().bold(),
                DisplayStatus::Idle => s.green(),
            },
        }
    }
}

/// What to draw at a cell.
pub fn glyph_at(snapshot: &WorldSnapshot, cell: Cell) -> Glyph {
    if let Some(agent) = snapshot.agent_at(cell) {
        if let Some(status) = agent.display {
            // Robots d_bot_1..5 are drawn as 1..5.
            let symbol = u32::try_from(agent.id.0 + 1)
                .ok()
                .filter(|_| agent.id.is_known())
                .and_then(|n| char::from_digit(n, 10))
                .unwrap_or('R');
            return Glyph::Robot(symbol, status);
        }
        match agent.kind.as_str() {
            "human_technician" => return Glyph::Human,
            "charging_station" => {}
            _ => return Glyph::Other,
        }
    }
    if snapshot.stations.values().any(|c| *c == cell) {
        Glyph::Station
    } else if snapshot.obstacles.contains(&cell) {
        Glyph::Obstacle
    } else if snapshot.truck.contains(&cell) {
        Glyph::Truck
    } else if snapshot.delivery.contains(&cell) {
        Glyph::Delivery
    } else {
        Glyph::Empty
    }
}

/// Plain rows, one string per grid row.
pub fn plain_rows(snapshot: &WorldSnapshot) -> Vec<String> {
    (0..snapshot.height)
        .map(|y| {
            (0..snapshot.width)
                .map(|x| glyph_at(snapshot, Cell::new(x, y)).symbol())
                .collect()
        })
        .collect()
}

/// Print the grid with colors.
pub fn print_world(snapshot: &WorldSnapshot) {
    for y in 0..snapshot.height {
        let row: Vec<String> = (0..snapshot.width)
            .map(|x| glyph_at(snapshot, Cell::new(x, y)).paint().to_string())
            .collect();
        println!("  {}", row.join(" "));
    }
}

pub fn print_legend() {
    println!(
        "  {} obstacle  {} truck  {} delivery  {} station  {} human  {} robot",
        Glyph::Obstacle.paint(),
        Glyph::Truck.paint(),
        Glyph::Delivery.paint(),
        Glyph::Station.paint(),
        Glyph::Human.paint(),
        Glyph::Robot('1', DisplayStatus::Idle).paint(),
    );
}

/// Matches the `lowBattery` percept rule.
fn is_low(battery: Battery, threshold: u8) -> bool {
    battery.level() <= threshold
}

/// One line per robot with battery and display state. Levels at or below
/// `low_threshold` are shown in red.
pub fn print_robots(snapshot: &WorldSnapshot, low_threshold: u8) {
    for agent in &snapshot.agents {
        let (Some(battery), Some(display)) = (agent.battery, agent.display) else {
            continue;
        };
        let level = battery.to_string();
        let level = if is_low(battery, low_threshold) { level.red() } else { level.green() };
        println!(
            "  {} at {} battery {} {:?}",
            agent.name.cyan(),
            agent.location,
            level,
            display
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Simulation {
        Simulation::from_config(SimulationConfig {
            obstacle_count: 0,
            seed: Some(1),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn landmarks_and_agents_have_glyphs() {
        let mut sim = world();
        assert!(sim.dispatch(
            "d_bot_2",
            "init_agent",
            &[Term::atom("d_bot_2"), Term::Int(50), Term::Int(0), Term::Int(0)]
        ));
        assert!(sim.dispatch("ch_st_1", "register_charging_station", &[Term::Int(12), Term::Int(0)]));
        assert!(sim.dispatch("humn_1", "init_human", &[Term::Int(6), Term::Int(0)]));

        let rows = plain_rows(&sim.snapshot());
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0], "2.....H.....C");
        assert_eq!(rows[2].chars().nth(4), Some('D'));
        assert_eq!(rows[10].chars().nth(8), Some('T'));
    }

    #[test]
    fn robot_glyph_carries_display_status() {
        let mut sim = world();
        sim.dispatch(
            "d_bot_1",
            "init_agent",
            &[Term::atom("d_bot_1"), Term::Int(50), Term::Int(3), Term::Int(3)],
        );
        sim.dispatch("d_bot_1", "update_malfunctioning", &[Term::atom("true")]);
        assert_eq!(
            glyph_at(&sim.snapshot(), Cell::new(3, 3)),
            Glyph::Robot('1', DisplayStatus::Malfunctioning)
        );
    }

    #[test]
    fn low_battery_colouring_follows_configured_threshold() {
        let config = SimulationConfig {
            obstacle_count: 0,
            low_battery_threshold: 40,
            seed: Some(1),
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::from_config(config).unwrap();
        sim.dispatch(
            "d_bot_1",
            "init_agent",
            &[Term::atom("d_bot_1"), Term::Int(30), Term::Int(3), Term::Int(3)],
        );
        let battery = sim.agent("d_bot_1").unwrap().robot().unwrap().battery;
        assert!(sim.percept("d_bot_1", "lowBattery").is_some());
        assert!(is_low(battery, sim.config().low_battery_threshold));
        assert!(!is_low(battery, 20));
        assert!(is_low(Battery::new(20), 20));
    }

    #[test]
    fn robots_outside_the_table_use_a_generic_glyph() {
        let mut sim = world();
        sim.dispatch(
            "rover",
            "init_agent",
            &[Term::atom("rover"), Term::Int(50), Term::Int(5), Term::Int(5)],
        );
        assert_eq!(glyph_at(&sim.snapshot(), Cell::new(5, 5)).symbol(), 'R');
    }
}
