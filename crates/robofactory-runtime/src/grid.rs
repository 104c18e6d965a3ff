//! GridState - the static side of the factory floor.
//!
//! Holds one landmark bitmask per cell plus the name-keyed charging station
//! table. Stations are kept in lockstep with the CHARGING_STATION bit: a bit
//! is set exactly when at least one table entry points at that cell.
//!
//! Mobile agents are not stored here; see [`crate::registry::AgentRegistry`].

use crate::notify::NotificationHub;
use rand::Rng;
use robofactory_core::error::{Result, SimError};
use robofactory_core::types::{Cell, Landmark, LandmarkSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Where the truck is parked.
pub const TRUCK_LOCATION: Cell = Cell::new(8, 10);

/// The delivery drop-off point.
pub const DELIVERY_LOCATION: Cell = Cell::new(4, 2);

/// Cells closer than this (Euclidean) to the truck or delivery point never get obstacles.
const KEY_LOCATION_RADIUS: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    width: i32,
    height: i32,
    cells: Vec<LandmarkSet>,
    stations: BTreeMap<String, Cell>,
}

impl GridState {
    /// Create a grid with the truck and delivery landmarks in place.
    ///
    /// Landmarks that fall outside a small grid are skipped.
    pub fn new(width: i32, height: i32) -> Self {
        let mut grid = Self::empty(width, height);
        grid.set_bit(TRUCK_LOCATION, Landmark::Truck);
        grid.set_bit(DELIVERY_LOCATION, Landmark::Delivery);
        grid
    }

    /// Create a grid without any landmarks.
    pub fn empty(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![LandmarkSet::empty(); (width as usize) * (height as usize)],
            stations: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y as usize) * (self.width as usize) + cell.x as usize)
    }

    /// In bounds and not an obstacle.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell)
            .map_or(false, |idx| !self.cells[idx].contains(Landmark::Obstacle))
    }

    /// Landmarks at a cell. Out-of-bounds cells report none.
    pub fn landmarks_at(&self, cell: Cell) -> LandmarkSet {
        self.index(cell).map_or(LandmarkSet::empty(), |idx| self.cells[idx])
    }

    pub fn has(&self, landmark: Landmark, cell: Cell) -> bool {
        self.landmarks_at(cell).contains(landmark)
    }

    /// Set a landmark bit and notify. Returns true if the bit was newly set.
    pub fn place(&mut self, landmark: Landmark, cell: Cell, hub: &mut NotificationHub) -> bool {
        let changed = self.set_bit(cell, landmark);
        if changed {
            hub.cell_updated(cell);
        }
        changed
    }

    /// Clear a landmark bit and notify. Returns true if the bit was set.
    pub fn remove(&mut self, landmark: Landmark, cell: Cell, hub: &mut NotificationHub) -> bool {
        let changed = match self.index(cell) {
            Some(idx) => self.cells[idx].remove(landmark),
            None => false,
        };
        if changed {
            hub.cell_updated(cell);
        }
        changed
    }

    fn set_bit(&mut self, cell: Cell, landmark: Landmark) -> bool {
        match self.index(cell) {
            Some(idx) => self.cells[idx].insert(landmark),
            None => false,
        }
    }

    /// Within Euclidean distance 1.5 of the truck or the delivery point.
    pub fn is_adjacent_to_key_location(&self, cell: Cell) -> bool {
        [TRUCK_LOCATION, DELIVERY_LOCATION]
            .iter()
            .any(|key| cell.distance_to(key) < KEY_LOCATION_RADIUS)
    }

    /// Scatter up to `count` obstacles by rejection sampling.
    ///
    /// Candidates must be empty cells away from the key locations. Sampling
    /// stops after `max_attempts` draws, so the result may be short of
    /// `count` on a crowded grid. Connectivity is not guaranteed. No
    /// notifications are sent; this runs before anyone can subscribe.
    pub fn generate_obstacles<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> usize {
        if self.cells.is_empty() {
            return 0;
        }
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < max_attempts {
            attempts += 1;
            let cell = Cell::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.landmarks_at(cell).is_empty() && !self.is_adjacent_to_key_location(cell) {
                self.set_bit(cell, Landmark::Obstacle);
                placed += 1;
            }
        }
        debug!(placed, requested = count, attempts, "obstacles generated");
        placed
    }

    /// All obstacle cells in row-major order.
    pub fn obstacles(&self) -> Vec<Cell> {
        self.cells_with(Landmark::Obstacle)
    }

    pub fn cells_with(&self, landmark: Landmark) -> Vec<Cell> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|cell| self.has(landmark, *cell))
            .collect()
    }

    /// Add or move the station owned by `name`.
    ///
    /// The target cell must be in bounds and free of obstacles.
    pub fn add_charging_station(
        &mut self,
        name: &str,
        cell: Cell,
        hub: &mut NotificationHub,
    ) -> Result<()> {
        if !self.is_free(cell) {
            return Err(SimError::InvalidLocation(cell));
        }
        if let Some(previous) = self.stations.insert(name.to_string(), cell) {
            if previous != cell {
                self.release_station_cell(previous, hub);
            }
        }
        self.place(Landmark::ChargingStation, cell, hub);
        Ok(())
    }

    /// Remove the station owned by `name`, returning where it was.
    pub fn remove_charging_station(&mut self, name: &str, hub: &mut NotificationHub) -> Result<Cell> {
        let cell = self
            .stations
            .remove(name)
            .ok_or_else(|| SimError::UnknownStation(name.to_string()))?;
        self.release_station_cell(cell, hub);
        Ok(cell)
    }

    fn release_station_cell(&mut self, cell: Cell, hub: &mut NotificationHub) {
        if !self.has_charging_station_at(cell) {
            self.remove(Landmark::ChargingStation, cell, hub);
        }
    }

    /// Copy of the station table.
    pub fn charging_station_locations(&self) -> BTreeMap<String, Cell> {
        self.stations.clone()
    }

    pub fn charging_station(&self, name: &str) -> Option<Cell> {
        self.stations.get(name).copied()
    }

    pub fn has_charging_station_at(&self, cell: Cell) -> bool {
        self.stations.values().any(|c| *c == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn new_grid_has_key_landmarks() {
        let grid = GridState::new(13, 13);
        assert!(grid.has(Landmark::Truck, TRUCK_LOCATION));
        assert!(grid.has(Landmark::Delivery, DELIVERY_LOCATION));
        assert!(grid.is_free(TRUCK_LOCATION));
        assert!(grid.obstacles().is_empty());
    }

    #[test]
    fn small_grid_skips_out_of_bounds_landmarks() {
        let grid = GridState::new(5, 5);
        assert!(grid.cells_with(Landmark::Truck).is_empty());
        assert!(grid.has(Landmark::Delivery, DELIVERY_LOCATION));
    }

    #[test]
    fn out_of_bounds_cells_are_not_free() {
        let grid = GridState::new(13, 13);
        assert!(!grid.is_free(Cell::new(-1, 0)));
        assert!(!grid.is_free(Cell::new(0, 13)));
        assert!(grid.landmarks_at(Cell::new(20, 20)).is_empty());
    }

    #[test]
    fn place_and_remove_report_changes() {
        let mut grid = GridState::new(13, 13);
        let mut hub = NotificationHub::new();
        let cell = Cell::new(1, 1);

        assert!(grid.place(Landmark::Obstacle, cell, &mut hub));
        assert!(!grid.place(Landmark::Obstacle, cell, &mut hub));
        assert!(!grid.is_free(cell));
        assert!(grid.remove(Landmark::Obstacle, cell, &mut hub));
        assert!(!grid.remove(Landmark::Obstacle, cell, &mut hub));
        assert!(grid.is_free(cell));
    }

    #[test]
    fn adjacency_uses_euclidean_radius() {
        let grid = GridState::new(13, 13);
        assert!(grid.is_adjacent_to_key_location(Cell::new(9, 11)));
        assert!(grid.is_adjacent_to_key_location(Cell::new(4, 3)));
        assert!(!grid.is_adjacent_to_key_location(Cell::new(10, 10)));
        assert!(!grid.is_adjacent_to_key_location(Cell::new(0, 0)));
    }

    #[test]
    fn obstacles_avoid_key_locations() {
        let mut grid = GridState::new(13, 13);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let placed = grid.generate_obstacles(40, 10_000, &mut rng);
        assert_eq!(placed, 40);
        for cell in grid.obstacles() {
            assert!(!grid.is_adjacent_to_key_location(cell), "obstacle at {}", cell);
            assert!(!grid.has(Landmark::Truck, cell));
        }
    }

    #[test]
    fn obstacle_generation_respects_attempt_budget() {
        let mut grid = GridState::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placed = grid.generate_obstacles(100, 50, &mut rng);
        assert!(placed <= 9);
    }

    #[test]
    fn stations_stay_in_lockstep_with_landmark() {
        let mut grid = GridState::new(13, 13);
        let mut hub = NotificationHub::new();
        let shared = Cell::new(6, 6);

        grid.add_charging_station("ch_st_1", shared, &mut hub).unwrap();
        grid.add_charging_station("ch_st_2", shared, &mut hub).unwrap();
        assert!(grid.has(Landmark::ChargingStation, shared));

        assert_eq!(grid.remove_charging_station("ch_st_1", &mut hub).unwrap(), shared);
        assert!(grid.has(Landmark::ChargingStation, shared), "ch_st_2 still there");

        grid.remove_charging_station("ch_st_2", &mut hub).unwrap();
        assert!(!grid.has(Landmark::ChargingStation, shared));
        assert!(matches!(
            grid.remove_charging_station("ch_st_2", &mut hub),
            Err(SimError::UnknownStation(_))
        ));
    }

    #[test]
    fn moving_a_station_clears_the_old_cell() {
        let mut grid = GridState::new(13, 13);
        let mut hub = NotificationHub::new();
        grid.add_charging_station("ch_st_1", Cell::new(1, 1), &mut hub).unwrap();
        grid.add_charging_station("ch_st_1", Cell::new(2, 2), &mut hub).unwrap();

        assert!(!grid.has(Landmark::ChargingStation, Cell::new(1, 1)));
        assert!(grid.has(Landmark::ChargingStation, Cell::new(2, 2)));
        assert_eq!(grid.charging_station_locations().len(), 1);
    }

    #[test]
    fn stations_reject_blocked_cells() {
        let mut grid = GridState::new(13, 13);
        let mut hub = NotificationHub::new();
        grid.place(Landmark::Obstacle, Cell::new(3, 3), &mut hub);
        assert!(grid.add_charging_station("ch_st_1", Cell::new(3, 3), &mut hub).is_err());
        assert!(grid.add_charging_station("ch_st_1", Cell::new(-1, 3), &mut hub).is_err());
        assert!(grid.charging_station_locations().is_empty());
    }
}
