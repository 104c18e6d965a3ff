//! MovementResolver - turns an intended step into a legal grid transition.
//!
//! Navigation is greedy and stochastic: one cell per call, biased towards
//! the destination, with a random sidestep on the other axis when the
//! preferred cell is blocked. There is no global path planning.
//!
//! The resolver only plans. Whether a cell is passable is decided by the
//! caller's predicate, so planning stays independent of the registry.

use rand::Rng;
use std::cmp::Ordering;
use robofactory_core::types::Cell;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A resolved step. `from == to` means the agent stayed put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub from: Cell,
    pub to: Cell,
}

impl Movement {
    pub fn stay(at: Cell) -> Self {
        Self { from: at, to: at }
    }

    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResolver {
    width: i32,
    height: i32,
    towards_target_probability: f64,
}

impl MovementResolver {
    /// `towards_target_probability` is clamped into `[0, 1]`.
    pub fn new(width: i32, height: i32, towards_target_probability: f64) -> Self {
        let probability = if towards_target_probability.is_nan() {
            0.0
        } else {
            towards_target_probability.clamp(0.0, 1.0)
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            towards_target_probability: probability,
        }
    }

    pub fn towards_target_probability(&self) -> f64 {
        self.towards_target_probability
    }

    /// Plan one step from `from` towards `target`.
    ///
    /// The axis with the larger remaining distance goes first (vertical on
    /// ties). With the configured probability the step heads towards the
    /// target, otherwise away from it. A horizontal primary step wraps
    /// around the grid width; a vertical one does not. If the primary cell
    /// is not passable, up to `width` (vertical primary) or `height`
    /// (horizontal primary) random wrapping sidesteps are tried on the
    /// other axis. The agent's own cell never counts as a destination.
    pub fn plan_towards<R, F>(&self, from: Cell, target: Cell, passable: F, rng: &mut R) -> Movement
    where
        R: Rng + ?Sized,
        F: Fn(Cell) -> bool,
    {
        let open = |cell: Cell| cell != from && passable(cell);

        let vertical_distance = from.y.abs_diff(target.y);
        let horizontal_distance = from.x.abs_diff(target.x);
        let prioritize_vertical = vertical_distance >= horizontal_distance;
        let towards = rng.gen_bool(self.towards_target_probability);
        let direction = if towards { 1 } else { -1 };

        let primary = if prioritize_vertical {
            from.offset(0, direction * axis_sign(from.y, target.y))
        } else {
            let x = from.x + direction * axis_sign(from.x, target.x);
            Cell::new(x.rem_euclid(self.width), from.y)
        };

        if open(primary) {
            debug!(%from, to = %primary, towards, "primary step");
            return Movement { from, to: primary };
        }

        let attempts = if prioritize_vertical { self.width } else { self.height };
        for _ in 0..attempts {
            let step = if rng.gen_bool(0.5) { 1 } else { -1 };
            let sidestep = if prioritize_vertical {
                Cell::new((from.x + step).rem_euclid(self.width), from.y)
            } else {
                Cell::new(from.x, (from.y + step).rem_euclid(self.height))
            };
            if open(sidestep) {
                debug!(%from, to = %sidestep, "sidestep around blocked cell");
                return Movement { from, to: sidestep };
            }
        }

        debug!(%from, %target, "boxed in, staying put");
        Movement::stay(from)
    }

    /// Plan one random unit step along a single axis.
    pub fn plan_random<R, F>(&self, from: Cell, passable: F, rng: &mut R) -> Movement
    where
        R: Rng + ?Sized,
        F: Fn(Cell) -> bool,
    {
        let step = if rng.gen_bool(0.5) { 1 } else { -1 };
        let candidate = if rng.gen_bool(0.5) {
            from.offset(0, step)
        } else {
            from.offset(step, 0)
        };
        if passable(candidate) {
            debug!(%from, to = %candidate, "random step");
            Movement { from, to: candidate }
        } else {
            Movement::stay(from)
        }
    }
}

/// Unit direction from `from` towards `to` along one axis.
fn axis_sign(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}
