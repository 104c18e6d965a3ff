//! Percepts - the per-agent beliefs the environment exposes.
//!
//! Every write replaces: percepts with the same predicate and arity are
//! removed before the new one is added, so an agent never sees two
//! `current_position` facts.

use robofactory_core::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A ground fact such as `batteryLevel(80)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    pub predicate: String,
    pub args: Vec<Term>,
}

impl Percept {
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    fn same_shape(&self, predicate: &str, arity: usize) -> bool {
        self.predicate == predicate && self.args.len() == arity
    }
}

impl fmt::Display for Percept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// Percepts of every agent, keyed by agent name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceptStore {
    by_agent: BTreeMap<String, Vec<Percept>>,
}

impl PerceptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any percept of the same predicate and arity.
    pub fn replace(&mut self, agent: &str, percept: Percept) {
        let percepts = self.by_agent.entry(agent.to_string()).or_default();
        percepts.retain(|p| !p.same_shape(&percept.predicate, percept.arity()));
        percepts.push(percept);
    }

    /// Remove percepts with this predicate and arity. Returns how many were removed.
    pub fn remove(&mut self, agent: &str, predicate: &str, arity: usize) -> usize {
        match self.by_agent.get_mut(agent) {
            Some(percepts) => {
                let before = percepts.len();
                percepts.retain(|p| !p.same_shape(predicate, arity));
                before - percepts.len()
            }
            None => 0,
        }
    }

    /// First percept with this predicate, of any arity.
    pub fn get(&self, agent: &str, predicate: &str) -> Option<&Percept> {
        self.all(agent).iter().find(|p| p.predicate == predicate)
    }

    pub fn count(&self, agent: &str, predicate: &str) -> usize {
        self.all(agent).iter().filter(|p| p.predicate == predicate).count()
    }

    pub fn all(&self, agent: &str) -> &[Percept] {
        self.by_agent.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }
}
