//! SharedSimulation - a cloneable handle for hosts that drive the world
//! from several threads.
//!
//! Every dispatch holds one lock over the whole world, so per-agent
//! histories stay sequential and observers run under the same lock.

use crate::notify::SubscriptionId;
use crate::simulation::Simulation;
use robofactory_core::observer::ModelObserver;
use robofactory_core::term::Term;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Lock the world. A panic in another holder does not leave the model
    /// half-written, so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dispatch(&self, agent: &str, action: &str, args: &[Term]) -> bool {
        self.lock().dispatch(agent, action, args)
    }

    pub fn subscribe(&self, observer: Box<dyn ModelObserver>) -> SubscriptionId {
        self.lock().subscribe(observer)
    }

    /// Run a closure with exclusive access.
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        f(&mut self.lock())
    }
}

impl From<Simulation> for SharedSimulation {
    fn from(simulation: Simulation) -> Self {
        Self::new(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationConfig;
    use std::thread;

    #[test]
    fn dispatch_from_many_threads() {
        let sim = Simulation::from_config(SimulationConfig {
            obstacle_count: 0,
            seed: Some(1),
            ..SimulationConfig::default()
        })
        .unwrap();
        let shared = SharedSimulation::new(sim);
        for i in 0..5i64 {
            let name = format!("d_bot_{}", i + 1);
            let args = [Term::atom(name.as_str()), 90.into(), Term::from(i * 2), 0.into()];
            assert!(shared.dispatch(&name, "init_agent", &args));
        }

        let handles: Vec<_> = (1..=5)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let name = format!("d_bot_{}", i);
                    for _ in 0..20 {
                        assert!(shared.dispatch(&name, "move_randomly", &[Term::Int(0), Term::Int(0)]));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.with(|sim| sim.registry().len()), 5);
    }
}
