//! AgentRegistry - the named agents on the floor, in registration order.

use robofactory_core::agent::Agent;
use robofactory_core::types::{self, AgentId, Cell};

#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an agent, replacing any agent with the same name in place.
    /// Returns the replaced agent.
    pub fn register(&mut self, agent: Agent) -> Option<Agent> {
        match self.agents.iter_mut().find(|a| a.name() == agent.name()) {
            Some(slot) => Some(std::mem::replace(slot, agent)),
            None => {
                self.agents.push(agent);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Agent> {
        let idx = self.agents.iter().position(|a| a.name() == name)?;
        Some(self.agents.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.name() == name)
    }

    /// Unknown ids never match, even though several names share `-1`.
    pub fn get_by_id(&self, id: AgentId) -> Option<&Agent> {
        if !id.is_known() {
            return None;
        }
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Agent at a cell. When several share it, the last registered wins.
    pub fn by_location(&self, cell: Cell) -> Option<&Agent> {
        self.agents.iter().rev().find(|a| a.location() == cell)
    }

    /// Whether a robot or human other than `except` stands on `cell`.
    pub fn occupied_by_other(&self, cell: Cell, except: &str) -> bool {
        self.agents
            .iter()
            .any(|a| a.kind.is_mobile() && a.location() == cell && a.name() != except)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Static table lookup: unknown or missing names yield `-1`.
    pub fn id_of(name: Option<&str>) -> i32 {
        types::id_of(name)
    }

    /// Static table lookup: unknown ids yield `"unknown"`.
    pub fn name_of(id: i32) -> &'static str {
        types::name_of(id)
    }
}
