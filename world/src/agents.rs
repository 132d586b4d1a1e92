//! Authoritative agent state storage.

use std::collections::BTreeMap;

use bw4t_core::{AgentId, CellCoord, ObjectId};

/// Agent stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct AgentState {
    /// Cell the agent currently occupies.
    pub(crate) cell: CellCoord,
    /// Team label the agent reports in snapshots.
    pub(crate) team: String,
    /// Block the agent carries, if any. Agents carry at most one block.
    pub(crate) carried: Option<ObjectId>,
}

/// Registry that stores agents and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct AgentRegistry {
    entries: BTreeMap<AgentId, AgentState>,
    next_agent_id: u32,
}

impl AgentRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, cell: CellCoord, team: String) -> AgentId {
        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id = self.next_agent_id.saturating_add(1);
        let _ = self.entries.insert(
            id,
            AgentState {
                cell,
                team,
                carried: None,
            },
        );
        id
    }

    pub(crate) fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.entries.get(&id)
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn agents(&self) -> impl Iterator<Item = (AgentId, &AgentState)> {
        self.entries.iter().map(|(id, state)| (*id, state))
    }

    pub(crate) fn agent_at(&self, cell: CellCoord) -> Option<AgentId> {
        self.entries
            .iter()
            .find(|(_, state)| state.cell == cell)
            .map(|(id, _)| *id)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_agent_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_ascending_identifiers() {
        let mut registry = AgentRegistry::new();
        let first = registry.insert(CellCoord::new(1, 1), "Team 0".to_owned());
        let second = registry.insert(CellCoord::new(2, 1), "Team 0".to_owned());

        assert!(first < second);
        assert_eq!(registry.agent_at(CellCoord::new(2, 1)), Some(second));
        assert_eq!(registry.agent_at(CellCoord::new(3, 1)), None);
    }
}
