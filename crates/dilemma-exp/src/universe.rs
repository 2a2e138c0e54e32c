//! The element universe
//!
//! An explicitly constructed, ordered list of agents established once per
//! run and passed into the pipeline. Multiple runs with different universes
//! or team sizes cannot interfere: there is no ambient global state.

use std::collections::HashMap;

use dilemma_common::{AgentSpec, PartitionError, Result};

/// The fixed universe of agents for one run
#[derive(Debug, Clone)]
pub struct Universe {
    agents: Vec<AgentSpec>,
    index: HashMap<String, usize>,
}

impl Universe {
    /// Build a universe from agent specs
    ///
    /// Rejects duplicate names; insertion order is preserved and is the
    /// order partitions are enumerated in.
    pub fn new(agents: Vec<AgentSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            if index.insert(agent.name.clone(), i).is_some() {
                return Err(PartitionError::DuplicateElement(agent.name.clone()).into());
            }
        }
        Ok(Self { agents, index })
    }

    /// Build a universe by looking up catalog strategies by name
    pub fn from_catalog(names: &[String]) -> Result<Self> {
        let agents = names
            .iter()
            .map(|name| {
                dilemma_engine::catalog::by_name(name)
                    .ok_or_else(|| PartitionError::UnknownElement(name.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(agents)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Element names in universe order
    pub fn names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name.clone()).collect()
    }

    /// Look up one agent by name
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.index.get(name).map(|&i| &self.agents[i])
    }

    /// All agents in universe order
    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dilemma_common::DilemmaError;

    #[test]
    fn test_from_catalog_preserves_order() {
        let names: Vec<String> = ["Tit For Tat", "Defector"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let universe = Universe::from_catalog(&names).unwrap();
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.names(), names);
        assert!(universe.get("Defector").is_some());
        assert!(universe.get("Cooperator").is_none());
    }

    #[test]
    fn test_unknown_catalog_name_rejected() {
        let err = Universe::from_catalog(&["Always Random".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            DilemmaError::Partition(PartitionError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let names: Vec<String> = ["Defector", "Defector"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = Universe::from_catalog(&names).unwrap_err();
        assert!(matches!(
            err,
            DilemmaError::Partition(PartitionError::DuplicateElement(_))
        ));
    }
}
