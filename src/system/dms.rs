//! Decision-making system

use crate::config::ElicitationConfig;
use crate::context::DecisionMakerId;
use crate::history::History;
use crate::model::cone::PreferenceCone;

/// One decision maker together with the history it exclusively owns
#[derive(Clone, Debug)]
pub struct DecisionMakingSystem {
    id: DecisionMakerId,
    history: History,
}

impl DecisionMakingSystem {
    /// Create a system with an empty history named after the decision maker
    pub fn new(id: impl Into<DecisionMakerId>) -> Self {
        let id = id.into();
        let history = History::new(id.as_str());
        Self { id, history }
    }

    /// Single decision maker identified by the configured history name
    pub fn from_config(config: &ElicitationConfig) -> Self {
        Self::new(config.history_name.as_str())
    }

    /// Create a system around an existing (e.g. restored) history
    pub fn with_history(id: impl Into<DecisionMakerId>, history: History) -> Self {
        Self {
            id: id.into(),
            history,
        }
    }

    /// Decision maker identity
    pub fn id(&self) -> &DecisionMakerId {
        &self.id
    }

    /// Recorded preference information
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Mutable access for model constructors pruning inconsistent judgments
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Preference cone over everything recorded so far
    pub fn preference_cone(&self) -> PreferenceCone {
        PreferenceCone::from_history(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternative::alternative::Alternative;
    use crate::statement::statement::PreferenceStatement;

    #[test]
    fn test_history_named_after_dm() {
        let system = DecisionMakingSystem::new("dm1");
        assert_eq!(system.id().as_str(), "dm1");
        assert_eq!(system.history().name(), "dm1");
        assert!(system.history().is_empty());
    }

    #[test]
    fn test_from_config_uses_history_name() {
        let config = ElicitationConfig::from_json(r#"{ "history_name": "lead" }"#).unwrap();
        let system = DecisionMakingSystem::from_config(&config);
        assert_eq!(system.id().as_str(), "lead");
        assert_eq!(system.history().name(), "lead");
    }

    #[test]
    fn test_cone_reflects_history() {
        let mut system = DecisionMakingSystem::new("dm1");
        let history = system.history_mut();
        let w = history.wrap(
            PreferenceStatement::preference(
                Alternative::new("A", vec![1.0, 5.0]),
                Alternative::new("B", vec![2.0, 1.0]),
            ),
            0,
            None,
        )
        .unwrap();
        history.register_preference_information(vec![w]).unwrap();

        let cone = system.preference_cone();
        assert_eq!(cone.statements().len(), 1);
    }
}
