use std::collections::HashSet;

use crate::domain::identifiers::{Capability, ScopeId};

/// Sections the workflow is switched on for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnabledSections {
    All,
    Only(HashSet<ScopeId>),
}

impl EnabledSections {
    pub fn contains(&self, scope: &ScopeId) -> bool {
        match self {
            EnabledSections::All => true,
            EnabledSections::Only(sections) => sections.contains(scope),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub enabled_sections: EnabledSections,
    /// Needed to submit
    pub editor_capability: Capability,
    /// Needed to approve or reject
    pub publisher_capability: Capability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_sections() {
        let news = ScopeId::try_new("news").unwrap();
        let blog = ScopeId::try_new("blog").unwrap();

        assert!(EnabledSections::All.contains(&news));

        let only = EnabledSections::Only(HashSet::from([news.clone()]));
        assert!(only.contains(&news));
        assert!(!only.contains(&blog));
        assert!(!EnabledSections::Only(HashSet::new()).contains(&news));
    }
}
