use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{BudgetId, GoalId, Identifiable, NamedEntity, Owned, OwnerId};

/// A named pool of money. Its balance is always derived from movements, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Budget {
    pub id: BudgetId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub goal_id: Option<GoalId>,
}

impl Budget {
    pub fn new(owner_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            goal_id: None,
        }
    }

    pub fn with_goal(mut self, goal_id: GoalId) -> Self {
        self.goal_id = Some(goal_id);
        self
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Budget {
    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }
}

impl NamedEntity for Budget {
    fn title(&self) -> &str {
        &self.title
    }
}
