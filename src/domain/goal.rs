use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{GoalId, Identifiable, NamedEntity, Owned, OwnerId};

/// A savings target backed by the budgets that reference it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalId,
    pub owner_id: OwnerId,
    pub title: String,
    pub target_amount: Decimal,
}

impl Goal {
    pub fn new(owner_id: OwnerId, title: impl Into<String>, target_amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            target_amount,
        }
    }
}

impl Identifiable for Goal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Goal {
    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }
}

impl NamedEntity for Goal {
    fn title(&self) -> &str {
        &self.title
    }
}
