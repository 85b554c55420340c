use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::domain::{Budget, BudgetId, Goal, GoalId};
use crate::ledger::BalanceSeries;

/// A budget together with its projected daily balances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub id: BudgetId,
    pub title: String,
    pub goal_id: Option<GoalId>,
    pub amounts: BalanceSeries,
}

impl BudgetSummary {
    pub fn new(budget: Budget, amounts: BalanceSeries) -> Self {
        Self {
            id: budget.id,
            title: budget.title,
            goal_id: budget.goal_id,
            amounts,
        }
    }
}

/// A goal with the day-aligned sum of its budgets' balances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub title: String,
    #[serde(serialize_with = "decimal_as_f64")]
    pub target_amount: Decimal,
    pub amounts: BalanceSeries,
}

impl GoalSummary {
    pub fn new(goal: Goal, amounts: BalanceSeries) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            target_amount: goal.target_amount,
            amounts,
        }
    }

    /// Latest aggregated balance minus the target; negative while the goal is unmet.
    pub fn surplus(&self) -> Option<Decimal> {
        let (_, balance) = self.amounts.last()?;
        balance.checked_sub(self.target_amount)
    }
}

fn decimal_as_f64<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let float = value
        .to_f64()
        .ok_or_else(|| S::Error::custom(format!("amount {value} is not representable")))?;
    serializer.serialize_f64(float)
}
