use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{BudgetId, Identifiable, NamedEntity, Owned, OwnerId, TransactionId};

/// A dated money movement. `amount` leaves `budget_from` and lands in `budget_to`;
/// either side may be absent for pure income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(with = "super::common::date_format")]
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub budget_from: Option<BudgetId>,
    #[serde(default)]
    pub budget_to: Option<BudgetId>,
}

impl Transaction {
    pub fn new(
        owner_id: OwnerId,
        title: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            date,
            amount,
            budget_from: None,
            budget_to: None,
        }
    }

    pub fn with_budget_from(mut self, budget: BudgetId) -> Self {
        self.budget_from = Some(budget);
        self
    }

    pub fn with_budget_to(mut self, budget: BudgetId) -> Self {
        self.budget_to = Some(budget);
        self
    }

    pub fn touches(&self, budget: BudgetId) -> bool {
        self.budget_from == Some(budget) || self.budget_to == Some(budget)
    }

    /// Signed change this transaction applies to `budget`, if any.
    pub fn effect_on(&self, budget: BudgetId) -> Option<Decimal> {
        directional_delta(self.amount, self.budget_from, self.budget_to, budget)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Transaction {
    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }
}

impl NamedEntity for Transaction {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Decreases `from`, increases `to`. A movement from a budget into itself nets to nothing.
pub(crate) fn directional_delta(
    amount: Decimal,
    from: Option<BudgetId>,
    to: Option<BudgetId>,
    budget: BudgetId,
) -> Option<Decimal> {
    match (from == Some(budget), to == Some(budget)) {
        (true, true) | (false, false) => None,
        (true, false) => Some(-amount),
        (false, true) => Some(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        Transaction::new(Uuid::new_v4(), "Rent", date, dec!(750.25))
    }

    #[test]
    fn transfer_debits_source_and_credits_destination() {
        let checking = Uuid::new_v4();
        let savings = Uuid::new_v4();
        let txn = sample().with_budget_from(checking).with_budget_to(savings);

        assert_eq!(txn.effect_on(checking), Some(dec!(-750.25)));
        assert_eq!(txn.effect_on(savings), Some(dec!(750.25)));
        assert_eq!(txn.effect_on(Uuid::new_v4()), None);
    }

    #[test]
    fn self_transfer_has_no_effect() {
        let budget = Uuid::new_v4();
        let txn = sample().with_budget_from(budget).with_budget_to(budget);
        assert!(txn.touches(budget));
        assert_eq!(txn.effect_on(budget), None);
    }

    #[test]
    fn dates_serialize_in_day_month_year() {
        let txn = sample();
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["date"], "15-01-2024");
        assert_eq!(json["amount"], "750.25");
    }
}
