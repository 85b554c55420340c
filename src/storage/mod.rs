pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{
    Budget, BudgetId, Generator, GeneratorId, Goal, GoalId, OwnerId, Transaction,
};
use crate::errors::ProjectionError;

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Optional, inclusive filters applied when listing an owner's transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub budget: Option<BudgetId>,
}

impl TransactionFilter {
    pub fn for_budget(budget: BudgetId) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }

    pub fn until(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = date;
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.date_from.map_or(true, |from| txn.date >= from)
            && self.date_to.map_or(true, |to| txn.date <= to)
            && self.min_amount.map_or(true, |min| txn.amount >= min)
            && self.max_amount.map_or(true, |max| txn.amount <= max)
            && self.budget.map_or(true, |budget| txn.touches(budget))
    }
}

/// Read access to raw records, always scoped to one owner. Lookups of a single record
/// fail with `NotFound` when it is missing or belongs to someone else.
pub trait DataStore: Send + Sync {
    fn budget(&self, owner: OwnerId, id: BudgetId) -> Result<Budget>;
    fn budgets(&self, owner: OwnerId) -> Result<Vec<Budget>>;
    fn budgets_of_goal(&self, owner: OwnerId, goal: GoalId) -> Result<Vec<Budget>>;
    fn goal(&self, owner: OwnerId, id: GoalId) -> Result<Goal>;
    fn goals(&self, owner: OwnerId) -> Result<Vec<Goal>>;
    fn transactions(&self, owner: OwnerId, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    fn generators(&self, owner: OwnerId, budget: Option<BudgetId>) -> Result<Vec<Generator>>;
    fn generator(&self, owner: OwnerId, id: GeneratorId) -> Result<Generator>;
}

pub use json_backend::{load_snapshot_from_path, load_snapshot_from_str, StoreSnapshot};
pub use memory::MemoryStore;
