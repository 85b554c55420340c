use uuid::Uuid;

use crate::domain::{
    Budget, BudgetId, Generator, GeneratorId, Goal, GoalId, Identifiable, Owned, OwnerId,
    Transaction,
};
use crate::errors::{ProjectionError, RecordKind};

use super::{DataStore, Result, TransactionFilter};

/// Record set held in memory and queried by owner.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    transactions: Vec<Transaction>,
    generators: Vec<Generator>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_budget(&mut self, budget: Budget) -> BudgetId {
        let id = budget.id;
        self.budgets.push(budget);
        id
    }

    pub fn add_goal(&mut self, goal: Goal) -> GoalId {
        let id = goal.id;
        self.goals.push(goal);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn add_generator(&mut self, generator: Generator) -> GeneratorId {
        let id = generator.id;
        self.generators.push(generator);
        id
    }

    pub(crate) fn from_parts(
        budgets: Vec<Budget>,
        goals: Vec<Goal>,
        transactions: Vec<Transaction>,
        generators: Vec<Generator>,
    ) -> Self {
        Self {
            budgets,
            goals,
            transactions,
            generators,
        }
    }

    pub fn len(&self) -> usize {
        self.budgets.len() + self.goals.len() + self.transactions.len() + self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn owned_by<'a, T: Owned + Clone + 'a>(
    records: impl IntoIterator<Item = &'a T>,
    owner: OwnerId,
) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| record.is_owned_by(owner))
        .cloned()
        .collect()
}

fn find_owned<T: Identifiable + Owned + Clone>(
    records: &[T],
    owner: OwnerId,
    id: Uuid,
    kind: RecordKind,
) -> Result<T> {
    records
        .iter()
        .find(|record| record.id() == id && record.is_owned_by(owner))
        .cloned()
        .ok_or_else(|| ProjectionError::not_found(kind, id))
}

impl DataStore for MemoryStore {
    fn budget(&self, owner: OwnerId, id: BudgetId) -> Result<Budget> {
        find_owned(&self.budgets, owner, id, RecordKind::Budget)
    }

    fn budgets(&self, owner: OwnerId) -> Result<Vec<Budget>> {
        Ok(owned_by(&self.budgets, owner))
    }

    fn budgets_of_goal(&self, owner: OwnerId, goal: GoalId) -> Result<Vec<Budget>> {
        Ok(owned_by(
            self.budgets.iter().filter(|budget| budget.goal_id == Some(goal)),
            owner,
        ))
    }

    fn goal(&self, owner: OwnerId, id: GoalId) -> Result<Goal> {
        find_owned(&self.goals, owner, id, RecordKind::Goal)
    }

    fn goals(&self, owner: OwnerId) -> Result<Vec<Goal>> {
        Ok(owned_by(&self.goals, owner))
    }

    fn transactions(&self, owner: OwnerId, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        Ok(owned_by(
            self.transactions.iter().filter(|txn| filter.matches(txn)),
            owner,
        ))
    }

    fn generators(&self, owner: OwnerId, budget: Option<BudgetId>) -> Result<Vec<Generator>> {
        Ok(owned_by(
            self.generators
                .iter()
                .filter(|generator| budget.map_or(true, |budget| generator.touches(budget))),
            owner,
        ))
    }

    fn generator(&self, owner: OwnerId, id: GeneratorId) -> Result<Generator> {
        find_owned(&self.generators, owner, id, RecordKind::Generator)
    }
}
