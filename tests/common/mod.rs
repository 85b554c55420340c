#![allow(dead_code)]

use balance_core::domain::{Budget, BudgetId, Generator, Goal, GoalId, OwnerId, Periodicity, Transaction};
use balance_core::MemoryStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// One owner and an in-memory store, with helpers that mirror how records are
/// normally created by the surrounding application.
pub struct Household {
    pub owner: OwnerId,
    pub store: MemoryStore,
}

impl Household {
    pub fn new() -> Self {
        Self {
            owner: Uuid::new_v4(),
            store: MemoryStore::new(),
        }
    }

    pub fn budget(&mut self, title: &str) -> BudgetId {
        self.store.add_budget(Budget::new(self.owner, title))
    }

    pub fn budget_for_goal(&mut self, title: &str, goal: GoalId) -> BudgetId {
        self.store
            .add_budget(Budget::new(self.owner, title).with_goal(goal))
    }

    pub fn goal(&mut self, title: &str, target: Decimal) -> GoalId {
        self.store.add_goal(Goal::new(self.owner, title, target))
    }

    pub fn deposit(&mut self, budget: BudgetId, on: NaiveDate, amount: Decimal) {
        self.store.add_transaction(
            Transaction::new(self.owner, "Deposit", on, amount).with_budget_to(budget),
        );
    }

    pub fn withdraw(&mut self, budget: BudgetId, on: NaiveDate, amount: Decimal) {
        self.store.add_transaction(
            Transaction::new(self.owner, "Withdrawal", on, amount).with_budget_from(budget),
        );
    }

    pub fn standing_order(
        &mut self,
        budget: BudgetId,
        periodicity: Periodicity,
        from: NaiveDate,
        amount: Decimal,
    ) -> Uuid {
        self.store.add_generator(
            Generator::new(self.owner, "Standing order", amount, periodicity, from)
                .with_budget_to(budget),
        )
    }

    pub fn add_generator(&mut self, generator: Generator) -> Uuid {
        self.store.add_generator(generator)
    }
}
