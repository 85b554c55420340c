use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{Budget, Goal, GoalId, OwnerId, Window};
use crate::errors::ProjectionError;
use crate::ledger::BalanceSeries;
use crate::storage::DataStore;

use super::{BudgetService, GoalSummary, ServiceResult};

/// Aggregates the projected balances of every budget linked to a goal.
pub struct GoalService<'a, S: DataStore + ?Sized> {
    store: &'a S,
    budgets: BudgetService<'a, S>,
}

impl<'a, S: DataStore + ?Sized> GoalService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            budgets: BudgetService::new(store),
        }
    }

    pub fn with_config(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            budgets: BudgetService::with_config(store, config),
        }
    }

    pub fn series(
        &self,
        owner: OwnerId,
        goal_id: GoalId,
        window: &Window,
    ) -> ServiceResult<GoalSummary> {
        window.validate()?;
        let goal = self.store.goal(owner, goal_id)?;
        let summary = self.summarize(owner, goal, window)?;
        info!(
            goal = %summary.id,
            days = summary.amounts.len(),
            "projected goal balances"
        );
        Ok(summary)
    }

    pub fn list(&self, owner: OwnerId, window: &Window) -> ServiceResult<Vec<GoalSummary>> {
        window.validate()?;
        let goals = self.store.goals(owner)?;
        let summaries = goals
            .into_iter()
            .map(|goal| self.summarize(owner, goal, window))
            .collect::<ServiceResult<Vec<_>>>()?;
        info!(goals = summaries.len(), "projected owner goals");
        Ok(summaries)
    }

    fn summarize(&self, owner: OwnerId, goal: Goal, window: &Window) -> ServiceResult<GoalSummary> {
        let budgets = self.store.budgets_of_goal(owner, goal.id)?;
        let wrap = |budget: &Budget| {
            let goal = goal.id;
            let budget = budget.id;
            move |source| ProjectionError::GoalBudget {
                goal,
                budget,
                source: Box::new(source),
            }
        };

        let mut records = Vec::with_capacity(budgets.len());
        for budget in &budgets {
            records.push(
                self.budgets
                    .load_records(owner, budget, window)
                    .map_err(wrap(budget))?,
            );
        }

        // One end date for every budget, so none stops short of the others' changes.
        let until = window.end.or_else(|| {
            records
                .iter()
                .map(|records| records.horizon())
                .max()
                .flatten()
                .max(window.start)
        });

        let mut parts = Vec::with_capacity(budgets.len());
        for (budget, records) in budgets.iter().zip(&records) {
            parts.push(
                self.budgets
                    .project_records(records, window, until)
                    .map_err(wrap(budget))?,
            );
        }

        let mut amounts = BalanceSeries::sum(&parts)?;
        // Budgets with an open start can begin on different days; keep the total gap-free.
        if let (Some((first, _)), Some((last, _))) = (amounts.first(), amounts.last()) {
            amounts.densify(first, last);
        }
        debug!(goal = %goal.id, budgets = budgets.len(), "aggregated goal budgets");
        Ok(GoalSummary::new(goal, amounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Generator, Periodicity, Transaction};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn goal_without_budgets_is_empty() {
        let owner = Uuid::new_v4();
        let mut store = MemoryStore::new();
        let goal = store.add_goal(Goal::new(owner, "Car", dec!(5000)));
        let window = Window::bounded(date(2024, 1, 1), date(2024, 1, 5)).unwrap();

        let summary = GoalService::new(&store).series(owner, goal, &window).unwrap();
        assert!(summary.amounts.is_empty());
        assert_eq!(summary.target_amount, dec!(5000));
    }

    #[test]
    fn open_start_totals_are_gap_free() {
        let owner = Uuid::new_v4();
        let mut store = MemoryStore::new();
        let goal = store.add_goal(Goal::new(owner, "House", dec!(100)));
        let a = store.add_budget(Budget::new(owner, "A").with_goal(goal));
        let b = store.add_budget(Budget::new(owner, "B").with_goal(goal));
        store.add_transaction(
            Transaction::new(owner, "Seed A", date(2024, 1, 1), dec!(10)).with_budget_to(a),
        );
        store.add_transaction(
            Transaction::new(owner, "Seed B", date(2024, 1, 4), dec!(5)).with_budget_to(b),
        );
        let window = Window::new(None, Some(date(2024, 1, 5))).unwrap();

        let summary = GoalService::new(&store).series(owner, goal, &window).unwrap();
        let values: Vec<_> = summary.amounts.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![dec!(10), dec!(10), dec!(10), dec!(15), dec!(15)]);
        assert_eq!(summary.surplus(), Some(dec!(-85)));
    }

    #[test]
    fn failing_budget_names_goal_and_budget() {
        let owner = Uuid::new_v4();
        let mut store = MemoryStore::new();
        let goal = store.add_goal(Goal::new(owner, "Trip", Decimal::ZERO));
        let budget = store.add_budget(Budget::new(owner, "Tickets").with_goal(goal));
        store.add_generator(
            Generator::new(
                owner,
                "Broken",
                dec!(1),
                Periodicity::daily(1).unwrap(),
                date(2024, 2, 1),
            )
            .with_budget_to(budget)
            .until(date(2024, 1, 1)),
        );
        let window = Window::bounded(date(2024, 1, 1), date(2024, 1, 5)).unwrap();

        let err = GoalService::new(&store).series(owner, goal, &window).unwrap_err();
        match err {
            ProjectionError::GoalBudget {
                goal: g,
                budget: b,
                source,
            } => {
                assert_eq!(g, goal);
                assert_eq!(b, budget);
                assert!(matches!(*source, ProjectionError::InvalidRecurrenceRule { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
