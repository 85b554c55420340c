use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_OCCURRENCE_LIMIT};
use crate::domain::common::format_date;
use crate::domain::{Budget, BudgetId, Generator, OwnerId, Transaction, Window};
use crate::errors::ProjectionError;
use crate::ledger::{collect, expand_limited, net_before, project, BalanceSeries, Recurrence};
use crate::storage::{DataStore, TransactionFilter};

use super::{BudgetSummary, ServiceResult};

/// Projects daily balances for budgets held in a [`DataStore`].
pub struct BudgetService<'a, S: DataStore + ?Sized> {
    store: &'a S,
    occurrence_limit: usize,
}

impl<'a, S: DataStore + ?Sized> BudgetService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            occurrence_limit: DEFAULT_OCCURRENCE_LIMIT,
        }
    }

    pub fn with_config(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            occurrence_limit: config.occurrence_limit,
        }
    }

    /// Balance series of one budget over `window`.
    pub fn series(
        &self,
        owner: OwnerId,
        budget_id: BudgetId,
        window: &Window,
    ) -> ServiceResult<BudgetSummary> {
        window.validate()?;
        let budget = self.store.budget(owner, budget_id)?;
        let amounts = self.project_budget(owner, &budget, window)?;
        info!(
            budget = %budget.id,
            days = amounts.len(),
            "projected budget balances"
        );
        Ok(BudgetSummary::new(budget, amounts))
    }

    /// Balance series of every budget the owner holds.
    pub fn list(&self, owner: OwnerId, window: &Window) -> ServiceResult<Vec<BudgetSummary>> {
        window.validate()?;
        let budgets = self.store.budgets(owner)?;
        let mut summaries = Vec::with_capacity(budgets.len());
        for budget in budgets {
            let amounts = self.project_budget(owner, &budget, window)?;
            summaries.push(BudgetSummary::new(budget, amounts));
        }
        info!(budgets = summaries.len(), "projected owner budgets");
        Ok(summaries)
    }

    /// Runs the projection for an already loaded budget. `window` must be valid.
    pub(crate) fn project_budget(
        &self,
        owner: OwnerId,
        budget: &Budget,
        window: &Window,
    ) -> ServiceResult<BalanceSeries> {
        let records = self.load_records(owner, budget, window)?;
        let until = window
            .end
            .or_else(|| records.horizon().max(window.start));
        self.project_records(&records, window, until)
    }

    /// Fetches and validates everything that moves money in or out of `budget`.
    pub(crate) fn load_records(
        &self,
        owner: OwnerId,
        budget: &Budget,
        window: &Window,
    ) -> ServiceResult<BudgetRecords> {
        let filter = TransactionFilter::for_budget(budget.id).until(window.end);
        let transactions = self.store.transactions(owner, &filter)?;
        let generators = self.store.generators(owner, Some(budget.id))?;
        for generator in &generators {
            generator.validate()?;
        }
        report_self_transfers(budget.id, &transactions, &generators);
        Ok(BudgetRecords {
            budget: budget.id,
            transactions,
            generators,
        })
    }

    /// Projects `records` over `window`, filling and expanding generators through `until`.
    pub(crate) fn project_records(
        &self,
        records: &BudgetRecords,
        window: &Window,
        until: Option<NaiveDate>,
    ) -> ServiceResult<BalanceSeries> {
        let budget = records.budget;
        let opening = match window.start {
            Some(start) => {
                opening_balance(budget, &records.transactions, &records.generators, start)?
            }
            None => Decimal::ZERO,
        };

        let mut generated = Vec::new();
        if let Some(until) = until {
            for generator in &records.generators {
                generated.extend(expand_limited(
                    generator,
                    budget,
                    window.start,
                    until,
                    self.occurrence_limit,
                )?);
            }
        }

        let events = collect(budget, &records.transactions, generated, window);
        debug!(
            budget = %budget,
            opening = %opening,
            until = ?until.map(format_date),
            "projecting budget"
        );
        project(opening, events, window.start, until)
    }
}

/// Raw records of one budget, fetched once per projection.
pub(crate) struct BudgetRecords {
    budget: BudgetId,
    transactions: Vec<Transaction>,
    generators: Vec<Generator>,
}

impl BudgetRecords {
    /// Latest dated change to the budget: the last transaction touching it or the final
    /// occurrence of a generator with an end date. Open-ended generators do not count.
    pub(crate) fn horizon(&self) -> Option<NaiveDate> {
        let last_transaction = self
            .transactions
            .iter()
            .filter(|txn| txn.effect_on(self.budget).is_some())
            .map(|txn| txn.date)
            .max();
        let last_generated = self
            .generators
            .iter()
            .filter(|generator| generator.effect_on(self.budget).is_some())
            .filter_map(|generator| Recurrence::of(generator).last_occurrence())
            .max();
        last_transaction.max(last_generated)
    }
}

/// Net of every change to `budget` strictly before `start`.
fn opening_balance(
    budget: BudgetId,
    transactions: &[Transaction],
    generators: &[Generator],
    start: NaiveDate,
) -> Result<Decimal, ProjectionError> {
    let overflow = || {
        ProjectionError::overflow(format!(
            "computing the opening balance before {}",
            format_date(start)
        ))
    };
    let mut opening = Decimal::ZERO;
    for delta in transactions
        .iter()
        .filter(|txn| txn.date < start)
        .filter_map(|txn| txn.effect_on(budget))
    {
        opening = opening.checked_add(delta).ok_or_else(overflow)?;
    }
    for generator in generators {
        let delta = net_before(generator, budget, start)?;
        opening = opening.checked_add(delta).ok_or_else(overflow)?;
    }
    Ok(opening)
}

fn report_self_transfers(budget: BudgetId, transactions: &[Transaction], generators: &[Generator]) {
    let transfers = transactions
        .iter()
        .filter(|txn| txn.budget_from == Some(budget) && txn.budget_to == Some(budget))
        .count();
    let generated = generators
        .iter()
        .filter(|g| g.budget_from == Some(budget) && g.budget_to == Some(budget))
        .count();
    if transfers + generated > 0 {
        warn!(
            budget = %budget,
            transactions = transfers,
            generators = generated,
            "skipping records that move money from a budget into itself"
        );
    }
}
