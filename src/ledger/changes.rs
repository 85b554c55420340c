use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{BudgetId, Transaction, Window};

/// A signed balance change for one budget on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceEvent {
    pub date: NaiveDate,
    pub delta: Decimal,
}

impl BalanceEvent {
    pub fn new(date: NaiveDate, delta: Decimal) -> Self {
        Self { date, delta }
    }
}

/// Merges the in-window transactions touching `budget` with generator events that
/// were already expanded for it. The result is unordered.
pub fn collect<I>(
    budget: BudgetId,
    transactions: &[Transaction],
    generator_events: I,
    window: &Window,
) -> Vec<BalanceEvent>
where
    I: IntoIterator<Item = BalanceEvent>,
{
    let mut events: Vec<BalanceEvent> = transactions
        .iter()
        .filter(|txn| window.contains(txn.date))
        .filter_map(|txn| {
            txn.effect_on(budget)
                .map(|delta| BalanceEvent::new(txn.date, delta))
        })
        .collect();
    let from_transactions = events.len();
    events.extend(generator_events);
    debug!(
        budget = %budget,
        transactions = from_transactions,
        generated = events.len() - from_transactions,
        "collected balance events"
    );
    events
}
