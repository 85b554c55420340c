use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::changes::BalanceEvent;
use crate::domain::{BudgetId, Generator, Periodicity};
use crate::errors::{ProjectionError, Result};

/// The calendar part of a generator: where it starts, where it stops, how it steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub anchor: NaiveDate,
    pub end: Option<NaiveDate>,
    pub periodicity: Periodicity,
}

impl Recurrence {
    pub fn new(anchor: NaiveDate, end: Option<NaiveDate>, periodicity: Periodicity) -> Self {
        Self {
            anchor,
            end,
            periodicity,
        }
    }

    pub fn of(generator: &Generator) -> Self {
        Self::new(generator.date_from, generator.date_to, generator.periodicity)
    }

    /// Occurrences in `[from, min(end, until)]`. A rule whose end precedes its anchor
    /// yields nothing.
    pub fn occurrences(&self, from: Option<NaiveDate>, until: NaiveDate) -> Occurrences {
        let limit = match self.end {
            Some(end) => end.min(until),
            None => until,
        };
        let index = from.map_or(0, |from| {
            self.periodicity.first_index_on_or_after(self.anchor, from)
        });
        Occurrences {
            periodicity: self.periodicity,
            anchor: self.anchor,
            limit,
            index,
        }
    }

    /// Final occurrence of a closed rule; `None` for open-ended or empty rules.
    pub fn last_occurrence(&self) -> Option<NaiveDate> {
        let end = self.end?;
        if end < self.anchor {
            return None;
        }
        let past_end = end.succ_opt()?;
        let index = self
            .periodicity
            .first_index_on_or_after(self.anchor, past_end);
        self.periodicity.nth_from(self.anchor, index.checked_sub(1)?)
    }

    /// Number of occurrences strictly before `date`, computed without iterating.
    pub fn count_before(&self, date: NaiveDate) -> u64 {
        let cutoff = match self.end {
            Some(end) if end < self.anchor => return 0,
            Some(end) => match end.succ_opt() {
                Some(past_end) => past_end.min(date),
                None => date,
            },
            None => date,
        };
        self.periodicity.first_index_on_or_after(self.anchor, cutoff)
    }
}

/// Lazy, finite occurrence dates of a [`Recurrence`]. Cloning restarts from the same point.
#[derive(Debug, Clone)]
pub struct Occurrences {
    periodicity: Periodicity,
    anchor: NaiveDate,
    limit: NaiveDate,
    index: u64,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self
            .periodicity
            .nth_from(self.anchor, self.index)
            .filter(|date| *date <= self.limit)?;
        self.index += 1;
        Some(date)
    }
}

/// Balance events `generator` produces for `budget` within `[from, until]`.
/// Empty when the generator does not move money in or out of `budget`.
pub fn expand(
    generator: &Generator,
    budget: BudgetId,
    from: Option<NaiveDate>,
    until: NaiveDate,
) -> impl Iterator<Item = BalanceEvent> + Clone {
    let effect = generator.effect_on(budget);
    let dates = effect.map(|_| Recurrence::of(generator).occurrences(from, until));
    let delta = effect.unwrap_or(Decimal::ZERO);
    dates
        .into_iter()
        .flatten()
        .map(move |date| BalanceEvent::new(date, delta))
}

/// Net change `generator` applied to `budget` on every occurrence before `date`.
pub fn net_before(generator: &Generator, budget: BudgetId, date: NaiveDate) -> Result<Decimal> {
    let Some(delta) = generator.effect_on(budget) else {
        return Ok(Decimal::ZERO);
    };
    let count = Recurrence::of(generator).count_before(date);
    delta.checked_mul(Decimal::from(count)).ok_or_else(|| {
        ProjectionError::overflow(format!(
            "summing {count} occurrences of generator {}",
            generator.id
        ))
    })
}

/// Materializes [`expand`] while enforcing `limit` occurrences per generator.
pub fn expand_limited(
    generator: &Generator,
    budget: BudgetId,
    from: Option<NaiveDate>,
    until: NaiveDate,
    limit: usize,
) -> Result<Vec<BalanceEvent>> {
    let mut events = Vec::new();
    for event in expand(generator, budget, from, until) {
        if events.len() >= limit {
            return Err(ProjectionError::OccurrenceLimit {
                generator: generator.id,
                limit,
            });
        }
        events.push(event);
    }
    debug!(
        generator = %generator.id,
        budget = %budget,
        occurrences = events.len(),
        "expanded generator"
    );
    Ok(events)
}
