//! Calendar stepping for generator periodicities.
//!
//! Occurrence `n` of a rule is always computed from the rule's anchor
//! (`anchor + n × factor` units) rather than from occurrence `n - 1`. Month and
//! year steps use chrono's `checked_add_months`, which clamps the day to the last
//! day of the target month: an anchor of 31-01-2024 stepping monthly yields
//! 29-02-2024, 31-03-2024, 30-04-2024, ... with no drift toward the 29th.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::domain::Periodicity;

impl Periodicity {
    /// Date of the `index`-th occurrence counted from `anchor` (index 0 is the anchor).
    /// `None` when the date falls outside chrono's representable range.
    pub fn nth_from(&self, anchor: NaiveDate, index: u64) -> Option<NaiveDate> {
        let steps = index.checked_mul(u64::from(self.factor()))?;
        match self {
            Periodicity::Daily(_) => anchor.checked_add_days(Days::new(steps)),
            Periodicity::Monthly(_) => add_months(anchor, steps),
            Periodicity::Yearly(_) => add_months(anchor, steps.checked_mul(12)?),
        }
    }

    /// Smallest occurrence index whose date is on or after `target`.
    pub fn first_index_on_or_after(&self, anchor: NaiveDate, target: NaiveDate) -> u64 {
        if target <= anchor {
            return 0;
        }
        let factor = i64::from(self.factor());
        let mut index = match self {
            Periodicity::Daily(_) => {
                let days = (target - anchor).num_days();
                return (days + factor - 1).div_euclid(factor) as u64;
            }
            Periodicity::Monthly(_) => month_index(target) - month_index(anchor),
            Periodicity::Yearly(_) => i64::from(target.year() - anchor.year()) * 12,
        };
        index = index.div_euclid(factor * unit_months(self)).max(0);
        let mut index = index as u64;
        // The floor lands on or one step before the target month; step forward until we pass it.
        while self
            .nth_from(anchor, index)
            .is_some_and(|date| date < target)
        {
            index += 1;
        }
        index
    }
}

fn unit_months(periodicity: &Periodicity) -> i64 {
    match periodicity {
        Periodicity::Yearly(_) => 12,
        _ => 1,
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn add_months(date: NaiveDate, months: u64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}
