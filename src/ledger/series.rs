use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

use crate::domain::common::format_date;
use crate::errors::{ProjectionError, Result};

/// Running balance per calendar day, ascending, one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSeries {
    entries: BTreeMap<NaiveDate, Decimal>,
}

impl BalanceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `balance` for `date`, replacing any earlier value for that day.
    pub fn insert(&mut self, date: NaiveDate, balance: Decimal) {
        self.entries.insert(date, balance);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<Decimal> {
        self.entries.get(&date).copied()
    }

    pub fn first(&self) -> Option<(NaiveDate, Decimal)> {
        self.entries.first_key_value().map(|(d, v)| (*d, *v))
    }

    pub fn last(&self) -> Option<(NaiveDate, Decimal)> {
        self.entries.last_key_value().map(|(d, v)| (*d, *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.entries.iter().map(|(d, v)| (*d, *v))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Balance in effect on `date`: the entry for that day or the closest earlier one.
    pub fn balance_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.entries
            .range(..=date)
            .next_back()
            .map(|(_, balance)| *balance)
    }

    /// True when every day between the first and last entry is present.
    pub fn is_dense(&self) -> bool {
        match (self.first(), self.last()) {
            (Some((first, _)), Some((last, _))) => {
                (last - first).num_days() + 1 == self.entries.len() as i64
            }
            _ => true,
        }
    }

    /// Fills every missing day in `[start, end]` with the carried-forward balance.
    /// Days before the first known entry carry zero.
    pub fn densify(&mut self, start: NaiveDate, end: NaiveDate) {
        let mut current = self.balance_on(start).unwrap_or(Decimal::ZERO);
        let mut day = start;
        while day <= end {
            match self.entries.get(&day) {
                Some(balance) => current = *balance,
                None => {
                    self.entries.insert(day, current);
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    /// Sums several series day by day. Dates are matched by calendar equality; a series
    /// without an entry for some date contributes its carried-forward balance, or zero
    /// before its first entry.
    pub fn sum<'a, I>(series: I) -> Result<BalanceSeries>
    where
        I: IntoIterator<Item = &'a BalanceSeries>,
    {
        let series: Vec<&BalanceSeries> = series.into_iter().collect();
        let dates: BTreeSet<NaiveDate> = series.iter().flat_map(|s| s.dates()).collect();
        let mut total = BalanceSeries::new();
        for date in dates {
            let mut balance = Decimal::ZERO;
            for part in &series {
                let contribution = part.balance_on(date).unwrap_or(Decimal::ZERO);
                balance = balance.checked_add(contribution).ok_or_else(|| {
                    ProjectionError::overflow(format!("aggregating balances on {}", format_date(date)))
                })?;
            }
            total.insert(date, balance);
        }
        Ok(total)
    }
}

impl FromIterator<(NaiveDate, Decimal)> for BalanceSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Serialized as `{"DD-MM-YYYY": balance}` in ascending date order. Balances become
/// `f64` only here.
impl Serialize for BalanceSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (date, balance) in &self.entries {
            let value = balance
                .to_f64()
                .ok_or_else(|| S::Error::custom(format!("balance {balance} is not representable")))?;
            map.serialize_entry(&format_date(*date), &value)?;
        }
        map.end()
    }
}
