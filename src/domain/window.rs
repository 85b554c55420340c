use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ProjectionError, Result};

/// Inclusive `[start, end]` range a series is requested over; either bound may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    #[serde(default, with = "super::common::option_date_format")]
    pub start: Option<NaiveDate>,
    #[serde(default, with = "super::common::option_date_format")]
    pub end: Option<NaiveDate>,
}

impl Window {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Rejects windows whose end precedes their start. Equal bounds are a one-day window.
    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(ProjectionError::InvalidWindow { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Number of calendar days covered, when both bounds are known.
    pub fn days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }
}
