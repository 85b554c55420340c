use std::fmt;
use std::num::NonZeroU32;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{BudgetId, GeneratorId, Identifiable, NamedEntity, Owned, OwnerId};
use super::transaction::directional_delta;
use crate::errors::{ProjectionError, Result};

/// Calendar unit a generator advances by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PeriodKind {
    Daily,
    Monthly,
    Yearly,
}

/// How often a generator fires: every `factor` days, months, or years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "factor")]
pub enum Periodicity {
    Daily(NonZeroU32),
    Monthly(NonZeroU32),
    Yearly(NonZeroU32),
}

impl Periodicity {
    /// Builds a periodicity from raw parts. A zero factor never advances and is rejected.
    pub fn new(kind: PeriodKind, factor: u32, generator: GeneratorId) -> Result<Self> {
        let factor =
            NonZeroU32::new(factor).ok_or_else(|| ProjectionError::InvalidRecurrenceRule {
                generator,
                reason: "periodicity factor must be at least 1".into(),
            })?;
        Ok(match kind {
            PeriodKind::Daily => Periodicity::Daily(factor),
            PeriodKind::Monthly => Periodicity::Monthly(factor),
            PeriodKind::Yearly => Periodicity::Yearly(factor),
        })
    }

    pub fn daily(factor: u32) -> Option<Self> {
        NonZeroU32::new(factor).map(Periodicity::Daily)
    }

    pub fn monthly(factor: u32) -> Option<Self> {
        NonZeroU32::new(factor).map(Periodicity::Monthly)
    }

    pub fn yearly(factor: u32) -> Option<Self> {
        NonZeroU32::new(factor).map(Periodicity::Yearly)
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Periodicity::Daily(_) => PeriodKind::Daily,
            Periodicity::Monthly(_) => PeriodKind::Monthly,
            Periodicity::Yearly(_) => PeriodKind::Yearly,
        }
    }

    pub fn factor(&self) -> u32 {
        match self {
            Periodicity::Daily(n) | Periodicity::Monthly(n) | Periodicity::Yearly(n) => n.get(),
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.factor(), self.kind()) {
            (1, kind) => write!(f, "{kind:?}"),
            (n, PeriodKind::Daily) => write!(f, "Every {n} days"),
            (n, PeriodKind::Monthly) => write!(f, "Every {n} months"),
            (n, PeriodKind::Yearly) => write!(f, "Every {n} years"),
        }
    }
}

/// A recurring movement rule. Occurrences are projected, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generator {
    pub id: GeneratorId,
    pub owner_id: OwnerId,
    pub title: String,
    pub amount: Decimal,
    pub periodicity: Periodicity,
    #[serde(default)]
    pub budget_from: Option<BudgetId>,
    #[serde(default)]
    pub budget_to: Option<BudgetId>,
    #[serde(with = "super::common::date_format")]
    pub date_from: NaiveDate,
    #[serde(default, with = "super::common::option_date_format")]
    pub date_to: Option<NaiveDate>,
}

impl Generator {
    pub fn new(
        owner_id: OwnerId,
        title: impl Into<String>,
        amount: Decimal,
        periodicity: Periodicity,
        date_from: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            amount,
            periodicity,
            budget_from: None,
            budget_to: None,
            date_from,
            date_to: None,
        }
    }

    pub fn with_budget_from(mut self, budget: BudgetId) -> Self {
        self.budget_from = Some(budget);
        self
    }

    pub fn with_budget_to(mut self, budget: BudgetId) -> Self {
        self.budget_to = Some(budget);
        self
    }

    pub fn until(mut self, date_to: NaiveDate) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn touches(&self, budget: BudgetId) -> bool {
        self.budget_from == Some(budget) || self.budget_to == Some(budget)
    }

    /// Signed change each occurrence applies to `budget`, if any.
    pub fn effect_on(&self, budget: BudgetId) -> Option<Decimal> {
        directional_delta(self.amount, self.budget_from, self.budget_to, budget)
    }

    pub fn validate(&self) -> Result<()> {
        match self.date_to {
            Some(date_to) if date_to < self.date_from => {
                Err(ProjectionError::InvalidRecurrenceRule {
                    generator: self.id,
                    reason: format!(
                        "date_to {} is before date_from {}",
                        super::common::format_date(date_to),
                        super::common::format_date(self.date_from)
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Identifiable for Generator {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Generator {
    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }
}

impl NamedEntity for Generator {
    fn title(&self) -> &str {
        &self.title
    }
}
