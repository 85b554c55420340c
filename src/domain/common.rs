use chrono::NaiveDate;
use uuid::Uuid;

/// Calendar format used wherever dates leave the engine (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub type OwnerId = Uuid;
pub type BudgetId = Uuid;
pub type GoalId = Uuid;
pub type TransactionId = Uuid;
pub type GeneratorId = Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Records that belong to exactly one owner.
pub trait Owned {
    fn owner_id(&self) -> OwnerId;

    fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner_id() == owner
    }
}

/// Provides access to a human-friendly entity title.
pub trait NamedEntity {
    fn title(&self) -> &str;
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
}

/// Serde adapter for `NaiveDate` fields stored as `DD-MM-YYYY`.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional `DD-MM-YYYY` dates.
pub mod option_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|value| super::parse_date(&value).map_err(de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_use_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "01-03-2024");
        assert_eq!(parse_date("01-03-2024").unwrap(), date);
    }

    #[test]
    fn iso_dates_are_rejected() {
        assert!(parse_date("2024-03-01").is_err());
    }
}
