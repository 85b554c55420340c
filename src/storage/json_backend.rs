use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{
    Budget, BudgetId, Generator, Goal, Identifiable, NamedEntity, OwnerId, Transaction,
};
use crate::errors::ProjectionError;

use super::{MemoryStore, Result};

/// Serialized record set: what an external store hands over for projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub generators: Vec<Generator>,
}

impl StoreSnapshot {
    /// Rejects records that move money through a budget owned by someone else.
    pub fn validate(&self) -> Result<()> {
        let owners: HashMap<BudgetId, OwnerId> =
            self.budgets.iter().map(|b| (b.id, b.owner_id)).collect();
        let check = |label: String, owner: OwnerId, side: Option<BudgetId>| -> Result<()> {
            match side.and_then(|budget| owners.get(&budget).map(|o| (budget, *o))) {
                Some((budget, budget_owner)) if budget_owner != owner => {
                    Err(ProjectionError::Storage(format!(
                        "{label} references budget {budget} owned by another user"
                    )))
                }
                _ => Ok(()),
            }
        };
        for txn in &self.transactions {
            check(describe("transaction", txn), txn.owner_id, txn.budget_from)?;
            check(describe("transaction", txn), txn.owner_id, txn.budget_to)?;
        }
        for generator in &self.generators {
            check(describe("generator", generator), generator.owner_id, generator.budget_from)?;
            check(describe("generator", generator), generator.owner_id, generator.budget_to)?;
        }
        for budget in &self.budgets {
            let Some(goal_id) = budget.goal_id else {
                continue;
            };
            if let Some(goal) = self.goals.iter().find(|goal| goal.id == goal_id) {
                if goal.owner_id != budget.owner_id {
                    return Err(ProjectionError::Storage(format!(
                        "{} references {} owned by another user",
                        describe("budget", budget),
                        describe("goal", goal)
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn into_store(self) -> Result<MemoryStore> {
        self.validate()?;
        for warning in snapshot_warnings(&self) {
            warn!("{warning}");
        }
        Ok(MemoryStore::from_parts(
            self.budgets,
            self.goals,
            self.transactions,
            self.generators,
        ))
    }
}

/// Detects references to budgets or goals that are not part of the snapshot.
pub fn snapshot_warnings(snapshot: &StoreSnapshot) -> Vec<String> {
    let known = |id: &BudgetId| snapshot.budgets.iter().any(|b| b.id == *id);
    let mut warnings = Vec::new();

    for txn in &snapshot.transactions {
        for budget in txn.budget_from.iter().chain(txn.budget_to.iter()) {
            if !known(budget) {
                warnings.push(format!(
                    "{} references unknown budget {}",
                    describe("transaction", txn),
                    budget
                ));
            }
        }
    }
    for generator in &snapshot.generators {
        for budget in generator.budget_from.iter().chain(generator.budget_to.iter()) {
            if !known(budget) {
                warnings.push(format!(
                    "{} references unknown budget {}",
                    describe("generator", generator),
                    budget
                ));
            }
        }
    }
    for budget in &snapshot.budgets {
        if let Some(goal) = budget.goal_id {
            if !snapshot.goals.iter().any(|g| g.id == goal) {
                warnings.push(format!(
                    "{} references missing goal {}",
                    describe("budget", budget),
                    goal
                ));
            }
        }
    }
    warnings
}

fn describe<T: Identifiable + NamedEntity>(kind: &str, record: &T) -> String {
    format!("{kind} `{}` ({})", record.title(), record.id())
}

pub fn load_snapshot_from_str(data: &str) -> Result<MemoryStore> {
    let snapshot: StoreSnapshot = serde_json::from_str(data)?;
    snapshot.into_store()
}

pub fn load_snapshot_from_path(path: &Path) -> Result<MemoryStore> {
    let data = fs::read_to_string(path)?;
    let store = load_snapshot_from_str(&data)?;
    info!(path = %path.display(), records = store.len(), "loaded store snapshot");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DataStore;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    const OWNER: &str = "6f1b7a52-0e55-4a4e-9e0b-2f7f3f0b8a11";
    const BUDGET: &str = "0b6f0c1e-6b43-4c1d-8f5e-3f9d1a1f2c22";

    fn snapshot_json() -> String {
        format!(
            r#"{{
  "budgets": [
    {{"id": "{BUDGET}", "owner_id": "{OWNER}", "title": "Savings"}}
  ],
  "transactions": [
    {{
      "id": "1c7d2f0a-5a3b-4b0e-9d6f-7a8b9c0d1e33",
      "owner_id": "{OWNER}",
      "title": "Deposit",
      "date": "05-01-2024",
      "amount": "120.50",
      "budget_to": "{BUDGET}"
    }}
  ],
  "generators": [
    {{
      "id": "2d8e3f1b-6b4c-4c1f-8e7a-8b9c0d1e2f44",
      "owner_id": "{OWNER}",
      "title": "Standing order",
      "amount": "50",
      "periodicity": {{"kind": "Monthly", "factor": 1}},
      "budget_to": "{BUDGET}",
      "date_from": "01-01-2024",
      "date_to": null
    }}
  ]
}}"#
        )
    }

    #[test]
    fn loads_snapshot_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(snapshot_json().as_bytes()).unwrap();

        let store = load_snapshot_from_path(file.path()).unwrap();
        let owner = Uuid::parse_str(OWNER).unwrap();
        let budget = Uuid::parse_str(BUDGET).unwrap();

        assert_eq!(store.budget(owner, budget).unwrap().title, "Savings");
        assert_eq!(store.generators(owner, Some(budget)).unwrap().len(), 1);
        assert!(store.goals(owner).unwrap().is_empty());
    }

    #[test]
    fn rejects_cross_owner_references() {
        let stranger = Uuid::new_v4();
        let raw = snapshot_json().replacen(
            &format!(r#""owner_id": "{OWNER}",
      "title": "Deposit""#),
            &format!(r#""owner_id": "{stranger}",
      "title": "Deposit""#),
            1,
        );
        let err = load_snapshot_from_str(&raw).unwrap_err();
        assert!(matches!(err, ProjectionError::Storage(ref msg) if msg.contains("another user")));
    }

    #[test]
    fn reports_dangling_references() {
        let owner = Uuid::new_v4();
        let snapshot = StoreSnapshot {
            budgets: vec![Budget::new(owner, "Orphan").with_goal(Uuid::new_v4())],
            ..StoreSnapshot::default()
        };
        let warnings = snapshot_warnings(&snapshot);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("budget `Orphan`"));
        assert!(warnings[0].contains("missing goal"));
    }

    #[test]
    fn warnings_name_the_offending_record() {
        let owner = Uuid::new_v4();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let txn = Transaction::new(owner, "Gym", start, rust_decimal::Decimal::TEN)
            .with_budget_from(Uuid::new_v4());
        let txn_id = txn.id;
        let snapshot = StoreSnapshot {
            transactions: vec![txn],
            ..StoreSnapshot::default()
        };

        let warnings = snapshot_warnings(&snapshot);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with(&format!("transaction `Gym` ({txn_id})")));
    }

    #[test]
    fn malformed_json_is_a_storage_error() {
        let err = load_snapshot_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ProjectionError::Storage(_)));
    }
}
