#![doc(test(attr(deny(warnings))))]

//! Balance Core projects the day-by-day balance of budgets and goals from dated
//! transactions and recurring generators held by an external data store.

pub mod config;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use config::{Config, ConfigManager};
pub use errors::{ProjectionError, RecordKind, Result};
pub use ledger::BalanceSeries;
pub use services::{BudgetService, BudgetSummary, GoalService, GoalSummary, ServiceResult};
pub use storage::{DataStore, MemoryStore, TransactionFilter};

static INIT_TRACING: Once = Once::new();

/// Build metadata exported by `build.rs`.
pub const BUILD_HASH: &str = env!("BALANCE_CORE_BUILD_HASH");
pub const BUILD_TIMESTAMP: &str = env!("BALANCE_CORE_BUILD_TIMESTAMP");
pub const BUILD_PROFILE: &str = env!("BALANCE_CORE_BUILD_PROFILE");

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with(&Config::default());
}

/// Same as [`init`], using the log filter from `config`.
///
/// Only the first call to `init` or `init_with` installs the subscriber. Any later
/// call is ignored, even one with a different `config`, so pick the filter before
/// the first initialization.
pub fn init_with(config: &Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(&config.log_filter);
        tracing::info!(
            build = BUILD_HASH,
            built_at = BUILD_TIMESTAMP,
            profile = BUILD_PROFILE,
            "Balance Core tracing initialized."
        );
    });
}
