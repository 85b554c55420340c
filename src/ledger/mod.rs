//! Balance projection primitives: recurrence expansion, change collection, and the
//! running-balance projector.

pub mod changes;
pub mod projector;
pub mod recurring;
pub mod series;
pub mod time_interval;

pub use changes::{collect, BalanceEvent};
pub use projector::project;
pub use recurring::{expand, expand_limited, net_before, Occurrences, Recurrence};
pub use series::BalanceSeries;
