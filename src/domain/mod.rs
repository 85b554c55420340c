pub mod budget;
pub mod common;
pub mod generator;
pub mod goal;
pub mod transaction;
pub mod window;

pub use budget::Budget;
pub use common::{
    BudgetId, GeneratorId, GoalId, Identifiable, NamedEntity, Owned, OwnerId, TransactionId,
    DATE_FORMAT,
};
pub use generator::{Generator, PeriodKind, Periodicity};
pub use goal::Goal;
pub use transaction::Transaction;
pub use window::Window;
