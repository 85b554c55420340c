pub mod budget_service;
pub mod goal_service;
pub mod summary;

pub use budget_service::BudgetService;
pub use goal_service::GoalService;
pub use summary::{BudgetSummary, GoalSummary};

use crate::errors::ProjectionError;

pub type ServiceResult<T> = Result<T, ProjectionError>;
