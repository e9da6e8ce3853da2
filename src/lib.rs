pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use adapters::{build_planner, storage::LocalStorage};
pub use app::{BatchRunner, PlanExporter};
pub use config::AppConfig;
pub use core::planner::SemPlanner;
pub use domain::model::{BudgetAllocation, SemInputs, SemPlan};
pub use utils::error::{PlanError, Result};
