pub mod dashboard;
pub mod service;
pub mod update;

pub use dashboard::{reduce, DashboardAction, DashboardState};
pub use update::UpdateResult;
