pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::DashboardConfig;

pub use adapters::HttpDashboardApi;
pub use crate::core::dashboard::{Dashboard, LoadReport, PageEvent};
pub use crate::core::Outcome;
pub use utils::error::{DashError, Result};
