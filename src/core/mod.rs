pub mod dashboard;
pub mod generation;
pub mod layer_selector;
pub mod overlay;
pub mod plot_fetcher;
pub mod stats_fetcher;

#[cfg(test)]
pub(crate) mod testing;

use crate::domain::page::Page;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use crate::domain::model::{
    LayerInfo, LayerSelection, MonthlyStatsRequest, MonthlyStatsResponse, PlotRequest,
    PlotResponse,
};
pub use crate::domain::ports::{ConfigProvider, DashboardApi};
pub use crate::utils::error::Result;

/// The page is shared by every handler; locks are never held across a network call.
pub type SharedPage = Arc<Mutex<Page>>;

/// What became of one handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written to the page / map.
    Applied,
    /// A newer request was issued first; this one was dropped.
    Superseded,
    /// The call failed and a diagnostic was logged.
    Failed,
}
