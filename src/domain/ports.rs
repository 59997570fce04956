use crate::domain::model::{
    LayerInfo, LayerSelection, MonthlyStatsRequest, MonthlyStatsResponse, PlotRequest,
    PlotResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three calls the dashboard makes against its server.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Returns the layers to draw, bottom to top.
    async fn fetch_layers(&self, selection: &LayerSelection) -> Result<Vec<LayerInfo>>;
    async fn fetch_plot(&self, request: &PlotRequest) -> Result<PlotResponse>;
    async fn fetch_monthly_stats(&self, request: &MonthlyStatsRequest) -> Result<MonthlyStatsResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
}
