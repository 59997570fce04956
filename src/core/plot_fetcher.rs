use crate::core::generation::RequestGeneration;
use crate::core::{Outcome, SharedPage};
use crate::domain::model::PlotRequest;
use crate::domain::ports::DashboardApi;
use std::sync::Arc;

pub const LOADING_ALT: &str = "Loading plot...";
pub const ERROR_ALT: &str = "Error loading plot";

pub fn plot_alt(request: &PlotRequest) -> String {
    format!("{} plot for {}", request.dataset, request.district)
}

/// Fetches the time-series plot for the selected district and dataset into `#risk-plot`.
pub struct PlotFetcher {
    api: Arc<dyn DashboardApi>,
    page: SharedPage,
    generation: RequestGeneration,
}

impl PlotFetcher {
    pub fn new(api: Arc<dyn DashboardApi>, page: SharedPage) -> Self {
        Self {
            api,
            page,
            generation: RequestGeneration::new(),
        }
    }

    pub async fn refresh(&self) -> Outcome {
        let ticket = self.generation.issue();

        let request = {
            let mut page = self.page.lock().await;
            page.plot.alt = LOADING_ALT.to_string();
            PlotRequest {
                district: page.district.value().to_string(),
                dataset: page.dataset.value().to_string(),
            }
        };

        tracing::info!(
            "📈 Requesting {} plot for {} (#{})",
            request.dataset,
            request.district,
            ticket
        );
        let result = self.api.fetch_plot(&request).await;

        let mut page = self.page.lock().await;
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding plot response #{}; #{} is newer", ticket, self.generation.latest());
            return Outcome::Superseded;
        }

        match result {
            Ok(response) => {
                page.plot.src = Some(response.image);
                page.plot.alt = plot_alt(&request);
                Outcome::Applied
            }
            Err(e) => {
                // 保留舊圖，只更新替代文字
                page.plot.alt = ERROR_ALT.to_string();
                page.log_diagnostic("plot", format!("Error fetching plot: {}", e));
                Outcome::Failed
            }
        }
    }
}
