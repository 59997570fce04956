use crate::core::generation::RequestGeneration;
use crate::core::{Outcome, SharedPage};
use crate::domain::model::{FormattedStats, MonthlyStatsRequest};
use crate::domain::page::{ids, Page};
use crate::domain::ports::DashboardApi;
use crate::utils::error::Result;
use std::sync::Arc;

/// Fills the four monthly-statistics slots for the district picked in `#district-dropdown-info`.
/// Failures only reach the console; the slots keep whatever they showed before.
pub struct StatsFetcher {
    api: Arc<dyn DashboardApi>,
    page: SharedPage,
    generation: RequestGeneration,
}

impl StatsFetcher {
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
            let page = self.page.lock().await;
            MonthlyStatsRequest {
                district: page.district_info.value().to_string(),
            }
        };

        tracing::info!("📊 Requesting monthly stats for {} (#{})", request.district, ticket);
        let result = self.api.fetch_monthly_stats(&request).await;

        let mut page = self.page.lock().await;
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding stats response #{}; #{} is newer", ticket, self.generation.latest());
            return Outcome::Superseded;
        }

        let applied = result.and_then(|stats| write_slots(&mut page, stats.formatted()));
        match applied {
            Ok(()) => Outcome::Applied,
            Err(e) => {
                page.log_diagnostic("stats", format!("Error fetching info: {}", e));
                Outcome::Failed
            }
        }
    }
}

// 四個欄位一起寫入，不會只更新一半
fn write_slots(page: &mut Page, stats: FormattedStats) -> Result<()> {
    page.set_texts([
        (ids::CHIRPS, stats.chirps),
        (ids::TEMP, stats.temp),
        (ids::SOIL_MOIST, stats.soil_moist),
        (ids::NDVI, stats.ndvi),
    ])
}
