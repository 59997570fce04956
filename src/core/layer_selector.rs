use crate::core::generation::RequestGeneration;
use crate::core::overlay::{Overlay, OverlayManager};
use crate::core::{Outcome, SharedPage};
use crate::domain::model::LayerSelection;
use crate::domain::ports::DashboardApi;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Turns the ticked boxes of `#layer-checklist` into map overlays.
///
/// Updates are single-flight: the overlay lock is held for the whole round trip, so
/// overlapping toggles queue up in order instead of interleaving. A queued update that
/// has been overtaken by a newer toggle before its turn is dropped without calling the
/// server, and a response overtaken while in flight is discarded.
pub struct LayerSelector {
    api: Arc<dyn DashboardApi>,
    page: SharedPage,
    overlays: Mutex<OverlayManager>,
    generation: RequestGeneration,
}

impl LayerSelector {
    pub fn new(api: Arc<dyn DashboardApi>, page: SharedPage) -> Self {
        Self {
            api,
            page,
            overlays: Mutex::new(OverlayManager::new()),
            generation: RequestGeneration::new(),
        }
    }

    pub async fn refresh(&self) -> Outcome {
        let ticket = self.generation.issue();

        let selection: LayerSelection = {
            let page = self.page.lock().await;
            page.layer_checklist.checked_values().collect()
        };

        let mut overlays = self.overlays.lock().await;
        if !self.generation.is_current(ticket) {
            tracing::debug!("Skipping layer update #{}; #{} is queued", ticket, self.generation.latest());
            return Outcome::Superseded;
        }

        tracing::info!(
            "🗺️ Requesting {} layer(s): {:?} (#{})",
            selection.len(),
            selection.iter().collect::<Vec<_>>(),
            ticket
        );

        let result = self.api.fetch_layers(&selection).await;
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding layer response #{}; #{} is newer", ticket, self.generation.latest());
            return Outcome::Superseded;
        }

        match result {
            Ok(layers) => {
                overlays.replace_all(layers);
                tracing::info!("Map now shows {:?}", overlays.names());
                Outcome::Applied
            }
            Err(e) => {
                self.page
                    .lock()
                    .await
                    .log_diagnostic("layers", format!("Error fetching layers: {}", e));
                Outcome::Failed
            }
        }
    }

    /// Current overlays, bottom to top.
    pub async fn overlays(&self) -> Vec<Overlay> {
        self.overlays.lock().await.overlays().to_vec()
    }

    #[cfg(test)]
    pub(crate) fn latest_ticket(&self) -> u64 {
        self.generation.latest()
    }
}
