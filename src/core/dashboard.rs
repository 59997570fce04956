use crate::core::layer_selector::LayerSelector;
use crate::core::overlay::Overlay;
use crate::core::plot_fetcher::PlotFetcher;
use crate::core::stats_fetcher::StatsFetcher;
use crate::core::{Outcome, SharedPage};
use crate::domain::page::{ids, Page};
use crate::domain::ports::DashboardApi;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A user interaction on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    LayerToggled { layer: String, checked: bool },
    DistrictChanged(String),
    DatasetChanged(String),
    InfoDistrictChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub layers: Outcome,
    pub plot: Outcome,
    pub stats: Outcome,
}

/// Wires the page to its three handlers. Cloning is cheap and every clone drives the
/// same page and map.
#[derive(Clone)]
pub struct Dashboard {
    page: SharedPage,
    layers: Arc<LayerSelector>,
    plot: Arc<PlotFetcher>,
    stats: Arc<StatsFetcher>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, page: Page) -> Self {
        let page: SharedPage = Arc::new(Mutex::new(page));
        Self {
            layers: Arc::new(LayerSelector::new(api.clone(), page.clone())),
            plot: Arc::new(PlotFetcher::new(api.clone(), page.clone())),
            stats: Arc::new(StatsFetcher::new(api, page.clone())),
            page,
        }
    }

    /// What the page does once on load: layers, then the plot, then the stats.
    pub async fn initial_load(&self) -> LoadReport {
        tracing::info!("🚀 Loading dashboard");
        let layers = self.layers.refresh().await;
        let plot = self.plot.refresh().await;
        let stats = self.stats.refresh().await;
        LoadReport {
            layers,
            plot,
            stats,
        }
    }

    /// Applies `event` to the page and runs the handler it triggers. An event naming a
    /// control or option the page does not have is rejected before any request is made.
    pub async fn dispatch(&self, event: PageEvent) -> Result<Outcome> {
        tracing::debug!("Page event: {:?}", event);
        {
            let mut page = self.page.lock().await;
            match &event {
                PageEvent::LayerToggled { layer, checked } => {
                    page.layer_checklist.set_checked(layer, *checked)?
                }
                PageEvent::DistrictChanged(value) => {
                    page.dropdown_mut(ids::DISTRICT_DROPDOWN)?.select(value)?
                }
                PageEvent::DatasetChanged(value) => {
                    page.dropdown_mut(ids::DATASET_DROPDOWN)?.select(value)?
                }
                PageEvent::InfoDistrictChanged(value) => {
                    page.dropdown_mut(ids::DISTRICT_DROPDOWN_INFO)?.select(value)?
                }
            }
        }

        let outcome = match event {
            PageEvent::LayerToggled { .. } => self.refresh_layers().await,
            PageEvent::DistrictChanged(_) | PageEvent::DatasetChanged(_) => {
                self.refresh_plot().await
            }
            PageEvent::InfoDistrictChanged(_) => self.refresh_stats().await,
        };
        Ok(outcome)
    }

    /// Points dropdown `id` at `value` without running a handler. Unlike [`dispatch`],
    /// a value the page does not list is added as an option and sent to the server as is.
    ///
    /// [`dispatch`]: Dashboard::dispatch
    pub async fn override_selection(&self, id: &str, value: &str) -> Result<()> {
        let mut page = self.page.lock().await;
        if page.dropdown_mut(id)?.select_or_insert(value) {
            tracing::info!("'{}' is not listed in {}; sending it as given", value, id);
        }
        Ok(())
    }

    pub async fn refresh_layers(&self) -> Outcome {
        self.layers.refresh().await
    }

    pub async fn refresh_plot(&self) -> Outcome {
        self.plot.refresh().await
    }

    pub async fn refresh_stats(&self) -> Outcome {
        self.stats.refresh().await
    }

    pub async fn overlays(&self) -> Vec<Overlay> {
        self.layers.overlays().await
    }

    pub async fn page(&self) -> Page {
        self.page.lock().await.clone()
    }

    /// Runs `f` with mutable access to the page, without triggering any handler.
    pub async fn with_page<T>(&self, f: impl FnOnce(&mut Page) -> T) -> T {
        let mut page = self.page.lock().await;
        f(&mut page)
    }
}
