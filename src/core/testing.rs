//! Scripted `DashboardApi` for handler tests.

use crate::domain::model::{
    LayerInfo, LayerSelection, MonthlyStatsRequest, MonthlyStatsResponse, PlotRequest,
    PlotResponse,
};
use crate::domain::page::{ids, Checklist, Dropdown, Page};
use crate::domain::ports::DashboardApi;
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub(crate) struct Step<T> {
    gate: Option<Arc<Notify>>,
    result: std::result::Result<T, u16>,
}

impl<T> Step<T> {
    pub(crate) fn ok(value: T) -> Self {
        Self {
            gate: None,
            result: Ok(value),
        }
    }

    pub(crate) fn fail(status: u16) -> Self {
        Self {
            gate: None,
            result: Err(status),
        }
    }

    /// Holds the response back until `gate` is notified.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    layers: Mutex<VecDeque<Step<Vec<LayerInfo>>>>,
    plots: Mutex<VecDeque<Step<PlotResponse>>>,
    stats: Mutex<VecDeque<Step<MonthlyStatsResponse>>>,
    layer_calls: AtomicUsize,
    plot_calls: AtomicUsize,
    stats_calls: AtomicUsize,
    pub(crate) layer_requests: Mutex<Vec<LayerSelection>>,
    pub(crate) plot_requests: Mutex<Vec<PlotRequest>>,
    pub(crate) stats_requests: Mutex<Vec<MonthlyStatsRequest>>,
    pub(crate) call_log: Mutex<Vec<&'static str>>,
}

impl ScriptedApi {
    pub(crate) fn push_layers(&self, step: Step<Vec<LayerInfo>>) {
        self.layers.lock().unwrap().push_back(step);
    }

    pub(crate) fn push_plot(&self, step: Step<PlotResponse>) {
        self.plots.lock().unwrap().push_back(step);
    }

    pub(crate) fn push_stats(&self, step: Step<MonthlyStatsResponse>) {
        self.stats.lock().unwrap().push_back(step);
    }

    pub(crate) fn layer_calls(&self) -> usize {
        self.layer_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn plot_calls(&self) -> usize {
        self.plot_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    async fn play<T>(endpoint: &'static str, queue: &Mutex<VecDeque<Step<T>>>) -> Result<T> {
        let step = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call to {}", endpoint));
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        step.result.map_err(|status| DashError::HttpStatusError {
            endpoint: endpoint.to_string(),
            status,
        })
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn fetch_layers(&self, selection: &LayerSelection) -> Result<Vec<LayerInfo>> {
        self.layer_calls.fetch_add(1, Ordering::SeqCst);
        self.layer_requests.lock().unwrap().push(selection.clone());
        self.call_log.lock().unwrap().push("layers");
        Self::play("/api/layers", &self.layers).await
    }

    async fn fetch_plot(&self, request: &PlotRequest) -> Result<PlotResponse> {
        self.plot_calls.fetch_add(1, Ordering::SeqCst);
        self.plot_requests.lock().unwrap().push(request.clone());
        self.call_log.lock().unwrap().push("plot");
        Self::play("/api/plot", &self.plots).await
    }

    async fn fetch_monthly_stats(&self, request: &MonthlyStatsRequest) -> Result<MonthlyStatsResponse> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats_requests.lock().unwrap().push(request.clone());
        self.call_log.lock().unwrap().push("stats");
        Self::play("/api/info", &self.stats).await
    }
}

pub(crate) fn layer(name: &str) -> LayerInfo {
    LayerInfo {
        name: name.to_string(),
        url: format!("https://tiles.example.com/{}/{{z}}/{{x}}/{{y}}", name),
    }
}

pub(crate) fn plot(tag: &str) -> PlotResponse {
    PlotResponse {
        image: format!("data:image/png;base64,{}", tag),
    }
}

pub(crate) fn sample_page() -> Page {
    let districts: Vec<String> = ["Gasabo", "Huye", "Kigali", "Musanze"]
        .into_iter()
        .map(String::from)
        .collect();
    let datasets: Vec<String> = ["chirps", "era5_temp", "soil_moist", "ndvi"]
        .into_iter()
        .map(String::from)
        .collect();

    Page::new(
        Checklist::new([
            ("landslide", false),
            ("drought", false),
            ("flood", false),
            ("districts", true),
        ]),
        Dropdown::new(ids::DISTRICT_DROPDOWN, districts.clone(), None).unwrap(),
        Dropdown::new(ids::DATASET_DROPDOWN, datasets, None).unwrap(),
        Dropdown::new(ids::DISTRICT_DROPDOWN_INFO, districts, None).unwrap(),
    )
}

/// Yields until `done` holds; the handler under test runs on the same thread.
pub(crate) async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
