use crate::domain::model::{
    LayerInfo, LayerSelection, LayersRequest, LayersResponse, MonthlyStatsRequest,
    MonthlyStatsResponse, PlotRequest, PlotResponse,
};
use crate::domain::ports::{ConfigProvider, DashboardApi};
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

const LAYERS_PATH: &str = "api/layers";
const PLOT_PATH: &str = "api/plot";
const INFO_PATH: &str = "api/info";

/// `DashboardApi` over HTTP+JSON. No timeout and no retry: a call either completes or fails.
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: Client,
    base_url: Url,
}

impl HttpDashboardApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // 確保 join 時保留既有路徑前綴
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("{} responded with {}", path, status);

        if !status.is_success() {
            return Err(DashError::HttpStatusError {
                endpoint: format!("/{}", path),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| DashError::MalformedResponseError {
            endpoint: format!("/{}", path),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_layers(&self, selection: &LayerSelection) -> Result<Vec<LayerInfo>> {
        let url = self.endpoint(LAYERS_PATH)?;
        let body = LayersRequest::from(selection);
        tracing::debug!("POST {} with layers {:?}", url, body.layers);

        let response = self.client.post(url).json(&body).send().await?;
        let decoded: LayersResponse = Self::decode(LAYERS_PATH, response).await?;
        Ok(decoded.layers)
    }

    async fn fetch_plot(&self, request: &PlotRequest) -> Result<PlotResponse> {
        let url = self.endpoint(PLOT_PATH)?;
        tracing::debug!(
            "GET {} for district={} dataset={}",
            url,
            request.district,
            request.dataset
        );

        let response = self.client.get(url).query(request).send().await?;
        Self::decode(PLOT_PATH, response).await
    }

    async fn fetch_monthly_stats(&self, request: &MonthlyStatsRequest) -> Result<MonthlyStatsResponse> {
        let url = self.endpoint(INFO_PATH)?;
        tracing::debug!("GET {} for info_district={}", url, request.district);

        let response = self.client.get(url).query(request).send().await?;
        Self::decode(INFO_PATH, response).await
    }
}
