use anyhow::Result;
use httpmock::prelude::*;
use rwanda_climate_dash::core::overlay::OVERLAY_OPACITY;
use rwanda_climate_dash::domain::page::ids;
use rwanda_climate_dash::{Dashboard, DashboardConfig, HttpDashboardApi, Outcome, PageEvent};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

fn dashboard_for(server: &MockServer, page_toml: &str) -> Result<Dashboard> {
    let config = DashboardConfig::from_toml_str(&format!(
        "[api]\nbase_url = \"{}\"\n\n{}",
        server.base_url(),
        page_toml
    ))?;
    let api = Arc::new(HttpDashboardApi::from_config(&config)?);
    Ok(Dashboard::new(api, config.build_page()?))
}

const PAGE: &str = r#"
[page]
districts = ["Gasabo", "Huye", "Kigali"]
default_district = "Kigali"
checked_layers = ["districts"]
"#;

/// 頁面載入：圖層 → 圖表 → 統計
#[tokio::test]
async fn test_initial_load_against_http_server() -> Result<()> {
    let server = MockServer::start();

    let layers_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/layers")
            .json_body(serde_json::json!({"layers": ["districts"]}));
        then.status(200).json_body(serde_json::json!({
            "layers": [{"name": "districts", "url": "https://earthengine.example.com/map/districts/{z}/{x}/{y}"}]
        }));
    });
    let plot_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/plot")
            .query_param("district", "Kigali")
            .query_param("dataset", "chirps");
        then.status(200).json_body(serde_json::json!({"image": PNG_URI}));
    });
    let info_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/info")
            .query_param("info_district", "Kigali");
        then.status(200).json_body(serde_json::json!({
            "chirps": 12.3, "era5_temp": 24.1, "soil_moist": 18.0, "ndvi": 0.42
        }));
    });

    let dashboard = dashboard_for(&server, PAGE)?;
    let report = dashboard.initial_load().await;

    layers_mock.assert();
    plot_mock.assert();
    info_mock.assert();
    assert_eq!(report.layers, Outcome::Applied);
    assert_eq!(report.plot, Outcome::Applied);
    assert_eq!(report.stats, Outcome::Applied);

    let overlays = dashboard.overlays().await;
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].name, "districts");
    assert_eq!(overlays[0].opacity, OVERLAY_OPACITY);

    let page = dashboard.page().await;
    assert_eq!(page.plot.src.as_deref(), Some(PNG_URI));
    assert_eq!(page.plot.alt, "chirps plot for Kigali");
    assert_eq!(page.text(ids::CHIRPS), Some("12.3 mm"));
    assert_eq!(page.text(ids::TEMP), Some("24.1 °C"));
    assert_eq!(page.text(ids::SOIL_MOIST), Some("18 %"));
    assert_eq!(page.text(ids::NDVI), Some("0.42"));
    assert!(page.console().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_plot_server_error_keeps_previous_image() -> Result<()> {
    let server = MockServer::start();

    let ok_mock = server.mock(|when, then| {
        when.method(GET).path("/api/plot").query_param("dataset", "chirps");
        then.status(200).json_body(serde_json::json!({"image": PNG_URI}));
    });
    let failing_mock = server.mock(|when, then| {
        when.method(GET).path("/api/plot").query_param("dataset", "ndvi");
        then.status(500).body("Internal Server Error");
    });

    let dashboard = dashboard_for(&server, PAGE)?;
    assert_eq!(dashboard.refresh_plot().await, Outcome::Applied);

    let outcome = dashboard
        .dispatch(PageEvent::DatasetChanged("ndvi".to_string()))
        .await?;

    ok_mock.assert();
    failing_mock.assert();
    assert_eq!(outcome, Outcome::Failed);

    let page = dashboard.page().await;
    assert_eq!(page.plot.alt, "Error loading plot");
    assert_eq!(page.plot.src.as_deref(), Some(PNG_URI));
    assert_eq!(page.console().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_malformed_stats_leave_slots_untouched() -> Result<()> {
    let server = MockServer::start();

    let info_mock = server.mock(|when, then| {
        when.method(GET).path("/api/info");
        then.status(200).json_body(serde_json::json!({"chirps": "n/a"}));
    });

    let dashboard = dashboard_for(&server, PAGE)?;
    dashboard
        .with_page(|page| page.set_text(ids::CHIRPS, "3.1 mm"))
        .await?;

    let outcome = dashboard
        .dispatch(PageEvent::InfoDistrictChanged("Huye".to_string()))
        .await?;

    info_mock.assert();
    assert_eq!(outcome, Outcome::Failed);
    let page = dashboard.page().await;
    assert_eq!(page.text(ids::CHIRPS), Some("3.1 mm"));
    assert_eq!(page.console()[0].source, "stats");

    Ok(())
}

#[tokio::test]
async fn test_layer_toggle_replaces_overlays() -> Result<()> {
    let server = MockServer::start();

    let first_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/layers")
            .json_body(serde_json::json!({"layers": ["districts"]}));
        then.status(200).json_body(serde_json::json!({
            "layers": [{"name": "districts", "url": "https://tiles.example.com/districts/{z}/{x}/{y}"}]
        }));
    });
    let second_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/layers")
            .json_body(serde_json::json!({"layers": ["districts", "drought", "flood"]}));
        then.status(200).json_body(serde_json::json!({
            "layers": [
                {"name": "drought", "url": "https://tiles.example.com/drought/{z}/{x}/{y}"},
                {"name": "flood", "url": "https://tiles.example.com/flood/{z}/{x}/{y}"},
                {"name": "districts", "url": "https://tiles.example.com/districts/{z}/{x}/{y}"}
            ]
        }));
    });
    let third_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/layers")
            .json_body(serde_json::json!({"layers": ["drought", "flood"]}));
        then.status(200).json_body(serde_json::json!({
            "layers": [
                {"name": "drought", "url": "https://tiles.example.com/drought/{z}/{x}/{y}"},
                {"name": "flood", "url": "https://tiles.example.com/flood/{z}/{x}/{y}"}
            ]
        }));
    });

    let dashboard = dashboard_for(&server, PAGE)?;
    dashboard.refresh_layers().await;

    // 勾選的同時不觸發請求
    dashboard
        .with_page(|page| page.layer_checklist.set_checked("flood", true))
        .await?;
    dashboard
        .dispatch(PageEvent::LayerToggled {
            layer: "drought".to_string(),
            checked: true,
        })
        .await?;

    let names: Vec<String> = dashboard.overlays().await.into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["drought", "flood", "districts"]);

    dashboard
        .dispatch(PageEvent::LayerToggled {
            layer: "districts".to_string(),
            checked: false,
        })
        .await?;

    first_mock.assert();
    second_mock.assert();
    third_mock.assert();
    let names: Vec<String> = dashboard.overlays().await.into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["drought", "flood"]);

    Ok(())
}

#[tokio::test]
async fn test_layers_unreachable_server_logs_diagnostic() -> Result<()> {
    // 沒有任何服務監聽的埠
    let config = DashboardConfig::from_toml_str("[api]\nbase_url = \"http://127.0.0.1:9\"\n")?;
    let api = Arc::new(HttpDashboardApi::from_config(&config)?);
    let dashboard = Dashboard::new(api, config.build_page()?);

    assert_eq!(dashboard.refresh_layers().await, Outcome::Failed);
    assert!(dashboard.overlays().await.is_empty());

    let page = dashboard.page().await;
    assert_eq!(page.console().len(), 1);
    assert_eq!(page.console()[0].source, "layers");

    Ok(())
}

#[tokio::test]
async fn test_page_from_config_file() -> Result<()> {
    let server = MockServer::start();
    let plot_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/plot")
            .query_param("district", "Huye")
            .query_param("dataset", "era5_temp");
        then.status(200).json_body(serde_json::json!({"image": PNG_URI}));
    });

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "[api]\nbase_url = \"{}\"\n\n[page]\ndistricts = [\"Gasabo\", \"Huye\"]\ndefault_district = \"Huye\"\ndefault_dataset = \"era5_temp\"\n",
        server.base_url()
    )?;

    let config = DashboardConfig::from_file(file.path())?;
    let api = Arc::new(HttpDashboardApi::from_config(&config)?);
    let dashboard = Dashboard::new(api, config.build_page()?);

    assert_eq!(dashboard.refresh_plot().await, Outcome::Applied);
    plot_mock.assert();
    assert_eq!(dashboard.page().await.plot.alt, "era5_temp plot for Huye");

    Ok(())
}

/// 預設設定沒有列出 Kigali，命令列參數仍照原樣送出
#[tokio::test]
async fn test_default_config_sends_unlisted_district() -> Result<()> {
    let server = MockServer::start();
    let plot_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/plot")
            .query_param("district", "Kigali")
            .query_param("dataset", "chirps");
        then.status(200).json_body(serde_json::json!({"image": PNG_URI}));
    });

    let mut config = DashboardConfig::default();
    config.api.base_url = server.base_url();
    let api = Arc::new(HttpDashboardApi::from_config(&config)?);
    let dashboard = Dashboard::new(api, config.build_page()?);

    dashboard
        .override_selection(ids::DISTRICT_DROPDOWN, "Kigali")
        .await?;
    assert_eq!(dashboard.refresh_plot().await, Outcome::Applied);

    plot_mock.assert();
    assert_eq!(dashboard.page().await.plot.alt, "chirps plot for Kigali");

    Ok(())
}
