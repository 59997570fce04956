use clap::Parser;
use rwanda_climate_dash::config::{Command, DashboardConfig};
use rwanda_climate_dash::domain::model::{DataUri, Dataset, RiskLayer};
use rwanda_climate_dash::domain::page::{ids, Page};
use rwanda_climate_dash::utils::error::{DashError, ErrorSeverity};
use rwanda_climate_dash::utils::logger;
use rwanda_climate_dash::{CliConfig, Dashboard, HttpDashboardApi, Outcome};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            // logger 還沒初始化，直接輸出
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::info!("Starting climate-dash against {}", config.api.base_url);
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

fn exit_code(e: &DashError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(command: &Command, config: &DashboardConfig) -> Result<(), DashError> {
    let api = Arc::new(HttpDashboardApi::from_config(config)?);
    let dashboard = Dashboard::new(api, config.build_page()?);

    let outcome = match command {
        Command::Load => {
            let report = dashboard.initial_load().await;
            print_overlays(&dashboard).await;
            let page = dashboard.page().await;
            print_plot(&page);
            print_stats(&page);
            [report.layers, report.plot, report.stats]
                .into_iter()
                .find(|o| *o == Outcome::Failed)
                .unwrap_or(Outcome::Applied)
        }
        Command::Layers { layers } => {
            if !layers.is_empty() {
                dashboard
                    .with_page(|page| -> Result<(), DashError> {
                        let all: Vec<String> = page
                            .layer_checklist
                            .boxes()
                            .iter()
                            .map(|b| b.value.clone())
                            .collect();
                        for name in &all {
                            page.layer_checklist.set_checked(name, false)?;
                        }
                        for name in layers {
                            page.layer_checklist.set_checked(name, true)?;
                        }
                        Ok(())
                    })
                    .await?;
            }
            let outcome = dashboard.refresh_layers().await;
            print_overlays(&dashboard).await;
            outcome
        }
        Command::Plot {
            district,
            dataset,
            output,
        } => {
            select(&dashboard, ids::DISTRICT_DROPDOWN, district.as_deref()).await?;
            select(&dashboard, ids::DATASET_DROPDOWN, dataset.as_deref()).await?;
            let outcome = dashboard.refresh_plot().await;
            let page = dashboard.page().await;
            print_plot(&page);
            if let (Outcome::Applied, Some(path), Some(src)) = (outcome, output, &page.plot.src) {
                save_image(src, path).await?;
            }
            outcome
        }
        Command::Stats { district } => {
            select(&dashboard, ids::DISTRICT_DROPDOWN_INFO, district.as_deref()).await?;
            let outcome = dashboard.refresh_stats().await;
            print_stats(&dashboard.page().await);
            outcome
        }
    };

    if outcome == Outcome::Failed {
        let page = dashboard.page().await;
        let message = page
            .console()
            .last()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "request failed".to_string());
        return Err(DashError::RequestFailedError { message });
    }

    println!("✅ Done");
    Ok(())
}

async fn select(dashboard: &Dashboard, id: &str, value: Option<&str>) -> Result<(), DashError> {
    match value {
        Some(value) => dashboard.override_selection(id, value).await,
        None => Ok(()),
    }
}

async fn print_overlays(dashboard: &Dashboard) {
    let overlays = dashboard.overlays().await;
    println!("🗺️  Overlays (bottom to top): {}", overlays.len());
    for overlay in overlays {
        let label = match RiskLayer::from_name(&overlay.name) {
            Some(layer) => layer.label(),
            None => overlay.name.as_str(),
        };
        println!("   {:<20} opacity {:.1}  {}", label, overlay.opacity, overlay.url);
    }
}

fn print_plot(page: &Page) {
    println!("📈 Plot: {}", page.plot.alt);
}

fn print_stats(page: &Page) {
    println!("📊 Monthly stats for {}", page.district_info.value());
    for (dataset, id) in Dataset::ALL.into_iter().zip(ids::TEXT_SLOTS) {
        println!("   {:<14} {}", dataset.title(), page.text(id).unwrap_or(""));
    }
}

async fn save_image(src: &str, path: &Path) -> Result<(), DashError> {
    let image = DataUri::parse(src)?;
    tokio::fs::write(path, &image.data).await?;
    tracing::info!(
        "💾 Saved {} ({} bytes) to {}",
        image.mime_type,
        image.data.len(),
        path.display()
    );
    println!("💾 Saved plot to {}", path.display());
    Ok(())
}
