//! Wiring & DI. Entry point: bootstrap adapters, inject into the session,
//! run the UI loop. No business logic here.

use std::path::PathBuf;
use std::sync::Arc;

use dotenv::dotenv;
use roomlens::adapters::ai::{MockVisionAdapter, OpenAiVisionAdapter};
use roomlens::adapters::image_source::FsImageSource;
use roomlens::adapters::ui::TuiInputPort;
use roomlens::ports::{ImageSourcePort, InputPort, VisionPort};
use roomlens::shared::AppConfig;
use roomlens::usecases::{ReportService, SessionService};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    roomlens::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    let library_dir = PathBuf::from(cfg.library_dir_or_default());
    info!(path = %library_dir.display(), "photo library directory");
    let source: Arc<dyn ImageSourcePort> = Arc::new(FsImageSource::new(
        library_dir,
        cfg.capture_cmd.clone(),
        cfg.jpeg_quality_or_default(),
    ));

    // The credential is injected here, never read ambiently at request time,
    // so the configuration-error path stays deterministic.
    let vision: Arc<dyn VisionPort> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "vision analysis enabled with OpenAI adapter"
        );
        Arc::new(OpenAiVisionAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        ))
    } else {
        warn!("ROOMLENS_AI_API_KEY not set, using mock vision adapter");
        Arc::new(MockVisionAdapter::new())
    };

    let session = Arc::new(SessionService::new(source, vision));
    let reports = Arc::new(ReportService::new(PathBuf::from(
        cfg.reports_dir_or_default(),
    )));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(session, reports));
    input_port.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
