use std::process::ExitCode;

use ferrocast_core::Settings;
use ferrocast_web::{router, AppState};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferrocast=info,ferrocast_web=info,tower_http=info".into()),
        )
        .init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let state = AppState::new(settings.data_source());
    let source = state.source.id();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    info!(
        "ferrocast-web v{} listening on {} (source {source})",
        env!("CARGO_PKG_VERSION"),
        settings.bind
    );
    axum::serve(listener, app).await?;
    Ok(())
}
