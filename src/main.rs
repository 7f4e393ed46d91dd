// --- Importador del plan de producción - Archivo principal ---

use planimport::config::Config;
use planimport::run_server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,planimport=debug,actix_web=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("=== Importador de plan de producción (API) ===");
    run_server(config).await?;
    Ok(())
}
