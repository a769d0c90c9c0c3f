use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use alms_api::{AppState, AppStateInner};
use alms_notify::{NoopNotifier, Notifier, SmtpConfig, SmtpNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alms=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("ALMS_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("ALMS_DB_PATH").unwrap_or_else(|_| "alms.db".into());
    let host = std::env::var("ALMS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ALMS_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = alms_db::Database::open(&PathBuf::from(&db_path))?;

    // Thank-you mailer: real SMTP when configured, a logging no-op
    // otherwise so transfers never depend on mail settings.
    let notifier: Arc<dyn Notifier> = match SmtpConfig::from_env() {
        Ok(config) => Arc::new(SmtpNotifier::new(config)?),
        Err(e) => {
            warn!("Thank-you notifications disabled: {}", e);
            Arc::new(NoopNotifier)
        }
    };

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        notifier,
    });

    let app = alms_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Alms server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
