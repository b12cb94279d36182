use std::sync::Arc;

use just_in_case::backend::BackendClient;
use just_in_case::channels::CliSession;
use just_in_case::coach::{
    Checklist, CoachEngine, CoachSessions, coach_routes, spawn_expiry_task,
};
use just_in_case::config::{BackendConfig, CoachConfig, ServerConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let backend_config = BackendConfig::from_env()?;
    let coach_config = CoachConfig::from_env();
    let server_config = ServerConfig::from_env();

    eprintln!("🧰 Just In Case v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", backend_config.base_url);
    eprintln!(
        "   Coach API: http://0.0.0.0:{}/api/coach/sessions",
        server_config.port
    );
    eprintln!("   Commands: /status, /search, /coach, /new, /context on|off, /quit\n");

    let checklist = Arc::new(Checklist::preparedness());

    // ── Coach API ─────────────────────────────────────────────────────────
    // The browser paces its own rendering, so the API runs without delays.
    let sessions = CoachSessions::new(Arc::clone(&checklist), CoachConfig::immediate());
    spawn_expiry_task(
        Arc::clone(&sessions),
        server_config.session_idle_timeout,
        server_config.sweep_interval,
    );
    let app = coach_routes(sessions);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.port)).await?;
    tokio::spawn(async move {
        tracing::info!(port = server_config.port, "Coach API server started");
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Coach API server stopped: {}", e);
        }
    });

    // ── Terminal session ──────────────────────────────────────────────────
    let engine = CoachEngine::new(checklist, coach_config);
    let backend = BackendClient::new(backend_config);
    let mut session = CliSession::new(engine, backend, std::io::stdout());
    session.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
