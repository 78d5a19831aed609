use std::net::SocketAddr;

use anyhow::{Context, bail};
use tower_http::trace::TraceLayer;

use todo_tracker::{
    auth::jwt::{JwtKeys, encode_token, make_access_claims},
    config::AppConfig,
    db::connection::open_store,
    logging::init_tracing,
    routes::app,
    state::AppState,
};

const DEFAULT_TOKEN_TTL_SECS: usize = 24 * 60 * 60;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("issue-token") {
        return issue_token(&cfg, &args[1..]);
    }

    init_tracing(&cfg.logging.rust_log);

    let store = open_store(cfg.database.as_ref()).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    let state = AppState::new(cfg, store);

    let app = app(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// `issue-token <subject> [ttl-seconds]`: prints a bearer token signed with
/// the configured secret.
fn issue_token(cfg: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let Some(subject) = args.first().filter(|subject| !subject.trim().is_empty()) else {
        bail!("usage: todo-tracker issue-token <subject> [ttl-seconds]");
    };
    let ttl = match args.get(1) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid ttl-seconds: {raw}"))?,
        None => DEFAULT_TOKEN_TTL_SECS,
    };

    let keys = JwtKeys::from_secret(cfg.auth.jwt_secret.as_bytes());
    let token = encode_token(&keys, &make_access_claims(subject, ttl))?;
    println!("{token}");
    Ok(())
}
