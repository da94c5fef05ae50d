mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use brandpulse_store::{PostStore, SheetClient};

use crate::{
    api::{build_app, default_request_budget, AppState},
    middleware::ApiKeyAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(brandpulse_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let brands = Arc::new(brandpulse_core::load_brands(&config.brands_path)?);
    let store = Arc::new(PostStore::new());
    let sheets = Arc::new(SheetClient::new(
        &config.sheets_base_url,
        config.fetch_timeout_secs,
        &config.fetch_user_agent,
    )?);

    // Warm the store before serving so the first dashboard render has data.
    scheduler::run_full_refresh(&store, &sheets, &brands).await;

    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&store),
        Arc::clone(&sheets),
        Arc::clone(&brands),
        Arc::clone(&config),
    )
    .await?;

    let auth = ApiKeyAuth::from_env(matches!(
        config.env,
        brandpulse_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            store,
            sheets,
            brands,
            config: Arc::clone(&config),
        },
        auth,
        default_request_budget(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
