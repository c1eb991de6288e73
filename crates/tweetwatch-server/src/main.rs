mod api;
mod middleware;
mod observer;
mod scheduler;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tweetwatch_client::BackendClient;
use tweetwatch_pipeline::Backend;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
    observer::Observer,
    scheduler::TriggerSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tweetwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, backend = %config.backend_url, "starting tweetwatch");

    let backend: Arc<dyn Backend> = Arc::new(BackendClient::from_app_config(&config)?);
    let (cron, triggers) = scheduler::build_scheduler().await?;

    scheduler::register_sweep_job(&*triggers, &config.sweep_cron, Arc::clone(&backend))
        .await?;
    let observer = Arc::new(Observer::new(
        Arc::clone(&backend),
        Arc::clone(&triggers) as Arc<dyn TriggerSource>,
    ));
    observer.restore().await;
    cron.start().await?;

    let auth = AuthState::from_env(matches!(
        config.env,
        tweetwatch_core::Environment::Development
    ))?;
    let app = build_app(AppState { observer }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
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
