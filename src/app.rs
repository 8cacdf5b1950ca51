/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config -> record provider -> resolver -> AppState
 * - Router assembly + middleware, then axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, UserStore};
use crate::middleware;
use crate::repos::{InMemoryUserRepo, PgUserRepo};
use crate::services::auth::{PrincipalResolver, UserPrincipalResolver};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,principal_resolver=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting principal resolver in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let resolver: Arc<dyn PrincipalResolver> = match &config.user_store {
        UserStore::Postgres {
            database_url,
            max_connections,
        } => {
            // Lazy: the first lookup opens the first connection.
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect_lazy(database_url)
                .context("invalid DATABASE_URL")?;
            tracing::info!(max_connections, "using postgres user store");
            Arc::new(UserPrincipalResolver::new(Arc::new(PgUserRepo::new(pool))))
        }
        UserStore::Memory { seed_file } => {
            let repo = match seed_file {
                Some(path) => InMemoryUserRepo::from_seed_file(path).await?,
                None => InMemoryUserRepo::new(),
            };
            tracing::info!(users = repo.len().await, "using in-memory user store");
            Arc::new(UserPrincipalResolver::new(Arc::new(repo)))
        }
    };

    Ok(AppState::new(resolver, config.app_env))
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    middleware::http::apply(router, request_timeout)
}
