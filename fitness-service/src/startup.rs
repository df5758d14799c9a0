//! Application startup and lifecycle management.

use crate::config::FitnessConfig;
use crate::services::generation::anthropic::AnthropicGenerator;
use crate::services::generation::mock::MockGenerator;
use crate::services::metrics::init_metrics;
use crate::services::{ContentGenerator, ContentService, Database, TextGenerator, UsageAggregator};
use crate::{build_router, AppState};
use service_core::error::AppError;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: FitnessConfig) -> Result<Self, AppError> {
        let provider = select_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build with an explicit text generator. Tests use this to script model responses.
    pub async fn build_with_provider(
        config: FitnessConfig,
        provider: Arc<dyn TextGenerator>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let state = build_state(config.clone(), db, provider);

        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Fitness service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "fitness-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

/// Wire the services shared by every handler.
pub fn build_state(
    config: FitnessConfig,
    db: Database,
    provider: Arc<dyn TextGenerator>,
) -> AppState {
    let generator = ContentGenerator::new(provider, &config.generation);
    let usage = UsageAggregator::new(db.clone());
    let content = ContentService::new(db.clone(), generator, usage.clone());

    let login_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );
    let register_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );

    AppState {
        config,
        db,
        content,
        usage,
        login_rate_limiter,
        register_rate_limiter,
    }
}

fn select_provider(config: &FitnessConfig) -> Result<Arc<dyn TextGenerator>, AppError> {
    match &config.anthropic.api_key {
        Some(key) => {
            let generator = AnthropicGenerator::new(&config.anthropic, key.clone())
                .map_err(AppError::ConfigError)?;
            tracing::info!(model = %config.anthropic.model, "Using Anthropic text generator");
            Ok(Arc::new(generator))
        }
        None => {
            tracing::warn!("ANTHROPIC_API_KEY not set, using mock text generator");
            Ok(Arc::new(MockGenerator::new(true)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
