use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;

use paymulator_core::adapters::{InMemoryTransactionStore, PostgresTransactionStore};
use paymulator_core::cli::{self, Cli, Commands, ServeArgs};
use paymulator_core::config::Config;
use paymulator_core::middleware::{Credentials, RateLimiter};
use paymulator_core::ports::TransactionStore;
use paymulator_core::{create_app, db, logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.into_command() {
        Commands::Config => {
            cli::handle_config_validate(&config);
            Ok(())
        }
        Commands::Serve(args) => {
            logging::init_logging(config.log_format);
            if let Err(e) = serve(config, args).await {
                tracing::error!(error = %e, "fatal error, shutting down");
                return Err(e);
            }
            tracing::info!("Server stopped");
            Ok(())
        }
    }
}

async fn serve(config: Config, args: ServeArgs) -> anyhow::Result<()> {
    let store: Arc<dyn TransactionStore> = if args.in_memory {
        tracing::warn!("using in-memory transaction store; data is lost on exit");
        Arc::new(InMemoryTransactionStore::new())
    } else {
        tracing::info!(url = %config.redacted_database_url(), "connecting to database");
        let pool = db::create_pool(&config).await?;
        Arc::new(PostgresTransactionStore::new(pool))
    };

    let state = AppState::new(
        store,
        RateLimiter::new(&config.rate_limit),
        Credentials::new(&config.auth_username, &config.auth_password),
    );
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
