use atual_service::{
    DefaultAppState, db,
    routes::create_router,
    shutdown::{GracefulShutdownLayer, ShutdownState},
};
use clap::Parser;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "atual-service")]
#[command(about = "Atual.bot backend: configuration, content, publications and click tracking")]
struct ServerArgs {
    /// SQLite database path or URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    bind_addr: SocketAddr,

    /// Upper bound for a single request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("atual_service=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = ServerArgs::parse();

    let connection = db::establish_connection(&args.database_url).unwrap_or_else(|err| {
        error!(database_url = %args.database_url, error = %err, "Failed to prepare database");
        std::process::exit(1);
    });

    info!(database_url = %args.database_url, "Connected to database");

    let app_state = DefaultAppState::new(Arc::new(Mutex::new(connection)));
    let shutdown_state = ShutdownState::new();

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(GracefulShutdownLayer::new(shutdown_state.clone()))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    args.request_timeout_secs,
                ))),
        )
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(args.bind_addr)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %args.bind_addr, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(bind_address = %args.bind_addr, "Server running");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_state));

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal(shutdown_state: ShutdownState) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        in_flight = shutdown_state.in_flight_count(),
        "Shutdown signal received, starting graceful shutdown"
    );
    shutdown_state.start_shutdown();
    shutdown_state.drained().await;
    info!("Graceful shutdown completed - all requests finished");
}
