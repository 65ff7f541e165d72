use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use comptes_rs::{
    AccountService, AppState, GraphQlAccountService, GraphQlConfig, InMemoryAccountService,
    build_router, graceful_shutdown,
};

/// The web front-end for the compte GraphQL service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL of the GraphQL endpoint of the account service.
    #[arg(
        long,
        env = "COMPTES_GRAPHQL_URL",
        default_value = "http://localhost:8082/graphql"
    )]
    graphql_url: String,

    /// The port to serve the web app from.
    #[arg(short, long, env = "COMPTES_PORT", default_value_t = 3000)]
    port: u16,

    /// How many seconds to wait for the account service before giving up on a request.
    #[arg(long, env = "COMPTES_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    /// File path for the debug log.
    #[arg(long, env = "COMPTES_LOG_FILE", default_value = "debug.log")]
    log_file: String,

    /// Keep accounts in memory instead of using the account service.
    #[arg(long)]
    in_memory: bool,

    /// Start the in-memory account service with a few demo accounts.
    #[arg(long, requires = "in_memory")]
    seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_file) {
        eprintln!("Could not open log file {}: {error}", args.log_file);
        return ExitCode::FAILURE;
    }

    let service: Arc<dyn AccountService> = if args.in_memory {
        tracing::info!("Using the in-memory account service");
        if args.seed {
            Arc::new(InMemoryAccountService::with_demo_accounts())
        } else {
            Arc::new(InMemoryAccountService::new())
        }
    } else {
        let config = GraphQlConfig {
            endpoint: args.graphql_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        };
        tracing::info!("Using the account service at {}", config.endpoint);

        match GraphQlAccountService::new(config) {
            Ok(service) => Arc::new(service),
            Err(error) => {
                tracing::error!("Could not create the account service client: {error}");
                return ExitCode::FAILURE;
            }
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(AppState::new(service)));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("The server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_file: &str) -> Result<(), std::io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
