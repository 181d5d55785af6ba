//! Orgdesk - organization management service
//!
//! Serves the organization API of a multi-tenant expense tracker: tenant
//! creation, membership listing and removal, behind JWT sessions.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use validator::Validate;

use config::LogFormat;
use orgdesk::{api, config, db, db::UserRepository, middleware, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    // Check for --help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    // Check for --version flag
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Orgdesk {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must be kept alive for the duration of the program
    // to ensure log messages are flushed to files
    let _log_guard = init_logging(&config);

    info!("Orgdesk starting up");

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let db = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    if let Some(pos) = args.iter().position(|arg| arg == "--create-user") {
        let email = args
            .get(pos + 1)
            .filter(|a| !a.starts_with("--"))
            .context("--create-user requires an email address")?;
        let name = args.get(pos + 2).filter(|a| !a.starts_with("--"));
        return create_user(&config, &db, email, name.map(String::as_str)).await;
    }

    let state = AppState {
        config: config.clone(),
        db,
    };

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server is ready to accept connections");

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Account fields accepted by `--create-user`
#[derive(Debug, Validate)]
struct NewUser {
    #[validate(email(message = "Invalid email address"))]
    email: String,
}

/// Insert (or reuse) a user and print an access token for it
async fn create_user(
    config: &AppConfig,
    pool: &db::DbPool,
    email: &str,
    name: Option<&str>,
) -> Result<()> {
    NewUser {
        email: email.to_string(),
    }
    .validate()
    .with_context(|| format!("Invalid email address: {}", email))?;

    let users = UserRepository::new(pool);
    let user = match users.get_by_email(email).await? {
        Some(existing) => {
            info!(user_id = %existing.id, "User already exists, issuing a new token");
            existing
        }
        None => users.create(name, email).await?,
    };

    let token = middleware::auth::create_access_token(
        &user.id,
        &user.email,
        user.name.as_deref(),
        &config.auth.jwt_secret,
        config.auth.token_expiry_hours,
    )
    .context("Failed to create access token")?;

    println!("User ID: {}", user.id);
    println!("Token:   {}", token);
    Ok(())
}

/// Initialize the logging/tracing infrastructure
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_config = &config.logging;

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_both_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
    }
}

fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(writer))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false).with_writer(writer))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
        }
    }
}

fn init_both_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true)) // Console
                .with(fmt::layer().json().with_target(true).with_writer(writer)) // File
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false)) // Console
                .with(fmt::layer().compact().with_target(false).with_writer(writer)) // File
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(fmt::layer().with_target(true)) // Console
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                ) // File
                .init();
        }
    }
}

/// Directory holding the SQLite file named by a `sqlite://` URL
fn sqlite_parent_dir(url: &str) -> Option<&std::path::Path> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

/// Ensure the data directory exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(parent) = sqlite_parent_dir(&config.database.url) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
            info!("Created data directory: {:?}", parent);
        }
    }
    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState, config: &AppConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    api::router(state)
        .layer(trace_layer)
        .layer(cors_layer(config))
}

/// Print help message
fn print_help() {
    println!(
        r#"Orgdesk {}

USAGE:
    orgdesk [OPTIONS]

OPTIONS:
    -h, --help                      Print this help message
    -V, --version                   Print version information
    --create-user <EMAIL> [NAME]    Create a user (or reuse an existing one with
                                    the same email) and print an access token

ENVIRONMENT:
    ORGDESK_CONFIG      Path to configuration file (default: config.yaml)
    ORGDESK_HOST        Override server.host
    ORGDESK_PORT        Override server.port
    DATABASE_URL        Override database.url
    JWT_SECRET          Override auth.jwt_secret
    RUST_LOG            Log filter (overrides logging.level)

CONFIGURATION:
    The application looks for configuration files in the following order:
    1. Path specified by ORGDESK_CONFIG environment variable
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/orgdesk/config.yaml
    5. $XDG_CONFIG_HOME/orgdesk/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    );
}
