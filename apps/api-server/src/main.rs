//! api-server — HTTP API for the employee directory.
//!
//! Exposes list and create over JSON:
//! - `GET  /api/employees` returns every stored employee as a JSON array.
//! - `POST /api/employees` stores a JSON object and returns it with its
//!   server-assigned `id`.
//!
//! The same routes are also served under `/employees`.
//!
//! Storage: SQLite (file, default) when the `sqlite` feature is enabled, or
//! in-memory via `STORAGE_PROVIDER=memory`.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p api-server
//!
//! # volatile storage, JSON logs
//! STORAGE_PROVIDER=memory LOG_FORMAT=json cargo run -p api-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.
//!

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use domain::adapters::memory_repo::InMemoryRepo;
use domain::service::EmployeeService;
use domain::{CoreError, EmployeeRepository};
use http_common::{INTERNAL, MALFORMED_REQUEST, NOT_FOUND};
use serde_json::Value;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Store handle shared by every request.
type SharedRepo = Arc<dyn EmployeeRepository>;

#[derive(Clone)]
struct AppState {
    service: Arc<EmployeeService<SharedRepo>>,
}

impl AppState {
    fn new(repo: SharedRepo) -> Self {
        Self {
            service: Arc::new(EmployeeService::new(repo)),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    cfg.warn_if_volatile();

    let repo = match build_repo(&cfg) {
        Ok(r) => r,
        Err(e) => {
            error!(err = %e, "failed to open employee store");
            std::process::exit(1);
        }
    };

    let app = router(AppState::new(repo)).layer(cors_layer(&cfg));

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, err = %e, "bind failed");
            std::process::exit(1);
        }
    };
    info!(%addr, "api-server listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(err = %e, "server error");
        std::process::exit(1);
    }
    info!("api-server stopped");
}

/// Build the application router with request-id and tracing layers.
fn router(state: AppState) -> Router {
    // Request ID header name
    let x_request_id = axum::http::HeaderName::from_static("x-request-id");

    let employees = get(list_employees)
        .post(create_employee)
        .options(preflight_employees);

    Router::new()
        .route("/api/employees", employees.clone())
        .route("/employees", employees)
        .fallback(not_found)
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .with_state(state)
}

// CORS - origin already validated in Config::from_env()
fn cors_layer(cfg: &config::Config) -> CorsLayer {
    if cfg.cors_allow_origin == HeaderValue::from_static("*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([cfg.cors_allow_origin.clone()]))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    }
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

// Construct the store selected by config and feature flags.
fn build_repo(cfg: &config::Config) -> Result<SharedRepo, CoreError> {
    match cfg.storage_provider {
        #[cfg(feature = "sqlite")]
        config::StorageProvider::Sqlite => {
            let repo = sqlite_adapter::SqliteRepo::open_creating_dirs(&cfg.db_path)?;
            info!(path = %cfg.db_path.display(), "using sqlite employee store");
            Ok(Arc::new(repo))
        }
        _ => {
            info!("using in-memory employee store");
            Ok(Arc::new(InMemoryRepo::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(err = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(err = %e, "failed to install SIGTERM handler");
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
    info!("shutdown signal received");
}

/// Run a store call off the async workers; SQLite access is blocking.
async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, CoreError>
where
    F: FnOnce(&EmployeeService<SharedRepo>) -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| CoreError::Storage(format!("store task failed: {e}")))?
}

fn malformed(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(http_common::json_error_with_message(
            MALFORMED_REQUEST,
            message,
        )),
    )
        .into_response()
}

fn internal() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(http_common::json_err(INTERNAL)),
    )
        .into_response()
}

async fn list_employees(State(state): State<AppState>) -> Response {
    match with_service(&state, |svc| svc.list_all()).await {
        Ok(all) => {
            info!(count = all.len(), "list ok");
            (StatusCode::OK, Json(all)).into_response()
        }
        Err(e) => {
            error!(err = ?e, "list error");
            internal()
        }
    }
}

async fn create_employee(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!(%reason, "create rejected: unreadable body");
            return malformed(&reason);
        }
    };

    match with_service(&state, move |svc| svc.create(payload)).await {
        Ok(employee) => {
            info!(id = %employee.id, "create ok");
            (StatusCode::CREATED, Json(employee)).into_response()
        }
        Err(CoreError::MalformedRequest(msg)) => {
            warn!(reason = %msg, "create rejected");
            malformed(&msg)
        }
        Err(e) => {
            error!(err = ?e, "create error");
            internal()
        }
    }
}

async fn preflight_employees() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(http_common::json_err(NOT_FOUND)),
    )
}
