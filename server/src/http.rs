use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    routing::get,
};
use platform_api::{ApiError, ApiResponse, ApiResult};
use platform_import::{ImportReport, ImportSource, SalaryPolicy, import_employees};
use products_hr::{Employee, EmployeePatch, HrModule, NewEmployee};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub hr: HrModule,
    pub importer: Arc<dyn ImportSource>,
    pub salaries: SalaryPolicy,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hr suite listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    let employees = Router::new()
        .route(
            "/",
            get(list_handler)
                .post(create_handler)
                .delete(delete_by_name_handler),
        )
        .route("/search", get(search_handler))
        .route("/import", get(import_handler).post(import_handler))
        .route(
            "/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        );
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/employees", employees)
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct NameQuery {
    name: Option<String>,
}

impl NameQuery {
    fn required(self) -> ApiResult<String> {
        self.name
            .ok_or_else(|| ApiError::invalid_input("query parameter `name` is required"))
    }
}

#[derive(Deserialize)]
struct ImportQuery {
    count: Option<String>,
}

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "HR suite employee API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": { "employees": "/api/employees" },
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    employees: usize,
    version: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        employees: state.hr.len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[instrument(name = "http.employees.list", skip_all)]
async fn list_handler(State(state): State<AppState>) -> Json<ApiResponse<Vec<Employee>>> {
    let employees = state.hr.list();
    let count = employees.len();
    Json(ApiResponse::data(employees).with_count(count))
}

#[instrument(name = "http.employees.search", skip_all)]
async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Employee>>>> {
    let found = state.hr.find_by_name(&query.required()?)?;
    let count = found.len();
    Ok(Json(ApiResponse::data(found).with_count(count)))
}

#[instrument(name = "http.employees.get", skip_all, fields(employee_id = %id))]
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Employee>>> {
    let employee = state
        .hr
        .find_by_id(&id)
        .ok_or_else(|| ApiError::not_found(format!("no employee found with id {id}")))?;
    Ok(Json(ApiResponse::data(employee)))
}

#[instrument(name = "http.employees.create", skip_all)]
async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<Created<Employee>> {
    let Json(new) = payload.map_err(|err| ApiError::invalid_input(err.body_text()))?;
    let employee = state.hr.add(new)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(employee).with_message("employee created")),
    ))
}

#[instrument(name = "http.employees.update", skip_all, fields(employee_id = %id))]
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeePatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Employee>>> {
    let Json(patch) = payload.map_err(|err| ApiError::invalid_input(err.body_text()))?;
    let employee = state.hr.update_by_id(&id, patch)?;
    Ok(Json(
        ApiResponse::data(employee).with_message("employee updated"),
    ))
}

#[instrument(name = "http.employees.delete", skip_all, fields(employee_id = %id))]
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !state.hr.delete_by_id(&id) {
        return Err(ApiError::not_found(format!("no employee found with id {id}")));
    }
    Ok(Json(ApiResponse::message("employee deleted")))
}

/// Bulk delete: every employee whose name contains `name`, ignoring case.
#[instrument(name = "http.employees.delete_by_name", skip_all)]
async fn delete_by_name_handler(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let name = query.required()?;
    if !state.hr.delete_by_name(&name)? {
        return Err(ApiError::not_found(format!(
            "no employees matched name {name:?}"
        )));
    }
    Ok(Json(ApiResponse::message("employees deleted")))
}

#[instrument(name = "http.employees.import", skip_all)]
async fn import_handler(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
) -> ApiResult<Created<ImportReport>> {
    let count = match query.count {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::invalid_input(format!("count must be a number, got {raw:?}")))?,
        None => state.config.import.default_count,
    };
    let report =
        import_employees(state.importer.as_ref(), &state.hr, &state.salaries, count).await?;
    let imported = report.imported.len();
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(report)
                .with_count(imported)
                .with_message(format!("{imported} employees imported")),
        ),
    ))
}

async fn fallback_handler() -> ApiError {
    ApiError::not_found("route not found")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
