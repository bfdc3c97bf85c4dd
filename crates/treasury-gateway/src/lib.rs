pub mod auth;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, info};
use treasury_core::{
    DEFAULT_RECENT_LIMIT, DashboardSummary, MonthKey, PaymentIngestion, PaymentRecord,
    PaymentReports, PaymentStore, PaymentSubmission, ProofStore, ProofUpload, render_report,
    report_file_name,
};
use treasury_platform::{
    AdminLoginRequest, AdminLoginResponse, MessageResponse, ServiceConfig, SubmitPaymentResponse,
};
use treasury_store::UPLOADS_URL_PREFIX;

use crate::{
    auth::{AdminAuth, require_admin},
    error::{ApiError, ApiResult, treasury_error},
};

pub const SCREENSHOT_FIELD: &str = "screenshot";
/// Transport cap for submissions; the 5 MiB proof limit is enforced by
/// ingestion so oversized files get a readable message.
pub const SUBMIT_BODY_LIMIT: usize = 6 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<PaymentIngestion>,
    pub reports: Arc<PaymentReports>,
    pub auth: AdminAuth,
    pub upload_dir: PathBuf,
    pub ping_message: String,
}

impl AppState {
    pub fn new(
        config: &ServiceConfig,
        payments: Arc<dyn PaymentStore>,
        proofs: Arc<dyn ProofStore>,
    ) -> Self {
        Self {
            ingestion: Arc::new(PaymentIngestion::new(
                payments.clone(),
                proofs,
                config.society,
            )),
            reports: Arc::new(PaymentReports::new(payments, config.society)),
            auth: AdminAuth::new(&config.jwt_secret, config.admin.clone()),
            upload_dir: config.upload_dir.clone(),
            ping_message: config.ping_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RecentQuery {
    limit: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/monthly-payments", get(monthly_payments))
        .route("/api/admin/recent-payments", get(recent_payments))
        .route("/api/admin/export-report", get(export_report))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_admin,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/ping", get(ping))
        .route("/api/demo", get(demo))
        .route("/api/admin/login", post(admin_login))
        .route(
            "/api/payments/submit",
            post(submit_payment).layer(DefaultBodyLimit::max(SUBMIT_BODY_LIMIT)),
        )
        .merge(admin)
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&state.upload_dir))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn ping(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse::new(state.ping_message.clone()))
}

async fn demo() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello from the treasury gateway"))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> ApiResult<Json<AdminLoginResponse>> {
    let Json(payload) = payload.map_err(|err| ApiError::Validation(err.body_text()))?;

    state
        .auth
        .login(payload.email.as_deref(), payload.password.as_deref())
        .map(Json)
}

async fn submit_payment(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<SubmitPaymentResponse>)> {
    let mut multipart = multipart.map_err(|err| ApiError::Validation(err.body_text()))?;
    let mut submission = PaymentSubmission::default();
    let mut proof = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == SCREENSHOT_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(upload_error)?;

            // Browsers send an empty, unnamed part when no file was chosen.
            if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                continue;
            }
            proof = Some(ProofUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(upload_error)?;
        if !submission.set_field(&name, value) {
            debug!(field = %name, "ignoring unknown form field");
        }
    }

    let payment = state
        .ingestion
        .submit(submission, proof)
        .await
        .map_err(treasury_error("Failed to submit payment"))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitPaymentResponse {
            message: "Payment submitted successfully".to_string(),
            payment,
        }),
    ))
}

async fn dashboard(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardSummary>> {
    let Query(query) = query.map_err(|err| ApiError::Validation(err.body_text()))?;
    let month = month_or_current(&state.reports, query.month.as_deref())?;

    state
        .reports
        .dashboard(&month)
        .await
        .map(Json)
        .map_err(treasury_error("Failed to fetch dashboard data"))
}

async fn monthly_payments(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Query(query) = query.map_err(|err| ApiError::Validation(err.body_text()))?;
    let month = month_or_current(&state.reports, query.month.as_deref())?;

    state
        .reports
        .monthly(&month)
        .await
        .map(Json)
        .map_err(treasury_error("Failed to fetch monthly payments"))
}

async fn recent_payments(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Query(query) = query.map_err(|err| ApiError::Validation(err.body_text()))?;
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_RECENT_LIMIT);

    state
        .reports
        .recent(limit)
        .await
        .map(Json)
        .map_err(treasury_error("Failed to fetch recent payments"))
}

async fn export_report(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|err| ApiError::Validation(err.body_text()))?;
    let month = non_blank(query.month.as_deref())
        .map(MonthKey::parse)
        .transpose()
        .map_err(treasury_error("Failed to export report"))?;

    let records = match &month {
        Some(month) => state.reports.monthly(month).await,
        None => state.reports.all().await,
    }
    .map_err(treasury_error("Failed to export report"))?;

    let file_name = report_file_name(month.as_ref());
    info!(rows = records.len(), file = %file_name, "exporting payment report");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        render_report(&records),
    ))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn month_or_current(reports: &PaymentReports, raw: Option<&str>) -> ApiResult<MonthKey> {
    match non_blank(raw) {
        Some(raw) => MonthKey::parse(raw).map_err(treasury_error("Invalid month")),
        None => Ok(reports.current_month()),
    }
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::Validation(err.body_text())
}
