// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{common::error::AppError, config::AppState, models::dashboard::ReportKind};

// GET /api/dashboards
pub async fn get_dashboard(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let context = app_state.dashboard_service.build_dashboard().await?;

    Ok((StatusCode::OK, Json(context)))
}

// GET /api/dashboards/{report}
pub async fn get_report(
    State(app_state): State<AppState>,
    Path(report): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind: ReportKind = report.parse()?;

    let rows = app_state.dashboard_service.report_json(kind).await?;

    Ok((StatusCode::OK, Json(rows)))
}

// GET /api/dashboards/context
// Cada relatório como string JSON, no formato que um template de painel recebe
pub async fn get_dashboard_context(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let context = app_state.dashboard_service.build_dashboard().await?;

    Ok((StatusCode::OK, Json(context.serialized()?)))
}
