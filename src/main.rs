//src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod models;
mod services;

use crate::config::{AppState, Config};

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboards", get(handlers::dashboard::get_dashboard))
        .route("/api/dashboards/context", get(handlers::dashboard::get_dashboard_context))
        .route("/api/dashboards/{report}", get(handlers::dashboard::get_report))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, sync::Arc};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        db::report_source::{
            testing::{FailingReportSource, StaticReportSource},
            ReportRow,
        },
        models::dashboard::ReportKind,
    };

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn revenue_source() -> StaticReportSource {
        StaticReportSource::new().with_rows(
            ReportKind::RevenueByMonth,
            vec![
                ReportRow::new()
                    .with("anio", 2024_i64)
                    .with("mes_nombre", "January")
                    .with("total_ingresos", Decimal::from_str("1000.00").unwrap()),
                ReportRow::new()
                    .with("anio", 2024_i64)
                    .with("mes_nombre", "February")
                    .with("total_ingresos", Decimal::from_str("500.00").unwrap()),
            ],
        )
    }

    #[tokio::test]
    async fn dashboard_exposes_every_report_key() {
        let app = build_router(AppState::from_source(Arc::new(revenue_source())));

        let (status, body) = get_json(app, "/api/dashboards").await;

        assert_eq!(status, StatusCode::OK);
        for kind in ReportKind::ALL {
            assert!(body[kind.context_key()].is_array(), "{kind}");
        }
        assert_eq!(
            body["revenue_by_month"],
            json!([
                { "mes": "Enero", "total_ingresos": 1000.0 },
                { "mes": "Febrero", "total_ingresos": 500.0 }
            ])
        );
    }

    #[tokio::test]
    async fn single_report_route_returns_its_array() {
        let app = build_router(AppState::from_source(Arc::new(revenue_source())));

        let (status, body) = get_json(app, "/api/dashboards/revenue_by_month").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn context_route_returns_each_report_as_a_json_string() {
        let app = build_router(AppState::from_source(Arc::new(revenue_source())));

        let (status, body) = get_json(app, "/api/dashboards/context").await;

        assert_eq!(status, StatusCode::OK);
        for kind in ReportKind::ALL {
            assert!(body[kind.context_key()].is_string(), "{kind}");
        }
        let revenue: Value =
            serde_json::from_str(body["revenue_by_month"].as_str().unwrap()).unwrap();
        assert_eq!(revenue[0], json!({ "mes": "Enero", "total_ingresos": 1000.0 }));
        assert_eq!(body["member_types"], json!("[]"));
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        let app = build_router(AppState::from_source(Arc::new(StaticReportSource::new())));

        let (status, body) = get_json(app, "/api/dashboards/ventas").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn data_store_failure_aborts_the_dashboard() {
        let source = FailingReportSource {
            fail_on: ReportKind::HighestAverageBilling,
            inner: StaticReportSource::new(),
        };
        let app = build_router(AppState::from_source(Arc::new(source)));

        let (status, body) = get_json(app, "/api/dashboards").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Ocorreu um erro inesperado." }));
    }
}
