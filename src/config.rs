// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{DashboardRepository, PgReportSource, ReportSource},
    services::DashboardService,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // O .env é opcional; variáveis do ambiente já definidas têm prioridade
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;
        let acquire_secs = parse_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?;

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_source(Arc::new(PgReportSource::new(db_pool))))
    }

    // --- Monta o gráfico de dependências sobre qualquer fonte de dados ---
    pub fn from_source(source: Arc<dyn ReportSource>) -> Self {
        let dashboard_repo = DashboardRepository::new(source);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Self { dashboard_service }
    }
}
