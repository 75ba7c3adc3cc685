// src/db/report_source.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{decode_pg_row, get_report_connection},
        error::AppError,
    },
    models::dashboard::ReportKind,
};

/// Um valor escalar vindo do banco.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl Scalar {
    fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Decimal(_) => "decimal",
            Scalar::Text(_) => "text",
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Decimal(value)
    }
}

/// Linha de resultado com colunas nomeadas (na ordem do SELECT).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    columns: Vec<(String, Scalar)>,
}

impl ReportRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &str, value: Scalar) {
        self.columns.push((column.to_string(), value));
    }

    pub fn get(&self, column: &str) -> Result<&Scalar, AppError> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| AppError::MissingColumn(column.to_string()))
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>, AppError> {
        match self.get(column)? {
            Scalar::Null => Ok(None),
            Scalar::Text(s) => Ok(Some(s.clone())),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn text(&self, column: &str) -> Result<String, AppError> {
        match self.get(column)? {
            Scalar::Text(s) => Ok(s.clone()),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn integer(&self, column: &str) -> Result<i64, AppError> {
        match self.get(column)? {
            Scalar::Integer(v) => Ok(*v),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    /// Aceita NUMERIC, inteiros (SUM de colunas inteiras) e floats finitos.
    pub fn decimal(&self, column: &str) -> Result<Decimal, AppError> {
        match self.get(column)? {
            Scalar::Decimal(d) => Ok(*d),
            Scalar::Integer(v) => Ok(Decimal::from(*v)),
            Scalar::Float(f) => Decimal::try_from(*f)
                .map_err(|_| AppError::NumericConversion(f.to_string())),
            other => Err(mismatch(column, "decimal", other)),
        }
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Scalar) -> AppError {
    AppError::UnexpectedColumnType {
        column: column.to_string(),
        expected,
        found: found.kind_name(),
    }
}

/// Registros de linha bruta com aridade fixa, um por consulta.
pub trait FromReportRow: Sized {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError>;
}

/// Uma consulta do catálogo.
#[derive(Debug, Clone, Copy)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub sql: &'static str,
}

/// "Executa a agregação e devolve as linhas." Só leitura.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_rows(&self, query: &ReportQuery) -> Result<Vec<ReportRow>, AppError>;
}

#[derive(Clone)]
pub struct PgReportSource {
    pool: PgPool,
}

impl PgReportSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportSource for PgReportSource {
    async fn fetch_rows(&self, query: &ReportQuery) -> Result<Vec<ReportRow>, AppError> {
        // Uma conexão por relatório; liberada ao sair do escopo, com ou sem erro
        let mut conn = get_report_connection(&self.pool).await?;

        tracing::debug!(report = %query.kind, "executando consulta");
        let rows = sqlx::query(query.sql).fetch_all(&mut *conn).await?;

        rows.iter().map(decode_pg_row).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn row() -> ReportRow {
        ReportRow::new()
            .with("nombre", "Ana")
            .with("total", Decimal::from_str("12.50").unwrap())
            .with("conteo", 3_i64)
    }

    #[test]
    fn reads_columns_by_name() {
        let r = row();
        assert_eq!(r.text("nombre").unwrap(), "Ana");
        assert_eq!(r.integer("conteo").unwrap(), 3);
        assert_eq!(r.decimal("total").unwrap(), Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn decimal_widens_integers() {
        assert_eq!(row().decimal("conteo").unwrap(), Decimal::from(3));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = row().text("apellido").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "apellido"));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let err = row().integer("nombre").unwrap_err();
        assert!(matches!(
            err,
            AppError::UnexpectedColumnType { expected: "integer", found: "text", .. }
        ));
    }

    #[test]
    fn null_text_is_none_only_for_opt_text() {
        let mut r = ReportRow::new();
        r.push("tipo", Scalar::Null);
        assert_eq!(r.opt_text("tipo").unwrap(), None);
        assert!(r.text("tipo").is_err());
    }
}
