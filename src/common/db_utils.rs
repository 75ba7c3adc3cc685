use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Column, PgPool, Row, TypeInfo};

use crate::{
    common::error::AppError,
    db::report_source::{ReportRow, Scalar},
};

// ---
// Helper: conexão com escopo por relatório
// ---
/// Adquire uma conexão da pool. Ela volta para a pool quando o valor sai de escopo.
pub(crate) async fn get_report_connection(
    pool: &PgPool,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError::DatabaseError
    let conn = pool.acquire().await?;
    Ok(conn)
}

/// Tipos do Postgres que sabemos decodificar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PgScalarType {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
}

impl PgScalarType {
    pub(crate) fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "INT2" => Some(Self::Int2),
            "INT4" => Some(Self::Int4),
            "INT8" => Some(Self::Int8),
            "FLOAT4" => Some(Self::Float4),
            "FLOAT8" => Some(Self::Float8),
            "NUMERIC" => Some(Self::Numeric),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Converte uma linha do Postgres em `ReportRow`, coluna a coluna, pelo nome do tipo.
pub(crate) fn decode_pg_row(row: &PgRow) -> Result<ReportRow, AppError> {
    let mut decoded = ReportRow::new();

    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let type_name = column.type_info().name();

        let Some(scalar_type) = PgScalarType::from_type_name(type_name) else {
            return Err(AppError::UnsupportedColumnType {
                column: name.to_string(),
                type_name: type_name.to_string(),
            });
        };

        let value = match scalar_type {
            PgScalarType::Int2 => row.try_get::<Option<i16>, _>(idx)?.map(|v| Scalar::Integer(v.into())),
            PgScalarType::Int4 => row.try_get::<Option<i32>, _>(idx)?.map(|v| Scalar::Integer(v.into())),
            PgScalarType::Int8 => row.try_get::<Option<i64>, _>(idx)?.map(Scalar::Integer),
            PgScalarType::Float4 => row.try_get::<Option<f32>, _>(idx)?.map(|v| Scalar::Float(v.into())),
            PgScalarType::Float8 => row.try_get::<Option<f64>, _>(idx)?.map(Scalar::Float),
            PgScalarType::Numeric => row.try_get::<Option<Decimal>, _>(idx)?.map(Scalar::Decimal),
            PgScalarType::Text => row.try_get::<Option<String>, _>(idx)?.map(Scalar::Text),
        };

        decoded.push(name, value.unwrap_or(Scalar::Null));
    }

    Ok(decoded)
}
