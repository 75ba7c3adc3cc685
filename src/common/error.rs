use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Falha ao executar a consulta ou banco inacessível
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Coluna '{0}' ausente no resultado")]
    MissingColumn(String),

    #[error("Coluna '{column}' tem tipo inesperado (esperado {expected}, recebido {found})")]
    UnexpectedColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Tipo de coluna não suportado: {column} ({type_name})")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("Valor numérico não representável em ponto flutuante: {0}")]
    NumericConversion(String),

    #[error("Relatório não encontrado: {0}")]
    ReportNotFound(String),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ReportNotFound(ref key) => {
                (StatusCode::NOT_FOUND, format!("Relatório '{}' não existe.", key))
            }

            // Todo o resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
