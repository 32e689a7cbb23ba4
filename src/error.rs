use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// Client-facing failures. Everything maps to 400 with a `detail` message,
/// mirroring the upload-validation and processing errors of the API contract.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Arquivo enviado não é uma imagem.")]
    NotAnImage,
    #[error("Nenhum arquivo enviado.")]
    MissingFile,
    #[error("Erro ao processar imagem: {0}")]
    Processing(String),
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[actix_web::test]
    async fn errors_render_as_400_with_detail() {
        let response = ApiError::NotAnImage.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Arquivo enviado não é uma imagem.");
    }

    #[actix_web::test]
    async fn processing_error_echoes_underlying_message() {
        let response = ApiError::Processing("formato inválido".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["detail"],
            "Erro ao processar imagem: formato inválido"
        );
    }
}
