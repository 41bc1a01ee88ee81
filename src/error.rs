use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const MISSING_CONTENT_MESSAGE: &str = "Content is required to generate a QR code.";
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal error occurred while generating the QR code.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{}", MISSING_CONTENT_MESSAGE)]
    MissingContent,
    #[error("{0}")]
    Upload(String),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Origin not allowed.")]
    ForbiddenOrigin,
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
    #[error("qr encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("qr matrix needs {required}px but only {size}px were requested")]
    MatrixTooLarge { required: u32, size: u32 },
    #[error("requested size {size}px exceeds the {max}px limit")]
    SizeTooLarge { size: u32, max: u32 },
    #[error("icon side of {0}px is too small to render")]
    IconTooSmall(u32),
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render task failed: {0}")]
    Task(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::MissingContent | ServiceError::Upload(_) => StatusCode::BAD_REQUEST,
            ServiceError::Rejected { status, .. } => *status,
            ServiceError::ForbiddenOrigin => StatusCode::FORBIDDEN,
            ServiceError::InvalidColor(_)
            | ServiceError::Encode(_)
            | ServiceError::MatrixTooLarge { .. }
            | ServiceError::SizeTooLarge { .. }
            | ServiceError::IconTooSmall(_)
            | ServiceError::Image(_)
            | ServiceError::Io(_)
            | ServiceError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal detail stays in the server log.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "failed to generate QR code");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
