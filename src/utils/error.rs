use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RipenessError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Model output mismatch: label file has {expected} entries, model outputs {actual}")]
    ModelMismatch { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Label file error: {0}")]
    LabelFile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RipenessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RipenessError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RipenessError::Decode(_) => StatusCode::BAD_REQUEST,
            RipenessError::Base64(_) => StatusCode::BAD_REQUEST,
            RipenessError::Json(_) => StatusCode::BAD_REQUEST,
            RipenessError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            RipenessError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RipenessError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            RipenessError::ModelMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RipenessError::LabelFile(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RipenessError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RipenessError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            RipenessError::ModelMismatch { .. } => "MODEL_MISMATCH_ERROR",
            RipenessError::Inference(_) => "INFERENCE_ERROR",
            RipenessError::LabelFile(_) => "LABEL_FILE_ERROR",
            RipenessError::InvalidInput(_) => "INVALID_INPUT",
            RipenessError::FileTooLarge(_, _) => "FILE_TOO_LARGE",
            RipenessError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            RipenessError::Config(_) => "CONFIG_ERROR",
            RipenessError::Io(_) => "IO_ERROR",
            RipenessError::Json(_) => "JSON_ERROR",
            RipenessError::Base64(_) => "BASE64_DECODE_ERROR",
            RipenessError::Decode(_) => "IMAGE_DECODE_ERROR",
            RipenessError::Ort(_) => "ORT_ERROR",
            RipenessError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for RipenessError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        tracing::error!("Request failed: {} ({})", self, status);

        (status, axum::Json(error_response)).into_response()
    }
}
