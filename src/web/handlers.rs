use crate::{
    classify::{Classification, ClassifyOptions, ClassifyPipeline},
    utils::error::RipenessError,
    Config, Result,
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// JSON请求体（base64模式）
#[derive(Debug, Deserialize)]
pub struct ClassifyJsonRequest {
    /// Base64编码的图像数据
    pub image: String,

    /// 排名返回的标签数量
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// JSON响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub timestamp: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// JSON base64上传处理器
pub async fn classify_json_handler(
    State(_config): State<Config>,
    Json(request): Json<ClassifyJsonRequest>,
) -> Result<Json<ApiResponse<Classification>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Processing JSON classify request: request_id={}, top_k={:?}",
        request_id,
        request.top_k
    );

    // 验证请求参数
    if request.image.trim().is_empty() {
        return Err(RipenessError::InvalidInput("Empty image data".to_string()));
    }

    let options = ClassifyOptions {
        top_k: request.top_k,
    };

    let result = ClassifyPipeline::process_base64(&request.image, &options)?;

    tracing::info!(
        "JSON classify completed: request_id={}, label={}, time={:.3}s",
        request_id,
        result.label,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result)))
}

/// Multipart文件上传处理器
pub async fn classify_upload_handler(
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Classification>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing multipart classify request: request_id={}", request_id);

    let mut image_data: Option<axum::body::Bytes> = None;
    let mut options = ClassifyOptions::default();

    // 解析multipart数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        RipenessError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                // 验证内容类型
                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("image/") {
                        return Err(RipenessError::UnsupportedFormat(content_type.to_string()));
                    }
                }

                let data = field.bytes().await.map_err(|e| {
                    RipenessError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                if data.is_empty() {
                    return Err(RipenessError::InvalidInput("Empty file".to_string()));
                }
                if data.len() > config.server_config.max_request_size {
                    return Err(RipenessError::FileTooLarge(
                        data.len(),
                        config.server_config.max_request_size,
                    ));
                }

                tracing::debug!("Received file: {} bytes", data.len());
                image_data = Some(data);
            }
            "top_k" => {
                let value = field.text().await.unwrap_or_default();
                if let Ok(top_k) = value.parse::<usize>() {
                    options.top_k = Some(top_k);
                }
            }
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    // 验证必需的图像数据
    let image_data = image_data
        .ok_or_else(|| RipenessError::InvalidInput("No image file provided".to_string()))?;

    let result = ClassifyPipeline::process_bytes(&image_data, &options)?;

    tracing::info!(
        "Upload classify completed: request_id={}, label={}, confidence={:.2}%, time={:.3}s",
        request_id,
        result.label,
        result.confidence,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result)))
}
