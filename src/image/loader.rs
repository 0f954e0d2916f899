use crate::utils::error::RipenessError;
use crate::Result;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

/// 上传图片的大小上限（字节）
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

pub struct ImageLoader;

impl ImageLoader {
    /// 从base64字符串加载图像
    pub fn from_base64(base64_data: &str) -> Result<DynamicImage> {
        // 检测并移除可能的数据URL前缀 (data:image/xxx;base64,)
        let base64_clean = if base64_data.starts_with("data:") {
            base64_data.split(',').nth(1).unwrap_or(base64_data)
        } else {
            base64_data
        };

        let image_bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_clean)
            .map_err(RipenessError::Base64)?;

        Self::from_bytes(&image_bytes)
    }

    /// 从字节流加载图像，只接受上传白名单内的格式
    pub fn from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(RipenessError::FileTooLarge(bytes.len(), MAX_IMAGE_BYTES));
        }

        if let Some(format) = Self::detect_format(bytes) {
            if !Self::is_supported_format(format) {
                return Err(RipenessError::UnsupportedFormat(format!("{:?}", format)));
            }
        }

        let image = image::load_from_memory(bytes).map_err(RipenessError::Decode)?;

        Ok(image)
    }

    /// 从文件路径加载图像（批式CLI入口）
    pub fn from_path(path: &Path) -> Result<DynamicImage> {
        if !path.exists() {
            return Err(RipenessError::InvalidInput(format!(
                "image not found: {}",
                path.display()
            )));
        }

        let image = image::open(path).map_err(RipenessError::Decode)?;

        Ok(image)
    }

    /// 检测图像格式
    pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok()
    }

    /// 交互入口每次接受一张JPEG或PNG
    pub fn is_supported_format(format: ImageFormat) -> bool {
        matches!(format, ImageFormat::Png | ImageFormat::Jpeg)
    }
}
