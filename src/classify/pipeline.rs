use crate::{
    classify::{interpret, Classification, ClassifyOptions},
    image::{ImageLoader, ImagePreprocessor},
    models::{get_classifier, get_config, get_labels},
    Result,
};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;

/// 分类处理流水线：图像 -> 预处理 -> 推理 -> 解读。
/// 无状态的请求/响应变换，每次调用产生一个新的结果值。
pub struct ClassifyPipeline;

impl ClassifyPipeline {
    /// 处理文件路径（批式CLI入口）
    pub fn process_path(path: &Path, options: &ClassifyOptions) -> Result<Classification> {
        let start_time = Instant::now();
        let image = ImageLoader::from_path(path)?;
        Self::process_image(image, options, start_time)
    }

    /// 处理字节流图像（multipart上传）
    pub fn process_bytes(bytes: &[u8], options: &ClassifyOptions) -> Result<Classification> {
        let start_time = Instant::now();
        let image = ImageLoader::from_bytes(bytes)?;
        Self::process_image(image, options, start_time)
    }

    /// 处理base64图像（JSON上传）
    pub fn process_base64(base64_data: &str, options: &ClassifyOptions) -> Result<Classification> {
        let start_time = Instant::now();
        let image = ImageLoader::from_base64(base64_data)?;
        Self::process_image(image, options, start_time)
    }

    /// 核心流水线
    fn process_image(
        image: DynamicImage,
        options: &ClassifyOptions,
        start_time: Instant,
    ) -> Result<Classification> {
        let classifier = get_classifier()?;
        let labels = get_labels()?;
        let config = get_config()?;

        let input = ImagePreprocessor::to_input_tensor(&image, config.target_size());
        let probabilities = classifier.predict(input)?;

        let mut result = interpret(&probabilities, &labels, options.effective_top_k())?;
        result.processing_time = start_time.elapsed().as_secs_f32();

        tracing::info!(
            "Classification completed: label={}, confidence={:.2}%, tier={}, time={:.3}s",
            result.label,
            result.confidence,
            result.tier.as_str(),
            result.processing_time
        );

        Ok(result)
    }
}
