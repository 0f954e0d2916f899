use crate::{Result, RipenessError};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器绑定地址
    pub bind_addr: String,

    /// 模型文件目录
    pub model_dir: PathBuf,

    /// 工作线程数量
    pub workers: usize,

    /// 开发模式
    pub dev_mode: bool,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,

    /// 服务器配置
    pub server_config: ServerConfig,

    /// 模型输入约定
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别
    pub optimization_level: i32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 请求超时时间（秒）
    pub request_timeout: u64,

    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

/// 每个部署的模型实例固定一套输入约定：两个原始模型分别使用
/// 150x150 和 224x224，标签集也不同，所以分辨率走配置、标签走
/// 模型目录里的 labels.txt，不在代码里写死。
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub input_width: u32,
    pub input_height: u32,
}

impl Config {
    pub fn new(
        bind_addr: String,
        model_dir: String,
        workers: Option<usize>,
        input_size: u32,
        dev_mode: bool,
    ) -> Result<Self> {
        if input_size == 0 {
            return Err(RipenessError::Config(
                "input size must be greater than zero".to_string(),
            ));
        }

        let cpu_cores = num_cpus::get();
        let workers = workers.unwrap_or(cpu_cores);

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1),
            optimization_level: 3,
        };

        let server_config = ServerConfig {
            request_timeout: if dev_mode { 300 } else { 60 },
            max_request_size: 20 * 1024 * 1024, // 20MB
        };

        let model_config = ModelConfig {
            input_width: input_size,
            input_height: input_size,
        };

        Ok(Self {
            bind_addr,
            model_dir: PathBuf::from(model_dir),
            workers,
            dev_mode,
            onnx_config,
            server_config,
            model_config,
        })
    }

    /// 获取分类模型路径
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join("fruit_ripeness.onnx")
    }

    /// 获取标签文件路径（与模型放在一起，顺序即模型输出顺序）
    pub fn labels_path(&self) -> PathBuf {
        self.model_dir.join("labels.txt")
    }

    /// 模型输入分辨率 (宽, 高)
    pub fn target_size(&self) -> (u32, u32) {
        (self.model_config.input_width, self.model_config.input_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_live_under_model_dir() {
        let config = Config::new(
            "127.0.0.1:5005".to_string(),
            "models".to_string(),
            None,
            224,
            false,
        )
        .unwrap();

        assert_eq!(config.model_path(), PathBuf::from("models/fruit_ripeness.onnx"));
        assert_eq!(config.labels_path(), PathBuf::from("models/labels.txt"));
        assert_eq!(config.target_size(), (224, 224));
    }

    #[test]
    fn explicit_worker_count_is_kept() {
        let config = Config::new(
            "127.0.0.1:5005".to_string(),
            "models".to_string(),
            Some(3),
            224,
            false,
        )
        .unwrap();
        // 这个值直接决定HTTP运行时的线程数
        assert_eq!(config.workers, 3);

        let defaulted = Config::new(
            "127.0.0.1:5005".to_string(),
            "models".to_string(),
            None,
            224,
            false,
        )
        .unwrap();
        assert!(defaulted.workers >= 1);
    }

    #[test]
    fn zero_input_size_is_rejected() {
        let result = Config::new(
            "127.0.0.1:5005".to_string(),
            "models".to_string(),
            None,
            0,
            false,
        );
        assert!(matches!(result, Err(RipenessError::Config(_))));
    }
}
