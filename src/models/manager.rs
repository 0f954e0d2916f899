use crate::models::RipenessClassifier;
use crate::utils::error::RipenessError;
use crate::{Config, LabelSet, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// 全局模型管理器单例：进程生命周期内初始化一次，之后只读共享
pub struct ModelManager {
    classifier: Arc<RipenessClassifier>,
    labels: Arc<LabelSet>,
    config: Config,
}

static MODEL_MANAGER: OnceCell<Arc<ModelManager>> = OnceCell::new();

impl ModelManager {
    /// 初始化全局模型管理器。先读标签再建会话，
    /// 标签数和模型输出的静态不匹配在任何预测发生之前就会报错。
    pub fn init(config: Config) -> Result<()> {
        tracing::info!("Initializing model manager...");

        let labels = Arc::new(LabelSet::load(&config.labels_path())?);
        let classifier = Arc::new(RipenessClassifier::new(&config, labels.len())?);

        let manager = ModelManager {
            classifier,
            labels,
            config,
        };

        MODEL_MANAGER
            .set(Arc::new(manager))
            .map_err(|_| RipenessError::Internal("model manager already initialized".to_string()))?;

        tracing::info!("Model manager initialized successfully");
        Ok(())
    }

    /// 获取全局模型管理器实例
    pub fn instance() -> Result<Arc<ModelManager>> {
        MODEL_MANAGER
            .get()
            .cloned()
            .ok_or_else(|| RipenessError::Internal("model manager not initialized".to_string()))
    }

    pub fn classifier(&self) -> Arc<RipenessClassifier> {
        Arc::clone(&self.classifier)
    }

    pub fn labels(&self) -> Arc<LabelSet> {
        Arc::clone(&self.labels)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 模型健康检查
    pub fn health_check(&self) -> Result<()> {
        tracing::debug!("Performing model health check...");

        check_artifact(&self.config.model_path())?;

        tracing::debug!("Model health check passed");
        Ok(())
    }

    /// 获取模型统计信息
    pub fn get_stats(&self) -> ModelStats {
        ModelStats {
            num_labels: self.labels.len(),
            labels: self.labels.names(),
            input_width: self.config.model_config.input_width,
            input_height: self.config.model_config.input_height,
            intra_threads: self.config.onnx_config.intra_threads,
            optimization_level: self.config.onnx_config.optimization_level,
        }
    }
}

/// 模型统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelStats {
    pub num_labels: usize,
    pub labels: Vec<String>,
    pub input_width: u32,
    pub input_height: u32,
    pub intra_threads: usize,
    pub optimization_level: i32,
}

/// 便捷函数：获取分类器
pub fn get_classifier() -> Result<Arc<RipenessClassifier>> {
    Ok(ModelManager::instance()?.classifier())
}

/// 便捷函数：获取标签集
pub fn get_labels() -> Result<Arc<LabelSet>> {
    Ok(ModelManager::instance()?.labels())
}

/// 便捷函数：获取配置副本
pub fn get_config() -> Result<Config> {
    Ok(ModelManager::instance()?.config().clone())
}

/// 便捷函数：检查模型健康状态
pub fn health_check() -> Result<()> {
    ModelManager::instance()?.health_check()
}

/// 便捷函数：获取模型统计信息
pub fn get_model_stats() -> Result<ModelStats> {
    Ok(ModelManager::instance()?.get_stats())
}

/// 模型工件在进程运行期间被移走也要能报出来
fn check_artifact(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        return Err(RipenessError::ModelLoad(format!(
            "model artifact disappeared: {}",
            path.display()
        )));
    }
    Ok(())
}
