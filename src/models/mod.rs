pub mod classifier;
pub mod manager;

pub use classifier::RipenessClassifier;
pub use manager::{ModelManager, ModelStats};

// Re-export convenience functions from manager
pub use manager::{get_classifier, get_config, get_labels, get_model_stats, health_check};
