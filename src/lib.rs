pub mod classify;
pub mod config;
pub mod image;
pub mod labels;
pub mod models;
pub mod utils;
pub mod web;

// 重新导出主要类型
pub use classify::Classification;
pub use config::Config;
pub use labels::LabelSet;
pub use utils::error::RipenessError;

pub type Result<T> = std::result::Result<T, RipenessError>;
