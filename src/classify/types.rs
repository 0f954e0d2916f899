use crate::labels::RipenessState;
use serde::{Deserialize, Serialize};

/// 排名默认取前5个标签（标签不足5个时取全部）
pub const DEFAULT_TOP_K: usize = 5;

/// 分类处理选项
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyOptions {
    /// 排名返回的标签数量
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            top_k: Some(DEFAULT_TOP_K),
        }
    }
}

impl ClassifyOptions {
    pub fn effective_top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K).max(1)
    }
}

/// 置信度档位，边界为严格大于：90.0落在high档，50.0落在low档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// 百分比 (0-100) -> 档位
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage > 90.0 {
            ConfidenceTier::VeryHigh
        } else if percentage > 70.0 {
            ConfidenceTier::High
        } else if percentage > 50.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "very high",
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }

    /// 每个档位固定一句可靠性说明
    pub fn advisory(&self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "The model is very sure about this prediction.",
            ConfidenceTier::High => "The model has good confidence in this prediction.",
            ConfidenceTier::Medium => "The model has doubts, consider checking manually.",
            ConfidenceTier::Low => "The model is not sure, the image may not be clear.",
        }
    }
}

/// 排名里的一项
#[derive(Debug, Clone, Serialize)]
pub struct RankedLabel {
    /// 原始标签名
    pub label: String,
    /// 显示用名称
    pub display: String,
    /// 概率 (0.0 - 1.0)
    pub probability: f32,
}

/// 一次分类的完整结果：每次请求产生一个新值，流水线本身无状态
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// 胜出标签（原始名）
    pub label: String,
    /// 显示用名称
    pub display: String,
    /// 水果标识（单水果部署为None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fruit: Option<String>,
    /// 成熟度状态
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<RipenessState>,
    /// 置信度百分比 (0-100)
    pub confidence: f32,
    /// 置信度档位
    pub tier: ConfidenceTier,
    /// 档位说明
    pub tier_advisory: String,
    /// 状态建议（标签没有可识别的状态时为None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
    /// top-k排名，按概率降序
    pub ranking: Vec<RankedLabel>,
    /// 完整概率分布，与标签顺序对齐
    pub probabilities: Vec<f32>,
    /// 处理耗时（秒）
    pub processing_time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_mapping_is_a_pure_function() {
        assert_eq!(ConfidenceTier::from_percentage(95.0), ConfidenceTier::VeryHigh);
        assert_eq!(ConfidenceTier::from_percentage(75.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_percentage(55.0), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_percentage(10.0), ConfidenceTier::Low);
    }

    #[test]
    fn tier_boundaries_are_exclusive() {
        // 正好90.0落在high档，不是very high
        assert_eq!(ConfidenceTier::from_percentage(90.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_percentage(70.0), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_percentage(50.0), ConfidenceTier::Low);
    }

    #[test]
    fn top_k_defaults_to_five() {
        let options = ClassifyOptions::default();
        assert_eq!(options.effective_top_k(), 5);

        let unset = ClassifyOptions { top_k: None };
        assert_eq!(unset.effective_top_k(), 5);
    }
}
