use crate::{Result, RipenessError};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// 成熟度状态（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RipenessState {
    Unripe,
    Ripe,
    Overripe,
    Rotten,
}

impl RipenessState {
    /// 从标签的状态部分解析，无法识别时返回None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unripe" | "green" => Some(RipenessState::Unripe),
            "ripe" | "optimal" => Some(RipenessState::Ripe),
            "overripe" => Some(RipenessState::Overripe),
            "rotten" | "spoiled" => Some(RipenessState::Rotten),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RipenessState::Unripe => "unripe",
            RipenessState::Ripe => "ripe",
            RipenessState::Overripe => "overripe",
            RipenessState::Rotten => "rotten",
        }
    }

    /// 状态建议：固定查表，不是模型学出来的行为
    pub fn advisory(&self) -> &'static str {
        match self {
            RipenessState::Unripe => "Not ripe yet - wait a few days before eating.",
            RipenessState::Ripe => "At its best - consume now.",
            RipenessState::Overripe => "Past its peak - use soon, e.g. for baking.",
            RipenessState::Rotten => "Spoiled - discard, do not consume.",
        }
    }
}

impl fmt::Display for RipenessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 显示用名称："banana_ripe" -> "Banana Ripe"
pub fn display_name(raw: &str) -> String {
    raw.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 一个分类标签：水果名 + 成熟度状态，或者单水果部署里只有状态
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    /// 标签文件里的原始名称，如 "banana_ripe"
    pub name: String,
    /// 水果标识（单水果部署为None）
    pub fruit: Option<String>,
    /// 成熟度状态（无法识别时为None）
    pub state: Option<RipenessState>,
}

impl Label {
    fn parse(raw: &str) -> Self {
        // 纯状态标签，如 "ripe"
        if let Some(state) = RipenessState::parse(raw) {
            return Label {
                name: raw.to_string(),
                fruit: None,
                state: Some(state),
            };
        }

        // fruit_state 形式，如 "banana_ripe"
        if let Some((fruit, state_part)) = raw.rsplit_once('_') {
            if let Some(state) = RipenessState::parse(state_part) {
                return Label {
                    name: raw.to_string(),
                    fruit: Some(fruit.to_string()),
                    state: Some(state),
                };
            }
        }

        // 未知分类法：保留原始名称，不做解释
        Label {
            name: raw.to_string(),
            fruit: None,
            state: None,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

/// 标签枚举，启动时加载一次，顺序与模型输出下标严格对齐
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// 从标签文件内容解析：一行一个标签，跳过空行和#注释
    pub fn from_content(content: &str) -> Result<Self> {
        let mut labels: Vec<Label> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if labels.iter().any(|existing| existing.name == trimmed) {
                return Err(RipenessError::LabelFile(format!(
                    "duplicate label '{}'",
                    trimmed
                )));
            }

            labels.push(Label::parse(trimmed));
        }

        if labels.is_empty() {
            return Err(RipenessError::LabelFile(
                "label file contains no labels".to_string(),
            ));
        }

        Ok(LabelSet { labels })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RipenessError::LabelFile(format!(
                "cannot read label file {}: {}",
                path.display(),
                e
            ))
        })?;

        let set = Self::from_content(&content)?;
        tracing::info!("Loaded {} labels from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.labels.iter().map(|label| label.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fruit_and_state() {
        let label = Label::parse("banana_ripe");
        assert_eq!(label.fruit.as_deref(), Some("banana"));
        assert_eq!(label.state, Some(RipenessState::Ripe));
    }

    #[test]
    fn parses_bare_state() {
        let label = Label::parse("overripe");
        assert_eq!(label.fruit, None);
        assert_eq!(label.state, Some(RipenessState::Overripe));
    }

    #[test]
    fn unknown_taxonomy_keeps_raw_name() {
        let label = Label::parse("mystery_category");
        assert_eq!(label.name, "mystery_category");
        assert_eq!(label.fruit, None);
        assert_eq!(label.state, None);
    }

    #[test]
    fn label_file_order_is_preserved() {
        let set = LabelSet::from_content("unripe\nripe\nrotten\noverripe\n").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(0).unwrap().name, "unripe");
        assert_eq!(set.get(2).unwrap().name, "rotten");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let set = LabelSet::from_content("# taxonomy v2\n\nbanana_ripe\n\nbanana_rotten\n").unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = LabelSet::from_content("ripe\nripe\n");
        assert!(matches!(result, Err(RipenessError::LabelFile(_))));
    }

    #[test]
    fn empty_file_is_rejected() {
        let result = LabelSet::from_content("# nothing here\n");
        assert!(matches!(result, Err(RipenessError::LabelFile(_))));
    }

    #[test]
    fn display_name_capitalizes_parts() {
        assert_eq!(display_name("banana_ripe"), "Banana Ripe");
        assert_eq!(display_name("rotten"), "Rotten");
    }

    #[test]
    fn state_advisories_are_fixed() {
        assert!(RipenessState::Unripe.advisory().contains("wait"));
        assert!(RipenessState::Ripe.advisory().contains("consume now"));
        assert!(RipenessState::Rotten.advisory().contains("discard"));
    }
}
