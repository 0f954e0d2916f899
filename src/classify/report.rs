use crate::classify::Classification;
use crate::Result;
use std::fmt::Write;

const BANNER: &str = "======================================================================";

/// 结果格式化器：批式CLI的多行报告和JSON输出
pub struct ReportFormatter;

impl ReportFormatter {
    /// 人类可读的多行报告
    pub fn format_text(result: &Classification) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "{}", BANNER);
        let _ = writeln!(report, "ANALYSIS RESULT");
        let _ = writeln!(report, "{}", BANNER);
        let _ = writeln!(report, "Prediction: {}", result.display);
        let _ = writeln!(report, "Confidence: {:.2}%", result.confidence);
        let _ = writeln!(
            report,
            "Confidence tier: {} - {}",
            result.tier.as_str(),
            result.tier_advisory
        );
        if let Some(ref advisory) = result.advisory {
            let _ = writeln!(report, "Advisory: {}", advisory);
        }

        let _ = writeln!(report);
        let _ = writeln!(report, "Top {} predictions:", result.ranking.len());
        for (position, ranked) in result.ranking.iter().enumerate() {
            let percentage = ranked.probability * 100.0;
            let _ = writeln!(
                report,
                "{}. {:<25} {:>6.2}% {}",
                position + 1,
                ranked.display,
                percentage,
                Self::bar(percentage)
            );
        }

        let _ = writeln!(report, "{}", BANNER);
        let _ = write!(
            report,
            "Processed in {:.3}s",
            result.processing_time
        );

        report
    }

    /// JSON输出（--format json）
    pub fn format_json(result: &Classification) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    /// 每2%一个方块的简易条形图
    fn bar(percentage: f32) -> String {
        "█".repeat((percentage / 2.0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::interpret;
    use crate::LabelSet;

    fn sample_result() -> Classification {
        let labels = LabelSet::from_content("unripe\nripe\nrotten\noverripe\n").unwrap();
        interpret(&[0.05, 0.05, 0.85, 0.05], &labels, 5).unwrap()
    }

    #[test]
    fn text_report_contains_all_sections() {
        let report = ReportFormatter::format_text(&sample_result());

        assert!(report.contains("ANALYSIS RESULT"));
        assert!(report.contains("Prediction: Rotten"));
        assert!(report.contains("Confidence: 85.00%"));
        assert!(report.contains("Confidence tier: high"));
        assert!(report.contains("discard"));
        assert!(report.contains("Top 4 predictions:"));
        assert!(report.contains("1. Rotten"));
    }

    #[test]
    fn bar_length_tracks_probability() {
        assert_eq!(ReportFormatter::bar(10.0).chars().count(), 5);
        assert_eq!(ReportFormatter::bar(85.0).chars().count(), 42);
        assert_eq!(ReportFormatter::bar(0.5).chars().count(), 0);
    }

    #[test]
    fn json_output_is_valid_and_complete() {
        let json = ReportFormatter::format_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["label"], "rotten");
        assert_eq!(value["tier"], "high");
        assert_eq!(value["ranking"].as_array().unwrap().len(), 4);
    }
}
