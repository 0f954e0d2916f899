use crate::classify::types::{Classification, ConfidenceTier, RankedLabel};
use crate::utils::error::RipenessError;
use crate::{LabelSet, Result};

/// 纯函数：概率分布 + 标签集 -> 解读结果。
/// processing_time由调用方补上。
pub fn interpret(probabilities: &[f32], labels: &LabelSet, top_k: usize) -> Result<Classification> {
    if probabilities.len() != labels.len() {
        return Err(RipenessError::ModelMismatch {
            expected: labels.len(),
            actual: probabilities.len(),
        });
    }
    if probabilities.is_empty() {
        return Err(RipenessError::Inference(
            "empty probability vector".to_string(),
        ));
    }

    let winner = argmax(probabilities);
    let label = labels
        .get(winner)
        .ok_or_else(|| RipenessError::Internal(format!("label index {} out of range", winner)))?;

    let confidence = probabilities[winner] * 100.0;
    let tier = ConfidenceTier::from_percentage(confidence);

    let ranking = top_k_indices(probabilities, top_k)
        .into_iter()
        .map(|index| {
            let ranked = labels.get(index).expect("index from same vector");
            RankedLabel {
                label: ranked.name.clone(),
                display: ranked.display_name(),
                probability: probabilities[index],
            }
        })
        .collect();

    Ok(Classification {
        label: label.name.clone(),
        display: label.display_name(),
        fruit: label.fruit.clone(),
        state: label.state,
        confidence,
        tier,
        tier_advisory: tier.advisory().to_string(),
        advisory: label.state.map(|state| state.advisory().to_string()),
        ranking,
        probabilities: probabilities.to_vec(),
        processing_time: 0.0,
    })
}

/// arg-max，严格大于比较，平局取最低下标
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = index;
        }
    }
    best
}

/// 按概率降序的前k个下标，稳定排序，平局保持原始下标顺序
fn top_k_indices(values: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(k.min(values.len()));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::RipenessState;

    fn banana_labels() -> LabelSet {
        LabelSet::from_content("unripe\nripe\nrotten\noverripe\n").unwrap()
    }

    #[test]
    fn argmax_ties_break_to_lowest_index() {
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), 0);
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), 1);
    }

    #[test]
    fn top_k_is_sorted_descending_and_capped() {
        let values = [0.1, 0.4, 0.2, 0.3];
        assert_eq!(top_k_indices(&values, 3), vec![1, 3, 2]);
        // k超过标签数时取全部
        assert_eq!(top_k_indices(&values, 10).len(), 4);
    }

    #[test]
    fn top_k_ties_keep_original_index_order() {
        let values = [0.3, 0.3, 0.4];
        assert_eq!(top_k_indices(&values, 3), vec![2, 0, 1]);
    }

    #[test]
    fn rotten_banana_end_to_end() {
        let labels = banana_labels();
        let result = interpret(&[0.05, 0.05, 0.85, 0.05], &labels, 5).unwrap();

        assert_eq!(result.label, "rotten");
        assert_eq!(format!("{:.2}%", result.confidence), "85.00%");
        assert_eq!(result.tier, ConfidenceTier::High);
        assert_eq!(result.state, Some(RipenessState::Rotten));
        assert!(result.advisory.unwrap().contains("discard"));
        assert_eq!(result.ranking.len(), 4); // min(5, 4个标签)
        assert_eq!(result.ranking[0].label, "rotten");
    }

    #[test]
    fn unripe_maps_to_wait_advisory() {
        let labels = banana_labels();
        let result = interpret(&[0.9, 0.04, 0.03, 0.03], &labels, 5).unwrap();
        assert_eq!(result.state, Some(RipenessState::Unripe));
        assert!(result.advisory.unwrap().contains("wait"));
    }

    #[test]
    fn fruit_state_taxonomy_is_split() {
        let labels = LabelSet::from_content("banana_ripe\nbanana_rotten\nmango_unripe\n").unwrap();
        let result = interpret(&[0.1, 0.2, 0.7], &labels, 5).unwrap();
        assert_eq!(result.fruit.as_deref(), Some("mango"));
        assert_eq!(result.state, Some(RipenessState::Unripe));
        assert_eq!(result.display, "Mango Unripe");
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let labels = banana_labels();
        let result = interpret(&[0.5, 0.5], &labels, 5);
        assert!(matches!(
            result,
            Err(RipenessError::ModelMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn probabilities_are_echoed_in_label_order() {
        let labels = banana_labels();
        let probs = [0.05, 0.05, 0.85, 0.05];
        let result = interpret(&probs, &labels, 2).unwrap();
        assert_eq!(result.probabilities, probs.to_vec());
        assert_eq!(result.ranking.len(), 2);
    }
}
