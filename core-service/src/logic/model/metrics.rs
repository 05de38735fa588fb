//! Training metrics, computed on the fitted data after training

use serde::{Deserialize, Serialize};

use super::risk::decide;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub dataset_size: usize,
    pub fraud_cases: usize,
    pub non_fraud_cases: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// `None` when only one class is present
    pub roc_auc: Option<f64>,
}

impl TrainingMetrics {
    /// Metrics of probabilities against 0/1 labels at the decision threshold
    pub fn compute(labels: &[u8], probabilities: &[f64]) -> Self {
        let (mut tp, mut fp, mut tn, mut r#fn) = (0usize, 0usize, 0usize, 0usize);

        for (&label, &p) in labels.iter().zip(probabilities) {
            match (decide(p), label == 1) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, false) => tn += 1,
                (false, true) => r#fn += 1,
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        let total = tp + fp + tn + r#fn;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + r#fn);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            dataset_size: total,
            fraud_cases: tp + r#fn,
            non_fraud_cases: tn + fp,
            accuracy: ratio(tp + tn, total),
            precision,
            recall,
            f1_score,
            roc_auc: roc_auc(labels, probabilities),
        }
    }
}

/// Area under the ROC curve via the rank-sum statistic; ties share ranks
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> Option<f64> {
    let n = labels.len().min(scores.len());
    let positives = labels[..n].iter().filter(|&&l| l == 1).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }
        // 1-based average rank of the tie group
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &i in &order[start..=end] {
            if labels[i] == 1 {
                positive_rank_sum += rank;
            }
        }
        start = end + 1;
    }

    let p = positives as f64;
    let u = positive_rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_metrics() {
        let labels = [1, 1, 0, 0, 1];
        let probs = [0.9, 0.3, 0.6, 0.1, 0.8];
        let m = TrainingMetrics::compute(&labels, &probs);

        assert_eq!(m.dataset_size, 5);
        assert_eq!(m.fraud_cases, 3);
        assert_eq!(m.non_fraud_cases, 2);
        assert!((m.accuracy - 0.6).abs() < 1e-12);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1_score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_perfect_and_random() {
        assert_eq!(roc_auc(&[0, 0, 1, 1], &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&[0, 0, 1, 1], &[0.9, 0.8, 0.2, 0.1]), Some(0.0));
        assert_eq!(roc_auc(&[0, 1, 0, 1], &[0.5, 0.5, 0.5, 0.5]), Some(0.5));
    }

    #[test]
    fn test_roc_auc_single_class() {
        assert_eq!(roc_auc(&[1, 1], &[0.2, 0.7]), None);
        assert!(TrainingMetrics::compute(&[0, 0], &[0.1, 0.2]).roc_auc.is_none());
    }

    #[test]
    fn test_no_positive_predictions() {
        let m = TrainingMetrics::compute(&[1, 0], &[0.1, 0.2]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.f1_score, 0.0);
    }
}
