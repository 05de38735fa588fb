//! Regression Tree - CART on boosting gradients
//!
//! Splits maximise the Friedman MSE improvement `nL * nR / n * (meanL - meanR)^2`
//! on the residuals. Leaves hold a single Newton step `sum(r) / sum(h)`.
//!
//! Nodes live in a flat vector; children are referenced by index.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Splits improving less than this are not taken
const MIN_IMPROVEMENT: f64 = 1e-12;

/// Hessian sums below this give a zero leaf
const MIN_HESSIAN: f64 = 1e-150;

// ============================================================================
// TYPES
// ============================================================================

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

/// Gradient statistics the tree is fitted against
pub struct Gradients<'a> {
    pub residuals: &'a [f64],
    pub hessians: &'a [f64],
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    improvement: f64,
}

// ============================================================================
// FITTING
// ============================================================================

struct Builder<'a> {
    x: ArrayView2<'a, f64>,
    grads: Gradients<'a>,
    params: TreeParams,
    nodes: Vec<Node>,
    goes_left: Vec<bool>,
}

impl<'a> Builder<'a> {
    fn leaf_value(&self, rows: &[usize]) -> f64 {
        let numerator: f64 = rows.iter().map(|&i| self.grads.residuals[i]).sum();
        let denominator: f64 = rows.iter().map(|&i| self.grads.hessians[i]).sum();

        if denominator.abs() < MIN_HESSIAN {
            0.0
        } else {
            numerator / denominator
        }
    }

    fn push_leaf(&mut self, rows: &[usize]) -> usize {
        let value = self.leaf_value(rows);
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }

    fn find_split(&self, sorted: &[Vec<usize>], rng: &mut StdRng) -> Option<BestSplit> {
        let n = sorted[0].len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = sorted[0].iter().map(|&i| self.grads.residuals[i]).sum();

        let mut features: Vec<usize> = (0..sorted.len()).collect();
        features.shuffle(rng);

        let mut best: Option<BestSplit> = None;

        for &feature in &features {
            let rows = &sorted[feature];
            let mut left_sum = 0.0;

            for k in 1..n {
                left_sum += self.grads.residuals[rows[k - 1]];

                if k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let lo = self.x[[rows[k - 1], feature]];
                let hi = self.x[[rows[k], feature]];
                if lo >= hi {
                    continue;
                }

                let nl = k as f64;
                let nr = (n - k) as f64;
                let diff = left_sum / nl - (total - left_sum) / nr;
                let improvement = nl * nr * diff * diff / (nl + nr);

                let better = match &best {
                    Some(b) => improvement > b.improvement,
                    None => improvement > MIN_IMPROVEMENT,
                };
                if better {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(BestSplit {
                        feature,
                        threshold: if mid >= hi { lo } else { mid },
                        improvement,
                    });
                }
            }
        }

        best
    }

    /// Grow a subtree from per-feature sorted row lists; returns its node index
    fn grow(&mut self, sorted: Vec<Vec<usize>>, depth: usize, rng: &mut StdRng) -> usize {
        let n = sorted[0].len();

        if depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf.max(1)
        {
            return self.push_leaf(&sorted[0]);
        }

        let Some(split) = self.find_split(&sorted, rng) else {
            return self.push_leaf(&sorted[0]);
        };

        for &i in &sorted[0] {
            self.goes_left[i] = self.x[[i, split.feature]] <= split.threshold;
        }

        let (left, right): (Vec<Vec<usize>>, Vec<Vec<usize>>) = sorted
            .into_iter()
            .map(|rows| rows.into_iter().partition(|&i| self.goes_left[i]))
            .unzip();

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });

        let left_index = self.grow(left, depth + 1, rng);
        let right_index = self.grow(right, depth + 1, rng);

        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_index,
            right: right_index,
        };

        index
    }
}

impl RegressionTree {
    /// Fit a tree to the gradients of every row of `x`
    pub fn fit(x: ArrayView2<'_, f64>, grads: Gradients<'_>, params: TreeParams, rng: &mut StdRng) -> Self {
        let (rows, features) = x.dim();
        debug_assert_eq!(grads.residuals.len(), rows);
        debug_assert_eq!(grads.hessians.len(), rows);

        if rows == 0 || features == 0 {
            return Self { nodes: vec![Node::Leaf { value: 0.0 }] };
        }

        let sorted: Vec<Vec<usize>> = (0..features)
            .map(|f| {
                let mut order: Vec<usize> = (0..rows).collect();
                order.sort_by(|&a, &b| x[[a, f]].total_cmp(&x[[b, f]]));
                order
            })
            .collect();

        let mut builder = Builder {
            x: x.reborrow(),
            grads,
            params,
            nodes: Vec::new(),
            goes_left: vec![false; rows],
        };
        builder.grow(sorted, 0, rng);

        Self { nodes: builder.nodes }
    }

    /// Leaf value for one encoded row. Missing trailing features read as 0.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Split { feature, threshold, left, right }) => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { value }) => return *value,
                None => return 0.0,
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}
