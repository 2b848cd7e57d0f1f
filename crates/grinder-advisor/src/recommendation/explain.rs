//! Turns the decision path of one prediction into ranked, human-readable rules.
//!
//! Every split on the path scores `100 - depth * 10 + samples / 10`: splits near
//! the root and splits backed by many training samples weigh the most. Each
//! feature keeps its best split, the list is ranked by score (path order breaks
//! ties), and the top entries are rendered against the customer's own answers.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::model::{DecisionPath, DecisionTree, NodeDepths, TREE_UNDEFINED};
use super::questionnaire::Answers;

/// Upper bound on rules returned for one prediction.
pub const MAX_RULES: usize = 7;
/// Leading rules reported with [`Importance::High`].
pub const HIGH_IMPORTANCE_RULES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
}

impl Importance {
    fn for_rank(rank: usize) -> Self {
        if rank < HIGH_IMPORTANCE_RULES {
            Importance::High
        } else {
            Importance::Medium
        }
    }
}

/// One answer that drove the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub question: String,
    pub answer: String,
    pub importance: Importance,
}

/// Best-scoring split on the path for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
    pub depth: usize,
    pub samples: u64,
    /// Index of the scored node within the decision path.
    pub position: usize,
}

/// Internal extraction failure; never leaves this module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFault {
    #[error("decision path is empty")]
    EmptyPath,
    #[error("path node {node} is outside the tree")]
    NodeOutOfRange { node: usize },
    #[error("node {node} splits on unknown feature index {feature}")]
    UnknownFeature { node: usize, feature: i64 },
    #[error("node {node} is not connected to the root")]
    MissingDepth { node: usize },
}

pub fn importance_score(depth: usize, samples: u64) -> f64 {
    100.0 - depth as f64 * 10.0 + samples as f64 / 10.0
}

/// Explains predictions made by one tree.
#[derive(Debug, Clone, Copy)]
pub struct RuleExtractor<'a> {
    tree: &'a DecisionTree,
    depths: &'a NodeDepths,
    feature_names: &'a [String],
}

impl<'a> RuleExtractor<'a> {
    pub fn new(tree: &'a DecisionTree, depths: &'a NodeDepths, feature_names: &'a [String]) -> Self {
        Self {
            tree,
            depths,
            feature_names,
        }
    }

    /// Ranked rules for `path`, or the answer-order fallback if the tree
    /// cannot be read along it.
    pub fn extract(&self, path: &DecisionPath, answers: &Answers) -> Vec<Rule> {
        match self.ranked_features(path) {
            Ok(ranked) => render_rules(&ranked, answers),
            Err(fault) => {
                counter!("rule_extraction_fallback_total").increment(1);
                warn!(error = %fault, leaf = path.leaf, "rule extraction failed, using answer order");
                fallback_rules(answers)
            }
        }
    }

    /// One record per feature split on along `path`, best first.
    pub fn ranked_features(
        &self,
        path: &DecisionPath,
    ) -> Result<Vec<FeatureImportance>, ExtractionFault> {
        if path.nodes.is_empty() {
            return Err(ExtractionFault::EmptyPath);
        }

        let mut records: Vec<FeatureImportance> = Vec::new();

        for (position, &node) in path.nodes.iter().enumerate() {
            if node == path.leaf {
                continue;
            }

            let feature = self
                .tree
                .split_feature(node)
                .ok_or(ExtractionFault::NodeOutOfRange { node })?;
            if feature == TREE_UNDEFINED {
                continue;
            }

            let name = usize::try_from(feature)
                .ok()
                .and_then(|index| self.feature_names.get(index))
                .ok_or(ExtractionFault::UnknownFeature { node, feature })?;
            let depth = self
                .depths
                .depth(node)
                .ok_or(ExtractionFault::MissingDepth { node })?;
            let samples = self
                .tree
                .samples(node)
                .ok_or(ExtractionFault::NodeOutOfRange { node })?;
            let score = importance_score(depth, samples);

            match records.iter_mut().find(|record| record.feature == *name) {
                Some(existing) if score > existing.score => {
                    existing.score = score;
                    existing.depth = depth;
                    existing.samples = samples;
                    existing.position = position;
                }
                Some(_) => {}
                None => records.push(FeatureImportance {
                    feature: name.clone(),
                    score,
                    depth,
                    samples,
                    position,
                }),
            }
        }

        records.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        Ok(records)
    }
}

fn render_rules(ranked: &[FeatureImportance], answers: &Answers) -> Vec<Rule> {
    ranked
        .iter()
        .take(MAX_RULES)
        .filter_map(|record| {
            answers
                .get(&record.feature)
                .filter(|answer| !answer.is_empty())
                .map(|answer| (record.feature.as_str(), answer))
        })
        .enumerate()
        .map(|(rank, (question, answer))| Rule {
            question: question.to_string(),
            answer: answer.to_string(),
            importance: Importance::for_rank(rank),
        })
        .collect()
}

/// The first answers in the order given, tiered like extracted rules.
pub fn fallback_rules(answers: &Answers) -> Vec<Rule> {
    answers
        .iter()
        .take(MAX_RULES)
        .enumerate()
        .map(|(rank, (question, answer))| Rule {
            question: question.to_string(),
            answer: answer.to_string(),
            importance: Importance::for_rank(rank),
        })
        .collect()
}
