//! Answer-to-integer encoding shared by training and inference.
//!
//! Lookup order per feature: the static [`EncodingTable`], then the feature's
//! training-time [`FallbackEncoder`], then [`UNSEEN_CATEGORY_CODE`].

mod fallback;
mod table;

pub use fallback::{EncoderError, FallbackEncoder, TargetEncoder};
pub use table::{EncodingTable, FeatureCategories};

use std::collections::BTreeMap;

use metrics::counter;
use tracing::warn;

/// Code substituted for answers neither table knows about.
pub const UNSEEN_CATEGORY_CODE: i64 = 0;

/// Encoded questionnaire row, in the model's feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    features: Vec<(String, i64)>,
}

impl EncodedRow {
    pub fn get(&self, feature: &str) -> Option<i64> {
        self.features
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, code)| *code)
    }

    pub fn values(&self) -> Vec<f64> {
        self.features.iter().map(|(_, code)| *code as f64).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Borrowing view over the encoder state held by a loaded model.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalEncoder<'a> {
    table: EncodingTable,
    fallbacks: &'a BTreeMap<String, FallbackEncoder>,
}

impl<'a> CategoricalEncoder<'a> {
    pub fn new(table: EncodingTable, fallbacks: &'a BTreeMap<String, FallbackEncoder>) -> Self {
        Self { table, fallbacks }
    }

    /// Encodes `(feature, answer)` pairs in the order given. Never fails.
    pub fn encode<'r, I>(&self, row: I) -> EncodedRow
    where
        I: IntoIterator<Item = (&'r str, &'r str)>,
    {
        let features = row
            .into_iter()
            .map(|(feature, answer)| (feature.to_string(), self.encode_value(feature, answer)))
            .collect();
        EncodedRow { features }
    }

    pub fn encode_value(&self, feature: &str, answer: &str) -> i64 {
        if let Some(code) = self.table.code(feature, answer) {
            return code;
        }

        if let Some(code) = self
            .fallbacks
            .get(feature)
            .and_then(|encoder| encoder.transform(answer))
        {
            return code;
        }

        counter!("encoder_unseen_category_total", "feature" => feature.to_string()).increment(1);
        warn!(feature, answer, "unseen category encoded as default");
        UNSEEN_CATEGORY_CODE
    }
}
