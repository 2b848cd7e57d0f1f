use serde::{Deserialize, Serialize};

/// Training-time label encoder for one feature.
///
/// Classes are kept sorted; a category encodes to its index. The list is only
/// ever produced by [`FallbackEncoder::fit`] during training or restored from
/// an artifact with [`FallbackEncoder::from_classes`], and is read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FallbackEncoder {
    classes: Vec<String>,
}

impl FallbackEncoder {
    /// Sorted, de-duplicated classes observed in the training column.
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: sorted_classes(values),
        }
    }

    pub fn from_classes(classes: Vec<String>) -> Result<Self, EncoderError> {
        check_sorted(&classes)?;
        Ok(Self { classes })
    }

    pub fn transform(&self, value: &str) -> Option<i64> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
            .map(|index| index as i64)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl<'de> Deserialize<'de> for FallbackEncoder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let classes = Vec::<String>::deserialize(deserializer)?;
        Self::from_classes(classes).map_err(serde::de::Error::custom)
    }
}

/// Maps predicted class ids back to product names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetEncoder {
    classes: Vec<String>,
}

impl TargetEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: sorted_classes(values),
        }
    }

    pub fn from_classes(classes: Vec<String>) -> Result<Self, EncoderError> {
        if classes.is_empty() {
            return Err(EncoderError::NoClasses);
        }
        check_sorted(&classes)?;
        Ok(Self { classes })
    }

    pub fn decode(&self, class_id: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(class_id)
            .map(String::as_str)
            .ok_or(EncoderError::UnknownClass {
                class_id,
                classes: self.classes.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<'de> Deserialize<'de> for TargetEncoder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let classes = Vec::<String>::deserialize(deserializer)?;
        Self::from_classes(classes).map_err(serde::de::Error::custom)
    }
}

fn sorted_classes<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
    classes.sort();
    classes.dedup();
    classes
}

fn check_sorted(classes: &[String]) -> Result<(), EncoderError> {
    match classes.windows(2).find(|pair| pair[0] >= pair[1]) {
        Some(pair) => Err(EncoderError::UnsortedClasses {
            previous: pair[0].clone(),
            next: pair[1].clone(),
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderError {
    #[error("encoder classes must be strictly sorted, found '{previous}' before '{next}'")]
    UnsortedClasses { previous: String, next: String },
    #[error("target encoder has no classes")]
    NoClasses,
    #[error("class id {class_id} is outside the {classes} known products")]
    UnknownClass { class_id: usize, classes: usize },
}
