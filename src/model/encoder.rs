//! Label encoder: each class maps to its position in the trained class list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CategoricalEncoder, EncodeError};

/// On-disk form: `{ "classes": ["A", "B", ...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoderSpec {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LabelEncoder {
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Build from the trained class list. Duplicate classes are rejected.
    pub fn from_classes<I, S>(classes: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes = HashMap::new();
        for (position, class) in classes.into_iter().enumerate() {
            let class = class.into();
            let code = u32::try_from(position)
                .map_err(|_| "encoder vocabulary exceeds u32 range".to_string())?;
            if codes.insert(class.clone(), code).is_some() {
                return Err(format!("duplicate encoder class '{class}'"));
            }
        }
        Ok(Self { codes })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl TryFrom<LabelEncoderSpec> for LabelEncoder {
    type Error = String;

    fn try_from(spec: LabelEncoderSpec) -> Result<Self, Self::Error> {
        Self::from_classes(spec.classes)
    }
}

impl CategoricalEncoder for LabelEncoder {
    fn encode(&self, category: &str) -> Result<u32, EncodeError> {
        self.codes
            .get(category)
            .copied()
            .ok_or_else(|| EncodeError::UnknownCategory(category.to_string()))
    }

    fn contains(&self, category: &str) -> bool {
        self.codes.contains_key(category)
    }
}
