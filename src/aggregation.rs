//! Grouping dimensions and metrics for submission aggregation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::types::{AggregationType, DimensionType, SortDirection};

/// A field submissions are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationDimension {
    pub key: String,
    #[serde(rename = "type")]
    pub dimension_type: DimensionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
}

impl AggregationDimension {
    pub fn new(key: &str, dimension_type: DimensionType) -> Self {
        Self {
            key: key.trim().to_string(),
            dimension_type,
            sort_direction: None,
        }
    }

    pub fn sorted(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::EmptyValue {
                what: "Dimension key",
            });
        }
        Ok(())
    }

    pub fn to_wire(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("fieldName".into(), json!(self.key.trim()));
        obj.insert("dimensionType".into(), json!(self.dimension_type.as_str()));
        if let Some(direction) = self.sort_direction {
            obj.insert("sortDirection".into(), json!(direction.as_str()));
        }
        Value::Object(obj)
    }
}

/// A value computed per group.
///
/// `count` needs no operand; every other aggregation applies to `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationMetric {
    pub aggregation_type: AggregationType,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type", default = "default_metric_type")]
    pub dimension_type: DimensionType,
}

fn default_metric_type() -> DimensionType {
    DimensionType::Custom
}

impl AggregationMetric {
    pub fn count() -> Self {
        Self {
            aggregation_type: AggregationType::Count,
            key: None,
            dimension_type: DimensionType::Custom,
        }
    }

    pub fn over(
        aggregation_type: AggregationType,
        key: &str,
        dimension_type: DimensionType,
    ) -> Self {
        Self {
            aggregation_type,
            key: Some(key.trim().to_string()),
            dimension_type,
        }
    }

    fn operand(&self) -> Option<&str> {
        self.key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.aggregation_type != AggregationType::Count && self.operand().is_none() {
            return Err(ValidationError::EmptyValue {
                what: "Metric key",
            });
        }
        Ok(())
    }

    pub fn to_wire(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(self.aggregation_type.as_str()));
        if let Some(key) = self.operand() {
            obj.insert(
                "operand".into(),
                json!({
                    "fieldName": key,
                    "dimensionType": self.dimension_type.as_str(),
                }),
            );
        }
        Value::Object(obj)
    }
}
