//! Submission filter grammar.
//!
//! Filters nest three levels deep:
//!
//! ```json
//! { "queries": [                       // query groups
//!     { "queries": [                   // queries
//!         { "operator": "AND",         // optional, defaults to AND
//!           "conditions": [
//!             { "operator": "EQ", "filterKeyType": "STANDARD",
//!               "key": "$status", "value": "Approved" } ] } ] } ] }
//! ```
//!
//! [`validate_filters`] walks raw JSON top-down and stops at the first
//! violation. [`SubmissionFilters`] is the typed form of a validated tree and
//! serializes back to the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FilterError, ValidationError};
use crate::types::{
    is_standard_field, json_type_name, FilterKeyType, FilterOperator, LogicalOperator,
};

/// Keys every condition object must carry, in the order they are checked.
const CONDITION_FIELDS: &[&str] = &["operator", "filterKeyType", "key", "value"];

/// Validate a raw filter tree.
///
/// # Errors
///
/// Returns the first violated rule as a `FilterError`; nothing past that
/// point is inspected.
pub fn validate_filters(filters: &Value) -> Result<(), FilterError> {
    let root = expect_object(filters, "filters")?;
    let groups = root.get("queries").ok_or(FilterError::MissingQueries)?;
    let groups = expect_array(groups, "queries")?;
    if groups.is_empty() {
        return Err(FilterError::EmptyQueries);
    }

    for group in groups {
        let group = expect_object(group, "query group")?;
        let queries = group
            .get("queries")
            .ok_or(FilterError::GroupMissingQueries)?;
        let queries = expect_array(queries, "query group queries")?;
        if queries.is_empty() {
            return Err(FilterError::EmptyGroupQueries);
        }

        for query in queries {
            let query = expect_object(query, "query")?;
            let conditions = query
                .get("conditions")
                .ok_or(FilterError::MissingConditions)?;
            let conditions = expect_array(conditions, "conditions")?;
            if conditions.is_empty() {
                return Err(FilterError::EmptyConditions);
            }

            if let Some(op) = query.get("operator") {
                if op.as_str().and_then(LogicalOperator::parse).is_none() {
                    return Err(FilterError::InvalidLogicalOperator {
                        value: display_value(op),
                    });
                }
            }

            for condition in conditions {
                validate_condition(condition)?;
            }
        }
    }

    Ok(())
}

/// Validate a single raw condition object.
///
/// # Errors
///
/// Returns a `FilterError` for a missing key, an unknown operator or key
/// type, a blank key, a non-standard key under `STANDARD`, or a value that
/// breaks the operator's emptiness rule.
pub fn validate_condition(condition: &Value) -> Result<(), FilterError> {
    let obj = expect_object(condition, "condition")?;
    for &field in CONDITION_FIELDS {
        if !obj.contains_key(field) {
            return Err(FilterError::ConditionMissingField { field });
        }
    }

    let operator = obj["operator"]
        .as_str()
        .and_then(FilterOperator::parse)
        .ok_or_else(|| FilterError::InvalidOperator {
            value: display_value(&obj["operator"]),
        })?;

    let key_type = obj["filterKeyType"]
        .as_str()
        .and_then(FilterKeyType::parse)
        .ok_or_else(|| FilterError::InvalidFilterKeyType {
            value: display_value(&obj["filterKeyType"]),
        })?;

    let key = expect_str(&obj["key"], "condition key")?;
    // null counts as an empty value
    let value = match &obj["value"] {
        Value::Null => "",
        other => expect_str(other, "condition value")?,
    };

    check_condition(operator, key_type, key, value)
}

/// Rules shared by raw and typed conditions once the enums are known.
fn check_condition(
    operator: FilterOperator,
    key_type: FilterKeyType,
    key: &str,
    value: &str,
) -> Result<(), FilterError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(FilterError::EmptyKey);
    }

    if key_type == FilterKeyType::Standard && !is_standard_field(key) {
        return Err(FilterError::NotStandardField {
            key: key.to_string(),
        });
    }

    let has_value = !value.trim().is_empty();
    if operator.expects_empty_value() {
        if has_value {
            return Err(FilterError::UnexpectedValue {
                operator: operator.to_string(),
            });
        }
    } else if !has_value {
        return Err(FilterError::MissingValue {
            operator: operator.to_string(),
        });
    }

    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, FilterError> {
    value.as_object().ok_or_else(|| FilterError::WrongType {
        path: path.to_string(),
        expected: "an object",
        actual: json_type_name(value),
    })
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, FilterError> {
    value.as_array().ok_or_else(|| FilterError::WrongType {
        path: path.to_string(),
        expected: "a list",
        actual: json_type_name(value),
    })
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, FilterError> {
    value.as_str().ok_or_else(|| FilterError::WrongType {
        path: path.to_string(),
        expected: "a string",
        actual: json_type_name(value),
    })
}

/// Strings are shown bare, everything else as JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single predicate on one submission field.
///
/// Key and value are stored trimmed, whether built with [`Condition::new`]
/// or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCondition")]
pub struct Condition {
    pub operator: FilterOperator,
    pub filter_key_type: FilterKeyType,
    pub key: String,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCondition {
    operator: FilterOperator,
    filter_key_type: FilterKeyType,
    key: String,
    value: Option<String>,
}

impl TryFrom<RawCondition> for Condition {
    type Error = FilterError;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        Condition::new(
            raw.operator,
            raw.filter_key_type,
            &raw.key,
            raw.value.as_deref().unwrap_or_default(),
        )
    }
}

impl Condition {
    /// Build a condition; key and value are trimmed.
    pub fn new(
        operator: FilterOperator,
        filter_key_type: FilterKeyType,
        key: &str,
        value: &str,
    ) -> Result<Self, FilterError> {
        check_condition(operator, filter_key_type, key, value)?;
        Ok(Self {
            operator,
            filter_key_type,
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Conditions combined with a single logical operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOperator>,
}

impl Query {
    pub fn new(conditions: Vec<Condition>, operator: Option<LogicalOperator>) -> Self {
        Self {
            conditions,
            operator,
        }
    }

    /// The combinator in effect; `AND` when none was given.
    pub fn combinator(&self) -> LogicalOperator {
        self.operator.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroup {
    pub queries: Vec<Query>,
}

impl QueryGroup {
    pub fn new(queries: Vec<Query>) -> Self {
        Self { queries }
    }
}

/// A validated filter tree, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFilters {
    pub queries: Vec<QueryGroup>,
}

impl SubmissionFilters {
    /// Assemble a typed tree and validate it.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation, as [`validate_filters`] would.
    pub fn new(queries: Vec<QueryGroup>) -> Result<Self, FilterError> {
        let filters = Self { queries };
        filters.validate()?;
        Ok(filters)
    }

    /// Validate a raw tree and convert it to the typed form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Filter` on a grammar violation.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        validate_filters(value)?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed {
            what: "filters",
            message: e.to_string(),
        })
    }

    /// Re-check the grammar rules that the types alone do not enforce.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.queries.is_empty() {
            return Err(FilterError::EmptyQueries);
        }
        for group in &self.queries {
            if group.queries.is_empty() {
                return Err(FilterError::EmptyGroupQueries);
            }
            for query in &group.queries {
                if query.conditions.is_empty() {
                    return Err(FilterError::EmptyConditions);
                }
                for c in &query.conditions {
                    check_condition(c.operator, c.filter_key_type, &c.key, &c.value)?;
                }
            }
        }
        Ok(())
    }

    /// Wire form.
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
