//! Closed vocabularies shared by filters, aggregations and exports.

use serde_json::Value;

/// Field names accepted as keys of `STANDARD` filter conditions.
pub const STANDARD_FIELDS: &[&str] = &[
    "$submissionId",
    "$owner",
    "$status",
    "$lastUpdatedAt",
    "$lastModifiedAt",
    "$createdAt",
    "$updatedAt",
    "$state",
];

/// Returns true if `key` is one of the platform's standard submission fields.
pub fn is_standard_field(key: &str) -> bool {
    STANDARD_FIELDS.contains(&key)
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declares a fieldless enum whose variants map one-to-one onto wire strings.
///
/// Generates `ALL`, `as_str`, `parse`, `expected`, `Display`, `FromStr`
/// (failing with [`ValidationError::UnknownValue`]) and string-based serde
/// impls that reject unknown values.
///
/// [`ValidationError::UnknownValue`]: crate::error::ValidationError::UnknownValue
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($what:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Parse an exact wire string. Returns `None` for unknown values.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Comma-separated list of accepted wire strings.
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s.trim()).ok_or_else(|| $crate::error::ValidationError::UnknownValue {
                    what: $what,
                    value: s.to_string(),
                    expected: Self::expected(),
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).ok_or_else(|| {
                    ::serde::de::Error::custom(format!(
                        "invalid {} '{}': expected one of {}",
                        $what,
                        s,
                        Self::expected()
                    ))
                })
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Comparison applied by a filter condition.
    pub enum FilterOperator ("operator") {
        Contains => "CONTAINS",
        NotIn => "NOT_IN",
        Eq => "EQ",
        Neq => "NEQ",
        Empty => "EMPTY",
        NonEmpty => "NON_EMPTY",
        StartsWith => "STARTS_WITH",
        Between => "BETWEEN",
        Gt => "GT",
        Lt => "LT",
        Gte => "GTE",
        Lte => "LTE",
    }
}

impl FilterOperator {
    /// Operators that test for presence and must carry an empty value.
    pub fn expects_empty_value(&self) -> bool {
        matches!(self, FilterOperator::Empty | FilterOperator::NonEmpty)
    }
}

wire_enum! {
    /// How the conditions of a query are combined.
    pub enum LogicalOperator ("logical operator") {
        And => "AND",
        Or => "OR",
    }
}

impl Default for LogicalOperator {
    fn default() -> Self {
        LogicalOperator::And
    }
}

wire_enum! {
    /// Whether a filter key names a standard or an app-defined field.
    pub enum FilterKeyType ("filterKeyType") {
        Standard => "STANDARD",
        Custom => "CUSTOM",
    }
}

wire_enum! {
    /// Whether an aggregation dimension names a standard or an app-defined field.
    pub enum DimensionType ("dimension type") {
        Standard => "STANDARD",
        Custom => "CUSTOM",
    }
}

wire_enum! {
    /// Aggregation computed over a metric operand.
    pub enum AggregationType ("aggregation type") {
        Count => "count",
        Sum => "sum",
        Average => "average",
        Minimum => "minimum",
        Maximum => "maximum",
        Unique => "unique",
    }
}

wire_enum! {
    pub enum SortDirection ("sort direction") {
        Asc => "asc",
        Desc => "desc",
    }
}

wire_enum! {
    /// File format for submission exports.
    pub enum ExportFormat ("export format") {
        Excel => "Excel",
        Csv => "Csv",
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Excel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    #[test]
    fn filter_operator_has_twelve_members() {
        assert_eq!(FilterOperator::ALL.len(), 12);
        assert_eq!(FilterOperator::parse("NOT_IN"), Some(FilterOperator::NotIn));
        assert_eq!(FilterOperator::parse("not_in"), None);
        assert_eq!(FilterOperator::parse(""), None);
    }

    #[test]
    fn presence_operators_expect_empty_value() {
        assert!(FilterOperator::Empty.expects_empty_value());
        assert!(FilterOperator::NonEmpty.expects_empty_value());
        assert!(!FilterOperator::Eq.expects_empty_value());
    }

    #[test]
    fn from_str_trims_and_reports_expected() {
        assert_eq!(" OR ".parse::<LogicalOperator>(), Ok(LogicalOperator::Or));

        let err = "XOR".parse::<LogicalOperator>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownValue {
                what: "logical operator",
                value: "XOR".into(),
                expected: "AND, OR".into(),
            }
        );
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_value(AggregationType::Average).unwrap(), json!("average"));
        let parsed: DimensionType = serde_json::from_value(json!("CUSTOM")).unwrap();
        assert_eq!(parsed, DimensionType::Custom);
        assert!(serde_json::from_value::<DimensionType>(json!("custom")).is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(LogicalOperator::default(), LogicalOperator::And);
        assert_eq!(ExportFormat::default(), ExportFormat::Excel);
    }

    #[test]
    fn standard_field_membership() {
        assert_eq!(STANDARD_FIELDS.len(), 8);
        assert!(is_standard_field("$status"));
        assert!(!is_standard_field("status"));
        assert!(!is_standard_field("customField1"));
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
