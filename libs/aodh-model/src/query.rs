//! Simple query items carried by threshold and event rules
//!
//! On the command line a query is written as `field<op>[type::]value`
//! clauses separated by `;`, e.g. `resource_id=abc;cpu_util>=integer::80`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ComparisonOperator;

/// Value type hints accepted by the Aodh API
const VALUE_TYPES: [&str; 5] = ["string", "integer", "float", "boolean", "datetime"];

/// Operator characters that can start an operator token
const OPERATOR_CHARS: [char; 4] = ['<', '>', '=', '!'];

/// One `{field, op, value, type}` query clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryItem {
    pub field: String,
    #[serde(default)]
    pub op: ComparisonOperator,
    pub value: String,
    /// Optional type hint; empty lets the server infer it
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub value_type: String,
}

impl QueryItem {
    pub fn new(field: impl Into<String>, op: ComparisonOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            value_type: String::new(),
        }
    }

    /// Parse a `;`-separated list of clauses, skipping empty segments
    ///
    /// # Examples
    /// ```
    /// use aodh_model::{ComparisonOperator, QueryItem};
    ///
    /// let items = QueryItem::parse_list("resource_id=abc; cpu>=integer::80").unwrap();
    /// assert_eq!(items.len(), 2);
    /// assert_eq!(items[1].op, ComparisonOperator::Ge);
    /// assert_eq!(items[1].value_type, "integer");
    /// ```
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for QueryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.op {
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Gt => ">",
        };
        if self.value_type.is_empty() {
            write!(f, "{}{}{}", self.field, symbol, self.value)
        } else {
            write!(
                f,
                "{}{}{}::{}",
                self.field, symbol, self.value_type, self.value
            )
        }
    }
}

impl std::str::FromStr for QueryItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let start = s
            .find(OPERATOR_CHARS)
            .ok_or_else(|| format!("Malformed query clause '{}': no operator found", s))?;

        let rest = &s[start..];
        let op_len = if rest.len() > 1 && rest.as_bytes()[1] == b'=' {
            2
        } else {
            1
        };
        let symbol = &rest[..op_len];
        let op = ComparisonOperator::from_symbol(symbol)
            .ok_or_else(|| format!("Malformed query clause '{}': bad operator '{}'", s, symbol))?;

        let field = s[..start].trim();
        if field.is_empty() {
            return Err(format!("Malformed query clause '{}': missing field", s));
        }

        let raw_value = rest[op_len..].trim();
        let (value_type, value) = match raw_value.split_once("::") {
            Some((hint, value)) if VALUE_TYPES.contains(&hint) => (hint.to_string(), value),
            Some((hint, _)) => {
                return Err(format!(
                    "Malformed query clause '{}': unknown value type '{}'. Valid types: {}",
                    s,
                    hint,
                    VALUE_TYPES.join(", ")
                ))
            },
            None => (String::new(), raw_value),
        };

        Ok(Self {
            field: field.to_string(),
            op,
            value: value.to_string(),
            value_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_parse_operators() {
        let cases = [
            ("a<1", ComparisonOperator::Lt),
            ("a<=1", ComparisonOperator::Le),
            ("a=1", ComparisonOperator::Eq),
            ("a==1", ComparisonOperator::Eq),
            ("a!=1", ComparisonOperator::Ne),
            ("a>=1", ComparisonOperator::Ge),
            ("a>1", ComparisonOperator::Gt),
        ];
        for (input, expected) in cases {
            let item: QueryItem = input.parse().unwrap();
            assert_eq!(item.field, "a", "{input}");
            assert_eq!(item.op, expected, "{input}");
            assert_eq!(item.value, "1", "{input}");
        }
    }

    #[test]
    fn test_parse_value_type() {
        let item: QueryItem = "traits.state = string::active".parse().unwrap();
        assert_eq!(item.field, "traits.state");
        assert_eq!(item.value_type, "string");
        assert_eq!(item.value, "active");
        assert_eq!(item.to_string(), "traits.state=string::active");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("no_operator".parse::<QueryItem>().is_err());
        assert!("=value".parse::<QueryItem>().is_err());
        assert!("a!b".parse::<QueryItem>().is_err());
        assert!("a=list::1".parse::<QueryItem>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let item = QueryItem::new("resource_id", ComparisonOperator::Eq, "abc");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"field": "resource_id", "op": "eq", "value": "abc"})
        );
    }

    #[test]
    fn test_parse_list_skips_empty_segments() {
        let items = QueryItem::parse_list("a=1;;b>2;").unwrap();
        assert_eq!(items.len(), 2);
        assert!(QueryItem::parse_list("").unwrap().is_empty());
    }
}
