use crate::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// One output row, with values addressed by their output column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        RowData { field_values }
    }

    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        RowData {
            field_values: pairs
                .into_iter()
                .map(|(name, value)| FieldValue {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }

    /// Output names are canonical column ids and therefore case sensitive.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == field)
    }

    /// Returns the value of `field`, or `Value::Null` when the row does not
    /// carry it.
    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_value_defaults_to_null() {
        let row = RowData::from_pairs([("id", Value::Int(1)), ("name", Value::from("init"))]);

        assert_eq!(row.get_value("id"), Value::Int(1));
        assert_eq!(row.get_value("name"), Value::from("init"));
        assert_eq!(row.get_value("missing"), Value::Null);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_get_is_case_sensitive() {
        let row = RowData::from_pairs([("thread[id=utid].name", Value::from("main"))]);
        assert!(row.get("thread[id=utid].name").is_some());
        assert!(row.get("THREAD[id=utid].name").is_none());
    }
}
