use super::{ObjectMap, Value};
use custom_error::custom_error;
use serde::Serialize;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ConversionError

    Unsupported{name: String, reason: String} = "cannot convert host value `{name}`: {reason}",
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(elements) => {
                Self::Array(elements.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<ObjectMap>(),
            ),
        }
    }
}

impl Value {
    /// Deep-converts a host value through its JSON data model.
    ///
    /// `name` only labels the error when the value has no JSON form.
    pub fn from_host<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Self, ConversionError> {
        serde_json::to_value(value)
            .map(Value::from)
            .map_err(|err| ConversionError::Unsupported {
                name: name.to_owned(),
                reason: err.to_string(),
            })
    }

    /// JSON rendering of a value. Functions and non-finite numbers have no
    /// JSON form and render as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null | Self::Function(_) => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(elements) => {
                serde_json::Value::Array(elements.iter().map(Value::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_conversion_table() {
        let value = Value::from(json!({
            "id": 1,
            "name": "toto",
            "active": true,
            "manager": null,
            "roles": ["admin", 2],
            "address": { "city": "Lyon" },
        }));

        let mut address = ObjectMap::new();
        address.insert("city".to_owned(), "Lyon".into());

        let mut expected = ObjectMap::new();
        expected.insert("id".to_owned(), 1.0.into());
        expected.insert("name".to_owned(), "toto".into());
        expected.insert("active".to_owned(), true.into());
        expected.insert("manager".to_owned(), Value::Null);
        expected.insert(
            "roles".to_owned(),
            vec![Value::from("admin"), Value::from(2.0)].into(),
        );
        expected.insert("address".to_owned(), address.into());

        assert_eq!(value, Value::Object(expected));
    }

    #[test]
    fn test_from_host_struct_like() {
        let mut user = HashMap::new();
        user.insert("id", "1");

        let value = Value::from_host("user", &user).unwrap();
        match value {
            Value::Object(map) => assert_eq!(map.get("id"), Some(&Value::from("1"))),
            other => panic!("expected object, got {}", other),
        }

        assert_eq!(Value::from_host("n", &None::<i32>).unwrap(), Value::Null);
        assert_eq!(Value::from_host("n", &3u8).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_from_host_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");

        match Value::from_host("pairs", &map).unwrap_err() {
            ConversionError::Unsupported { name, .. } => assert_eq!(name, "pairs"),
        }
    }

    #[test]
    fn test_to_json() {
        let value = Value::from(json!({"a": [1, "b", null, false]}));
        assert_eq!(value.to_json(), json!({"a": [1.0, "b", null, false]}));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
    }
}
