//! JSON (de)serialization for Record.
//!
//! Records serialize as plain JSON objects in field order. Every key is kept
//! on the way in.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object representing a record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = Record::new();

        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            record.fields.insert(key, Value::from(value));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keeps_every_key_in_order() {
        let json = r#"{"id":3,"@handle":"cab","name":"Cab","age":25.5,"tags":["a"],"note":null}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["id", "@handle", "name", "age", "tags", "note"]);
        assert_eq!(record.text("@handle"), "cab");
        assert_eq!(record.get("id"), Some(&Value::Int(3)));
        assert_eq!(record.get("age"), Some(&Value::Float(25.5)));
        assert_eq!(record.get("note"), Some(&Value::Null));
        assert!(matches!(record.get("tags"), Some(Value::Json(_))));
    }

    #[test]
    fn test_serialize_plain_object() {
        let record = Record::new().set("id", 1).set("name", "Ann").set("file", Value::Null);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Ann","file":null}"#);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<Record>("[1,2]").is_err());
    }
}
