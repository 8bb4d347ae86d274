use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use serde_json::Value;

use crate::entities::system_setting::{self, SettingType};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Setting {
    pub key: String,
    /// The stored string decoded according to `setting_type`.
    pub value: Value,
    pub raw_value: String,
    pub setting_type: SettingType,
    pub category: String,
    pub description: Option<String>,
    pub updated_at: DateTimeUtc,
}

impl From<system_setting::Model> for Setting {
    fn from(row: system_setting::Model) -> Self {
        // Rows that no longer parse are exposed as plain strings.
        let value = parse_value(row.setting_type, &row.value)
            .unwrap_or_else(|_| Value::String(row.value.clone()));
        Self {
            key: row.key,
            value,
            raw_value: row.value,
            setting_type: row.setting_type,
            category: row.category,
            description: row.description,
            updated_at: row.updated_at,
        }
    }
}

/// Decodes a stored setting. Values are stored as strings whatever their type.
pub fn parse_value(setting_type: SettingType, raw: &str) -> Result<Value, String> {
    match setting_type {
        SettingType::Text => Ok(Value::String(raw.to_string())),
        SettingType::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .and_then(|n| {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some(Value::from(n as i64))
                } else {
                    serde_json::Number::from_f64(n).map(Value::Number)
                }
            })
            .ok_or_else(|| format!("'{}' is not a number", raw)),
        SettingType::Boolean => match raw.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(format!("'{}' is not a boolean", other)),
        },
        SettingType::Json => {
            serde_json::from_str(raw).map_err(|err| format!("invalid json: {}", err))
        }
    }
}

/// Canonical string form of a value accepted for `setting_type`.
pub fn encode_value(setting_type: SettingType, value: &Value) -> Result<String, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match setting_type {
        SettingType::Json => {
            let parsed = parse_value(setting_type, &raw)?;
            Ok(parsed.to_string())
        }
        _ => parse_value(setting_type, &raw).map(|_| raw.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_by_type_tag() {
        assert_eq!(parse_value(SettingType::Number, "19"), Ok(json!(19)));
        assert_eq!(parse_value(SettingType::Number, "0.19"), Ok(json!(0.19)));
        assert!(parse_value(SettingType::Number, "diecinueve").is_err());
        assert_eq!(parse_value(SettingType::Boolean, "true"), Ok(json!(true)));
        assert!(parse_value(SettingType::Boolean, "yes").is_err());
        assert_eq!(
            parse_value(SettingType::Json, r#"{"a": 1}"#),
            Ok(json!({"a": 1}))
        );
        assert_eq!(
            parse_value(SettingType::Text, "Tienda"),
            Ok(json!("Tienda"))
        );
    }

    #[test]
    fn encodes_values_as_stored_strings() {
        assert_eq!(encode_value(SettingType::Number, &json!(150000)), Ok("150000".to_string()));
        assert_eq!(encode_value(SettingType::Number, &json!("42")), Ok("42".to_string()));
        assert_eq!(encode_value(SettingType::Boolean, &json!(false)), Ok("false".to_string()));
        assert_eq!(
            encode_value(SettingType::Json, &json!({"b": [1, 2]})),
            Ok(r#"{"b":[1,2]}"#.to_string())
        );
        assert!(encode_value(SettingType::Boolean, &json!("maybe")).is_err());
    }
}
