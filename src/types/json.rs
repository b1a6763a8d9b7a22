//! Conversions between [`BsonValue`] and `serde_json::Value`.

use serde_json::{Map, Number, Value as Json};

use super::BsonValue;

impl From<Json> for BsonValue {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Boolean(b),
            Json::Number(n) => number_to_value(&n),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (Self::String(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

fn number_to_value(n: &Number) -> BsonValue {
    if let Some(i) = n.as_i64() {
        BsonValue::Integer(i)
    } else if let Some(u) = n.as_u64() {
        BsonValue::BigInt(i128::from(u))
    } else {
        BsonValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&BsonValue> for Json {
    fn from(value: &BsonValue) -> Self {
        match value {
            BsonValue::Null => Json::Null,
            BsonValue::Boolean(b) => Json::Bool(*b),
            BsonValue::Integer(i) => Json::Number(Number::from(*i)),
            BsonValue::BigInt(i) => match u64::try_from(*i) {
                Ok(u) => Json::Number(Number::from(u)),
                Err(_) => float_to_json(*i as f64),
            },
            BsonValue::Float(f) => float_to_json(*f),
            BsonValue::String(s) | BsonValue::Code(s) => Json::String(s.clone()),
            BsonValue::Binary(bytes) => {
                Json::Array(bytes.iter().map(|b| Json::Number(Number::from(*b))).collect())
            }
            BsonValue::Array(items) => Json::Array(items.iter().map(Json::from).collect()),
            BsonValue::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = match k.as_str() {
                        Some(s) => s.to_owned(),
                        None => k.to_string(),
                    };
                    map.insert(key, Json::from(v));
                }
                Json::Object(map)
            }
        }
    }
}

impl From<BsonValue> for Json {
    fn from(value: BsonValue) -> Self {
        Json::from(&value)
    }
}

// NaN and infinities have no JSON form.
fn float_to_json(f: f64) -> Json {
    Number::from_f64(f).map_or(Json::Null, Json::Number)
}
