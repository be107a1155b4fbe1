use serde::{Deserialize, Deserializer};

/// Distress signal as published on the intake topic by SOS gateways.
#[derive(Debug, Deserialize)]
pub struct DistressMessage {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub lon: Option<f64>,
}

/// Accepts a JSON number or a numeric string; blank strings read as absent.
pub fn parse_f64_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    let v: Option<StringOrFloat> = Option::deserialize(deserializer)?;
    match v {
        Some(StringOrFloat::Float(f)) => Ok(Some(f)),
        Some(StringOrFloat::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_gateway_payload() {
        let payload = r#"
        {
            "user_id": "09171234567",
            "lat": "+14.5547",
            "lon": "121.0244",
            "metadata": {
                "GATEWAY": "sms-bridge-2",
                "RECEIVED_EPOCH": 1764398681920
            }
        }
        "#;

        let msg: DistressMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.user_id.as_deref(), Some("09171234567"));
        assert_eq!(msg.lat, Some(14.5547));
        assert_eq!(msg.lon, Some(121.0244));
    }

    #[test]
    fn test_missing_and_blank_coordinates() {
        let msg: DistressMessage =
            serde_json::from_str(r#"{"userId": "u1", "lat": 14.55, "lon": " "}"#).unwrap();
        assert_eq!(msg.user_id.as_deref(), Some("u1"));
        assert_eq!(msg.lat, Some(14.55));
        assert_eq!(msg.lon, None);

        let msg: DistressMessage = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert_eq!(msg.lat, None);
        assert_eq!(msg.lon, None);
    }

    #[test]
    fn test_garbage_coordinate_fails() {
        let res = serde_json::from_str::<DistressMessage>(r#"{"user_id": "u1", "lat": "abc"}"#);
        assert!(res.is_err());
    }
}
