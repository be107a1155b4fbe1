use crate::error::AlertError;
use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Ongoing,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Ongoing => "ongoing",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AlertStatus::Pending),
            "ongoing" => Ok(AlertStatus::Ongoing),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(AlertError::validation(format!("unknown status '{}'", other))),
        }
    }
}

/// A distress signal and where it is in its lifecycle.
///
/// Serialized field names match the records already stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub reporter_id: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub location: String,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: AlertStatus,
    #[serde(rename = "isFalseAlert")]
    pub is_false_alert: bool,
    #[serde(rename = "responseTime")]
    pub response_time_seconds: Option<f64>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A requested status change. `is_false_alert: None` leaves the flag alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusUpdate {
    pub status: AlertStatus,
    pub is_false_alert: Option<bool>,
}

/// Row shape of the `alerts` table.
#[derive(Debug, FromRow)]
pub struct AlertRow {
    pub id: Uuid,
    pub user_id: String,
    pub lat: f64,
    pub lon: f64,
    pub location: String,
    pub distance: f64,
    pub timestamp: DateTime<Utc>,
    pub status: String, // text in DB, parsed on read
    pub is_false_alert: bool,
    pub response_time: Option<f64>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = AlertError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            reporter_id: row.user_id,
            coordinates: Coordinates {
                lat: row.lat,
                lon: row.lon,
            },
            location: row.location,
            distance_km: row.distance,
            created_at: row.timestamp,
            status: row.status.parse()?,
            is_false_alert: row.is_false_alert,
            response_time_seconds: row.response_time,
            resolved_at: row.resolved_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pending_alert(created_at: DateTime<Utc>) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            reporter_id: "09171234567".to_string(),
            coordinates: Coordinates {
                lat: 14.5547,
                lon: 121.0244,
            },
            location: "Barangay Rizal".to_string(),
            distance_km: 0.0,
            created_at,
            status: AlertStatus::Pending,
            is_false_alert: false,
            response_time_seconds: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let json = serde_json::to_value(pending_alert(t0)).unwrap();
        assert_eq!(json["user_id"], "09171234567");
        assert_eq!(json["lat"], 14.5547);
        assert_eq!(json["lon"], 121.0244);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["isFalseAlert"], false);
        assert!(json["responseTime"].is_null());
        assert!(json["resolvedAt"].is_null());
        assert!(json["timestamp"].is_string());
        assert!(json.get("distance").is_some());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("ongoing".parse::<AlertStatus>().unwrap(), AlertStatus::Ongoing);
        assert!("closed".parse::<AlertStatus>().is_err());
    }
}
