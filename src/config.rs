use crate::geo::{default_zones, Coordinates, Zone, DEFAULT_STATION};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub http_host: String,
    pub http_port: u16,
    pub kafka_enabled: bool,
    pub kafka_bootstrap_servers: String,
    pub kafka_topic: String,
    pub kafka_group_id: String,
    pub kafka_auto_offset_reset: String,
    pub kafka_sasl_mechanism: String,
    pub kafka_username: String,
    pub kafka_password: String,
    pub kafka_security_protocol: String,
    pub kafka_max_retries: u32,
    pub kafka_circuit_breaker_cooldown: u64,
    pub database_url: String,
    pub log_level: String,
    pub retention_window_minutes: i64,
    pub sweep_interval_minutes: u64,
    pub station: Coordinates,
    pub zones_file: Option<String>,
}

const DEFAULT_MINUTES: u64 = 30;
/// Ten years.
const MAX_MINUTES: u64 = 10 * 365 * 24 * 60;

/// Negative windows fall back to the default; huge ones are capped.
fn retention_minutes(raw: i64) -> i64 {
    if raw < 0 {
        DEFAULT_MINUTES as i64
    } else {
        raw.min(MAX_MINUTES as i64)
    }
}

// tokio intervals must be non-zero
fn sweep_minutes(raw: u64) -> u64 {
    if raw == 0 {
        DEFAULT_MINUTES
    } else {
        raw.min(MAX_MINUTES)
    }
}

/// Parsed env var, or `default` when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let http_host = env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let http_port = env_or("HTTP_PORT", env_or("PORT", 5001));

        let kafka_enabled = env_or("KAFKA_ENABLED", false);
        let kafka_bootstrap_servers =
            env::var("KAFKA_BOOTSTRAP_SERVERS").unwrap_or_else(|_| "localhost:9092".to_string());
        let kafka_topic = env::var("KAFKA_TOPIC").unwrap_or_else(|_| "sos-signals".to_string());
        let kafka_group_id =
            env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| "sos-dispatch-consumer".to_string());
        let kafka_auto_offset_reset =
            env::var("KAFKA_AUTO_OFFSET_RESET").unwrap_or_else(|_| "latest".to_string());
        let kafka_sasl_mechanism =
            env::var("KAFKA_SASL_MECHANISM").unwrap_or_else(|_| "PLAIN".to_string());
        let kafka_username = env::var("KAFKA_USERNAME").unwrap_or_default();
        let kafka_password = env::var("KAFKA_PASSWORD").unwrap_or_default();
        let kafka_security_protocol =
            env::var("KAFKA_SECURITY_PROTOCOL").unwrap_or_else(|_| "PLAINTEXT".to_string());
        let kafka_max_retries = env_or("KAFKA_MAX_RETRIES", 5);
        let kafka_circuit_breaker_cooldown = env_or("KAFKA_CIRCUIT_BREAKER_COOLDOWN", 300);

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let db_host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
                let db_port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
                let db_name = env::var("DB_DATABASE").unwrap_or_else(|_| "sos_dispatch".to_string());
                let db_user = env::var("DB_USER").unwrap_or_else(|_| "sos".to_string());
                let db_pwd = env::var("DB_PWD").unwrap_or_else(|_| "sos".to_string());
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    db_user, db_pwd, db_host, db_port, db_name
                )
            }
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let retention_window_minutes =
            retention_minutes(env_or("RETENTION_WINDOW_MINUTES", DEFAULT_MINUTES as i64));
        let sweep_interval_minutes =
            sweep_minutes(env_or("SWEEP_INTERVAL_MINUTES", DEFAULT_MINUTES));

        let station = Coordinates::new(
            env_or("STATION_LAT", DEFAULT_STATION.lat),
            env_or("STATION_LON", DEFAULT_STATION.lon),
        )
        .context("invalid STATION_LAT/STATION_LON")?;

        let zones_file = env::var("ZONES_FILE").ok().filter(|p| !p.trim().is_empty());

        Ok(Self {
            http_host,
            http_port,
            kafka_enabled,
            kafka_bootstrap_servers,
            kafka_topic,
            kafka_group_id,
            kafka_auto_offset_reset,
            kafka_sasl_mechanism,
            kafka_username,
            kafka_password,
            kafka_security_protocol,
            kafka_max_retries,
            kafka_circuit_breaker_cooldown,
            database_url,
            log_level,
            retention_window_minutes,
            sweep_interval_minutes,
            station,
            zones_file,
        })
    }

    /// Zone table from `ZONES_FILE`, or the built-in table.
    pub fn load_zones(&self) -> Result<Vec<Zone>> {
        match &self.zones_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading zones file {}", path))?;
                parse_zones(&raw).with_context(|| format!("parsing zones file {}", path))
            }
            None => Ok(default_zones()),
        }
    }
}

pub fn parse_zones(raw: &str) -> Result<Vec<Zone>> {
    let zones: Vec<Zone> = serde_json::from_str(raw)?;
    for zone in &zones {
        Coordinates::new(zone.lat, zone.lon)
            .with_context(|| format!("zone '{}' has an invalid center", zone.name))?;
        anyhow::ensure!(
            zone.range.is_finite() && zone.range > 0.0,
            "zone '{}' has an invalid range",
            zone.name
        );
    }
    Ok(zones)
}
