use crate::engine::lifecycle::NewAlert;
use crate::engine::AlertLifecycle;
use crate::error::AlertError;
use crate::models::message::DistressMessage;
use tracing::{debug, warn};

/// Turn one intake payload into an alert.
///
/// Undecodable or invalid signals are logged and dropped; only store
/// failures are returned to the caller.
pub async fn process_message(lifecycle: &AlertLifecycle, payload: &[u8]) -> anyhow::Result<()> {
    // 1. Parse JSON
    let message: DistressMessage = match serde_json::from_slice(payload) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse distress signal: {}", e);
            return Ok(());
        }
    };

    debug!("Processing distress signal {:?}", message);

    // 2. Submit
    let request = NewAlert {
        user_id: message.user_id,
        lat: message.lat,
        lon: message.lon,
    };

    match lifecycle.create(request).await {
        Ok(_) => Ok(()),
        Err(AlertError::Validation(reason)) => {
            warn!("Rejected distress signal: {}", reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
