use crate::config::AppConfig;
use crate::engine::AlertLifecycle;
use crate::processor::message_processor;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Consumes distress signals from Kafka with a circuit breaker on receive failures.
pub async fn start_kafka_consumer(
    config: &AppConfig,
    lifecycle: Arc<AlertLifecycle>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    info!("Initializing Kafka consumer for topic: {}", config.kafka_topic);

    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", &config.kafka_bootstrap_servers)
        .set("group.id", &config.kafka_group_id)
        .set("auto.offset.reset", &config.kafka_auto_offset_reset)
        .set("security.protocol", &config.kafka_security_protocol);

    if !config.kafka_username.is_empty() {
        client_config
            .set("sasl.mechanism", &config.kafka_sasl_mechanism)
            .set("sasl.username", &config.kafka_username)
            .set("sasl.password", &config.kafka_password);
    }

    let consumer: StreamConsumer = client_config.create()?;

    consumer.subscribe(&[&config.kafka_topic])?;
    info!("Subscribed to topic: {}", config.kafka_topic);

    let mut consecutive_failures = 0;
    let max_retries = config.kafka_max_retries;
    let cooldown_duration = Duration::from_secs(config.kafka_circuit_breaker_cooldown);

    loop {
        if consecutive_failures >= max_retries {
            warn!(
                "Circuit breaker tripped ({} consecutive failures)! Sleeping for {} seconds...",
                consecutive_failures, config.kafka_circuit_breaker_cooldown
            );
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(cooldown_duration) => {}
            }
            consecutive_failures = 0;
            info!("Circuit breaker reset. Resuming consumption.");
        }

        // Copy the payload out so no borrowed message outlives this block.
        let received = {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = consumer.recv() => received,
            };
            received.map(|m| m.payload().map(|p| p.to_vec()))
        };

        match received {
            Ok(Some(payload)) => {
                consecutive_failures = 0;

                let lifecycle = lifecycle.clone();
                // Alerts are independent; don't hold up the consumer on the store.
                tokio::spawn(async move {
                    if let Err(e) = message_processor::process_message(&lifecycle, &payload).await {
                        error!("Error processing distress signal: {}", e);
                    }
                });
            }
            Ok(None) => {
                consecutive_failures = 0;
                warn!("Received empty payload from Kafka");
            }
            Err(e) => {
                consecutive_failures += 1;
                error!(
                    "Kafka error: {}. Consecutive failures: {} / {}",
                    e, consecutive_failures, max_retries
                );
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    info!("Kafka consumer stopped");
    Ok(())
}
