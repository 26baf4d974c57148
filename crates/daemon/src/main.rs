//! Pester - recurring text-message notifier
//! Composition root: wires the system adapters to the core scheduler

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pester_core::port::cycle_id::UuidCycleIdProvider;
use pester_core::port::time_provider::SystemTimeProvider;
use pester_core::port::{MessageTransport, StaticPermissionGate};
use pester_core::{RecurringNotifier, ScheduleRequest};
use pester_infra_system::{
    LogNoticeSink, LogTransport, TokioTrigger, WebhookTransport, WebhookTransportConfig,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("PESTER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("pester=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Pester v{} starting...", VERSION);

    // 2. Load configuration
    let message = std::env::var("PESTER_MESSAGE").unwrap_or_default();
    let phone_number = std::env::var("PESTER_PHONE_NUMBER").unwrap_or_default();
    let raw_interval = std::env::var("PESTER_INTERVAL_MINUTES").unwrap_or_default();

    // Fail closed: an invalid request never arms the schedule.
    let request = ScheduleRequest::validate(&message, &phone_number, &raw_interval)
        .map_err(|e| anyhow::anyhow!("invalid schedule request: {}", e))?;

    let send_permitted = std::env::var("PESTER_SEND_PERMITTED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(true);

    // 3. Setup dependencies (DI wiring)
    let trigger = Arc::new(TokioTrigger::new());

    let transport: Arc<dyn MessageTransport> = match std::env::var("PESTER_GATEWAY_URL") {
        Ok(gateway_url) => {
            info!(gateway_url = %gateway_url, "Using webhook gateway transport");
            Arc::new(WebhookTransport::new(WebhookTransportConfig {
                gateway_url,
                sender: std::env::var("PESTER_SENDER_ID").ok(),
            }))
        }
        Err(_) => {
            info!("No gateway configured, messages will be logged only");
            Arc::new(LogTransport)
        }
    };

    let notifier = RecurringNotifier::new(
        trigger,
        transport,
        Arc::new(StaticPermissionGate::new(send_permitted)),
        Arc::new(LogNoticeSink),
        Arc::new(SystemTimeProvider),
        Arc::new(UuidCycleIdProvider),
    );

    // 4. Arm the schedule
    let cycle = notifier.start(request);
    info!(cycle = %cycle, "Schedule armed. Press Ctrl+C to stop");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Disarming...");

    // 6. Graceful teardown (same release as stop())
    notifier.stop();

    info!("Shutdown complete.");

    Ok(())
}
