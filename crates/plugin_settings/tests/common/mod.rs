#![allow(dead_code)]

use std::sync::Once;

use plugin_settings::SettingsMap;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Routes `tracing` output through the test harness. `RUST_LOG` overrides
/// the default `debug` level.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

pub fn object(value: Value) -> SettingsMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
