use serde::Deserialize;

/// Engine tuning knobs, fixed at construction.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// How long a seat hold stays valid before the sweep releases it.
    #[serde(default = "default_hold_timeout_ms")]
    pub hold_timeout_ms: u64,
    /// How often the expiry sweep wakes up.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

fn default_hold_timeout_ms() -> u64 {
    60_000
}

fn default_sweep_interval_ms() -> u64 {
    1_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_timeout_ms: default_hold_timeout_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}
