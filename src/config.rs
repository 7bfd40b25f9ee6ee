use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and topology parameters of a simulation run.
///
/// `stations` doubles as the cart's full threshold: a cart has completed
/// its circuit once it carries one gem per station.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    pub stations: u32,
    pub elevator_travel_ms: u64,
    pub engine_travel_ms: u64,
    pub mining_ms: u64,
    pub operator_pause_min_ms: u64,
    pub operator_pause_max_ms: u64,
}

impl SimConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.stations == 0 {
            return Err(anyhow::anyhow!("at least one station is required"));
        }
        if self.operator_pause_min_ms > self.operator_pause_max_ms {
            return Err(anyhow::anyhow!(
                "operator pause range is inverted: {} > {}",
                self.operator_pause_min_ms,
                self.operator_pause_max_ms
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn elevator_travel(&self) -> Duration {
        Duration::from_millis(self.elevator_travel_ms)
    }

    #[inline]
    pub fn engine_travel(&self) -> Duration {
        Duration::from_millis(self.engine_travel_ms)
    }

    #[inline]
    pub fn mining(&self) -> Duration {
        Duration::from_millis(self.mining_ms)
    }

    #[inline]
    pub fn operator_pause_min(&self) -> Duration {
        Duration::from_millis(self.operator_pause_min_ms)
    }

    #[inline]
    pub fn operator_pause_max(&self) -> Duration {
        Duration::from_millis(self.operator_pause_max_ms)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            stations: 3,
            elevator_travel_ms: 800,
            engine_travel_ms: 500,
            mining_ms: 600,
            operator_pause_min_ms: 1_000,
            operator_pause_max_ms: 3_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_stations_is_rejected() {
        let cfg = SimConfig {
            stations: 0,
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_operator_range_is_rejected() {
        let cfg = SimConfig {
            operator_pause_min_ms: 500,
            operator_pause_max_ms: 100,
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
