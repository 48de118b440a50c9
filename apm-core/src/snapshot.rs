//! Snapshot completo do estado interno para replay determinístico

use crate::clock_gate::ClockGate;
use crate::config::SystemConfig;
use crate::error::PowerResult;
use crate::slot::PeripheralSlot;
use serde::{Deserialize, Serialize};

/// Estado interno serializável de um [`PowerSystem`](crate::PowerSystem)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub config: SystemConfig,
    /// Ticks desde o último reset
    pub tick: u64,
    pub slots: Vec<PeripheralSlot>,
    pub gates: Vec<ClockGate>,
}

impl SystemSnapshot {
    /// Exporta snapshot como JSON
    pub fn to_json(&self) -> PowerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Importa snapshot de JSON
    pub fn from_json(json: &str) -> PowerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
