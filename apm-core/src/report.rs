//! Relatório de ocupação dos estados de energia

use crate::slot::PowerState;
use crate::system::PowerSystem;
use serde::{Deserialize, Serialize};

/// Ocupação de um periférico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotReport {
    pub index: usize,
    pub enabled: bool,
    pub state: PowerState,
    pub active_cycles: u64,
    pub idle_cycles: u64,
    pub sleep_entries: u64,
    /// Fração dos ticks em ACTIVE (0.0 - 1.0)
    pub active_residency: f64,
    /// Fração dos ticks em IDLE
    pub idle_residency: f64,
    /// Fração dos ticks em SLEEP
    pub sleep_residency: f64,
}

/// Relatório completo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerReport {
    pub name: String,
    pub ticks: u64,
    pub slots: Vec<SlotReport>,
}

impl PowerReport {
    pub fn from_system(name: impl Into<String>, system: &PowerSystem) -> Self {
        let ticks = system.elapsed_ticks();
        let slots = system
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let c = slot.counters;
                let r = slot.residency;
                SlotReport {
                    index,
                    enabled: slot.enabled,
                    state: slot.power_state(),
                    active_cycles: c.active_cycles,
                    idle_cycles: c.idle_cycles,
                    sleep_entries: c.sleep_entries,
                    active_residency: r.fraction(PowerState::Active),
                    idle_residency: r.fraction(PowerState::Idle),
                    sleep_residency: r.fraction(PowerState::Sleep),
                }
            })
            .collect();

        Self {
            name: name.into(),
            ticks,
            slots,
        }
    }

    /// Total de entradas em SLEEP em todos os slots
    pub fn total_sleep_entries(&self) -> u64 {
        self.slots.iter().map(|s| s.sleep_entries).sum()
    }

    /// Exporta relatório como JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
