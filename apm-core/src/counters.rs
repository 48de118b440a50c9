//! Contadores de desempenho (observador puro)

use crate::saturating::saturating_inc;
use crate::slot::{PowerState, StateReg};
use serde::{Deserialize, Serialize};

/// Contadores de ocupação e transição de um slot (CW bits, saturantes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfCounters {
    pub active_cycles: u64,
    pub idle_cycles: u64,
    pub sleep_entries: u64,
}

/// Ticks passados em cada estado, em 64 bits e sem largura de contador
///
/// Os contadores CW saturam; a ocupação do relatório vem daqui.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residency {
    pub active: u64,
    pub idle: u64,
    pub sleep: u64,
}

impl Residency {
    /// Conta um tick no estado comprometido
    pub fn record(&mut self, state: PowerState) {
        let ticks = match state {
            PowerState::Active => &mut self.active,
            PowerState::Idle => &mut self.idle,
            PowerState::Sleep => &mut self.sleep,
        };
        *ticks = ticks.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.active
            .saturating_add(self.idle)
            .saturating_add(self.sleep)
    }

    /// Fração dos ticks registrados em `state` (0.0 sem ticks)
    pub fn fraction(&self, state: PowerState) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let ticks = match state {
            PowerState::Active => self.active,
            PowerState::Idle => self.idle,
            PowerState::Sleep => self.sleep,
        };
        ticks as f64 / total as f64
    }
}

/// Resultado da observação de um tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub counters: PerfCounters,
    /// Houve borda de subida para SLEEP neste tick
    pub sleep_entry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceCounters {
    counter_width: u32,
}

impl PerformanceCounters {
    pub fn new(counter_width: u32) -> Self {
        Self { counter_width }
    }

    /// Observa o estado já comprometido e o estado de um tick atrás
    pub fn observe(&self, current: &PerfCounters, prev_state: StateReg, state: StateReg) -> Observation {
        let mut counters = *current;

        if state.is(PowerState::Active) {
            counters.active_cycles = saturating_inc(counters.active_cycles, self.counter_width);
        }
        if state.is(PowerState::Idle) {
            counters.idle_cycles = saturating_inc(counters.idle_cycles, self.counter_width);
        }

        let sleep_entry = !prev_state.is(PowerState::Sleep) && state.is(PowerState::Sleep);
        if sleep_entry {
            counters.sleep_entries = saturating_inc(counters.sleep_entries, self.counter_width);
        }

        Observation { counters, sleep_entry }
    }
}
