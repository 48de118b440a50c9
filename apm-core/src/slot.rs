//! Slot de periférico e codificação de estado de energia

use crate::counters::{PerfCounters, Residency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de energia de um periférico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    /// Potência total (estado inicial)
    Active,
    /// Sem trabalho imediato, despertar rápido
    Idle,
    /// Clock gateado; só um wake externo sai daqui
    Sleep,
}

impl PowerState {
    /// Codificação de 2 bits do registrador de estado
    pub const fn bits(self) -> u8 {
        match self {
            PowerState::Active => 0b00,
            PowerState::Idle => 0b01,
            PowerState::Sleep => 0b10,
        }
    }

    /// Decodifica 2 bits; `None` para codificações ilegais
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(PowerState::Active),
            0b01 => Some(PowerState::Idle),
            0b10 => Some(PowerState::Sleep),
            _ => None,
        }
    }

    /// O clock do periférico é requisitado neste estado?
    pub const fn wants_clock(self) -> bool {
        matches!(self, PowerState::Active | PowerState::Idle)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerState::Active => "ACTIVE",
            PowerState::Idle => "IDLE",
            PowerState::Sleep => "SLEEP",
        };
        f.write_str(name)
    }
}

/// Registrador de estado bruto
///
/// Guarda a codificação como está no hardware, inclusive valores ilegais que
/// só chegam via restauração de snapshot. A FSM corrige na próxima avaliação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateReg(u8);

impl StateReg {
    /// Registrador com valor bruto arbitrário
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn decode(self) -> Option<PowerState> {
        PowerState::from_bits(self.0)
    }

    pub fn is(self, state: PowerState) -> bool {
        self.decode() == Some(state)
    }
}

impl From<PowerState> for StateReg {
    fn from(state: PowerState) -> Self {
        Self(state.bits())
    }
}

/// Estado de um periférico (um por índice `0..N`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeripheralSlot {
    /// Habilitação vinda da configuração externa
    pub enabled: bool,
    /// Ciclos ociosos consecutivos (W bits, saturante)
    pub idle_count: u64,
    /// Contagem regressiva da janela de atividade recente
    pub activity_timer: u32,
    /// `activity_timer > 0 && enabled`
    pub recent_activity: bool,
    /// Limiar base da configuração externa
    pub base_threshold: u64,
    /// Deslocamento de adaptação (0..=15)
    pub alpha: u8,
    /// Limiar adaptativo calculado no último tick
    pub adaptive_threshold: u64,
    /// Elegibilidade registrada (atrasada um tick)
    pub sleep_eligible: bool,
    pub state: StateReg,
    /// Estado de um tick atrás
    pub prev_state: StateReg,
    pub wake_event: bool,
    pub clk_request: bool,
    pub gated_level: bool,
    pub counters: PerfCounters,
    /// Ocupação por estado desde o reset, sem saturação CW
    #[serde(default)]
    pub residency: Residency,
}

impl PeripheralSlot {
    /// Slot no estado canônico de reset
    pub fn new() -> Self {
        Self {
            enabled: false,
            idle_count: 0,
            activity_timer: 0,
            recent_activity: false,
            base_threshold: 0,
            alpha: 0,
            adaptive_threshold: 0,
            sleep_eligible: false,
            state: PowerState::Active.into(),
            prev_state: PowerState::Active.into(),
            wake_event: false,
            clk_request: false,
            gated_level: false,
            counters: PerfCounters::default(),
            residency: Residency::default(),
        }
    }

    /// Reset síncrono para o estado canônico
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Estado decodificado (ACTIVE se a codificação for ilegal)
    pub fn power_state(&self) -> PowerState {
        self.state.decode().unwrap_or(PowerState::Active)
    }
}

impl Default for PeripheralSlot {
    fn default() -> Self {
        Self::new()
    }
}
