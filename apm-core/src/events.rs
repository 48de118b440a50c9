//! Eventos observáveis emitidos a cada tick

use crate::slot::PowerState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evento de um slot; só observação, nunca realimenta o pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PowerEvent {
    /// Mudança de estado comprometida neste tick
    Transition {
        slot: usize,
        from: PowerState,
        to: PowerState,
    },
    /// Borda de subida para SLEEP
    SleepEntry { slot: usize },
    /// Codificação ilegal corrigida pela FSM
    SelfHealed { slot: usize, raw: u8, to: PowerState },
}

impl PowerEvent {
    pub fn slot(&self) -> usize {
        match self {
            PowerEvent::Transition { slot, .. }
            | PowerEvent::SleepEntry { slot }
            | PowerEvent::SelfHealed { slot, .. } => *slot,
        }
    }
}

impl fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerEvent::Transition { slot, from, to } => write!(f, "slot {slot}: {from} -> {to}"),
            PowerEvent::SleepEntry { slot } => write!(f, "slot {slot}: sleep entry"),
            PowerEvent::SelfHealed { slot, raw, to } => {
                write!(f, "slot {slot}: illegal state {raw:#04b} healed to {to}")
            }
        }
    }
}
