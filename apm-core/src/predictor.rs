//! Preditor de ociosidade (IdlePredictor)
//!
//! ```text
//! adjustment         = recent_activity ? (base_threshold >> alpha) : 0
//! adaptive_threshold = sat_add_W(base_threshold, adjustment)
//! eligible_now       = idle_count >= adaptive_threshold
//! ```
//!
//! `eligible_now` é combinacional. A FSM consome apenas a versão registrada,
//! `sleep_eligible`, que reflete as entradas do tick anterior.

use crate::config::limits::ALPHA_MAX;
use crate::saturating::saturating_add;

/// Resultado combinacional do preditor para o tick atual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub adaptive_threshold: u64,
    pub eligible_now: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePredictor {
    idle_width: u32,
}

impl IdlePredictor {
    pub fn new(idle_width: u32) -> Self {
        Self { idle_width }
    }

    /// Limiar inflado quando houve atividade recente; nunca menor que a base
    pub fn adaptive_threshold(&self, base_threshold: u64, recent_activity: bool, alpha: u8) -> u64 {
        let adjustment = if recent_activity {
            base_threshold >> u32::from(alpha.min(ALPHA_MAX))
        } else {
            0
        };
        saturating_add(base_threshold, adjustment, self.idle_width)
    }

    pub fn predict(
        &self,
        idle_count: u64,
        base_threshold: u64,
        recent_activity: bool,
        alpha: u8,
    ) -> Prediction {
        let adaptive_threshold = self.adaptive_threshold(base_threshold, recent_activity, alpha);
        Prediction {
            adaptive_threshold,
            eligible_now: idle_count >= adaptive_threshold,
        }
    }
}
