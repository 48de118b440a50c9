//! Gate de clock sem glitch (ClockGateModel)
//!
//! Modelo de um ICG baseado em latch. A linha do tempo de referência alterna
//! meias-fases ativas (alto) e inativas (baixo) de `phase_width` amostras.
//! O latch é transparente só na meia-fase inativa; a saída é
//! `phase_alto && latch`. Uma mudança de enable durante a fase ativa só
//! aparece na fase ativa seguinte, então nenhum pulso é truncado.
//!
//! ```text
//! ref      ▔▔▁▁▔▔▁▁▔▔▁▁▔▔▁▁
//! enable   ▔▔▔▔▔▁▁▁▁▁▁▔▔▔▔▔      (muda no meio das fases)
//! latch    ▔▔▔▔▔▔▁▁▁▁▁▔▔▔▔▔
//! gated    ▔▔▁▁▔▔▁▁▁▁▁▁▔▔▁▁
//! ```

use serde::{Deserialize, Serialize};

/// Meia-fase da linha do tempo de referência
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Meia-fase ativa: latch opaco, saída = latch
    High,
    /// Meia-fase inativa: latch transparente, saída baixa
    Low,
}

/// `effective_enable = clk_request || scan_override`
#[inline]
pub fn effective_enable(clk_request: bool, scan_override: bool) -> bool {
    clk_request || scan_override
}

/// Gate de clock de um periférico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockGate {
    phase_width: u32,
    phase: Phase,
    /// Posição dentro da meia-fase corrente
    position: u32,
    latched_enable: bool,
}

impl ClockGate {
    /// Cria gate alinhado ao início de um período com latch fechado
    pub fn new(phase_width: u32) -> Self {
        Self {
            phase_width: phase_width.max(1),
            phase: Phase::High,
            position: 0,
            latched_enable: false,
        }
    }

    /// Limpa o latch e realinha ao início de um período de referência
    pub fn reset(&mut self) {
        self.phase = Phase::High;
        self.position = 0;
        self.latched_enable = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_width(&self) -> u32 {
        self.phase_width
    }

    /// Amostra corrente dentro da meia-fase (`0..phase_width`)
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Posição e largura coerentes entre si
    pub fn is_aligned(&self) -> bool {
        self.position < self.phase_width
    }

    pub fn latched_enable(&self) -> bool {
        self.latched_enable
    }

    /// Nível de saída na amostra corrente, sem avançar
    pub fn level(&self) -> bool {
        self.phase == Phase::High && self.latched_enable
    }

    /// Avança uma amostra com o enable presente nela; retorna o nível gateado
    pub fn sample(&mut self, enable: bool) -> bool {
        if self.phase == Phase::Low {
            self.latched_enable = enable;
        }
        let level = self.level();

        self.position = self.position.saturating_add(1);
        if self.position >= self.phase_width {
            self.position = 0;
            self.phase = match self.phase {
                Phase::High => Phase::Low,
                Phase::Low => Phase::High,
            };
        }
        level
    }

    /// Avança um período de referência inteiro com enable constante
    ///
    /// Retorna `true` se a saída ficou alta em alguma amostra do período.
    pub fn tick(&mut self, enable: bool) -> bool {
        let mut pulsed = false;
        for _ in 0..self.phase_width.saturating_mul(2) {
            pulsed |= self.sample(enable);
        }
        pulsed
    }
}
