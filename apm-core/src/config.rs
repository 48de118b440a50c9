//! Configuração do sistema (N, W, WINDOW, CW)

use crate::error::{PowerError, PowerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Faixas de validação dos parâmetros de construção
pub mod limits {
    /// Número de periféricos (N)
    pub const SLOTS: (u64, u64) = (1, 32);
    /// Largura do contador de ociosidade e dos limiares (W)
    pub const IDLE_WIDTH: (u64, u64) = (2, 32);
    /// Janela de atividade recente (WINDOW)
    pub const WINDOW: (u64, u64) = (1, 256);
    /// Largura dos contadores de desempenho (CW)
    pub const COUNTER_WIDTH: (u64, u64) = (1, 64);
    /// Amostras por meia-fase do clock de referência
    pub const PHASE_WIDTH: (u64, u64) = (1, 64);
    /// Maior deslocamento de adaptação (alpha, 4 bits)
    pub const ALPHA_MAX: u8 = 15;
}

/// Configuração de construção do sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Número de slots de periférico (N)
    pub slots: usize,
    /// Largura em bits de idle_count / limiares (W)
    pub idle_width: u32,
    /// Janela de atividade recente em ticks (WINDOW)
    pub window: u32,
    /// Largura em bits dos contadores de desempenho (CW)
    #[serde(default = "default_counter_width")]
    pub counter_width: u32,
    /// Largura nominal de meia-fase do clock gateado, em amostras
    #[serde(default = "default_phase_width")]
    pub phase_width: u32,
}

fn default_counter_width() -> u32 {
    32
}

fn default_phase_width() -> u32 {
    1
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            slots: 4,
            idle_width: 16,
            window: 8,
            counter_width: default_counter_width(),
            phase_width: default_phase_width(),
        }
    }
}

impl SystemConfig {
    /// Cria configuração com os quatro parâmetros principais
    pub fn new(slots: usize, idle_width: u32, window: u32, counter_width: u32) -> Self {
        Self {
            slots,
            idle_width,
            window,
            counter_width,
            phase_width: default_phase_width(),
        }
    }

    /// Define largura de meia-fase do clock gateado
    pub fn with_phase_width(mut self, phase_width: u32) -> Self {
        self.phase_width = phase_width;
        self
    }

    /// Valida todas as faixas; nenhuma construção parcial é permitida
    pub fn validate(&self) -> PowerResult<()> {
        check("slots", self.slots as u64, limits::SLOTS)?;
        check("idle_width", u64::from(self.idle_width), limits::IDLE_WIDTH)?;
        check("window", u64::from(self.window), limits::WINDOW)?;
        check("counter_width", u64::from(self.counter_width), limits::COUNTER_WIDTH)?;
        check("phase_width", u64::from(self.phase_width), limits::PHASE_WIDTH)?;
        Ok(())
    }

    /// Lê configuração de uma string TOML
    pub fn from_toml_str(content: &str) -> PowerResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Lê configuração de um arquivo TOML
    pub fn from_file(path: &Path) -> PowerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn check(field: &'static str, value: u64, (min, max): (u64, u64)) -> PowerResult<()> {
    if value < min || value > max {
        return Err(PowerError::InvalidConfig { field, value, min, max });
    }
    Ok(())
}
