//! Entradas por tick e fontes de estímulo
//!
//! O colaborador externo de configuração/registradores é consultado uma vez
//! por tick através de [`RegisterSource`]. O núcleo nunca escreve de volta.

use crate::config::SystemConfig;
use crate::config::limits::ALPHA_MAX;
use crate::error::{PowerError, PowerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Snapshot imutável das entradas externas de um tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInputs {
    pub activity_pulse: Vec<bool>,
    pub enabled: Vec<bool>,
    pub base_threshold: Vec<u64>,
    pub wake_event: Vec<bool>,
    /// Deslocamento de adaptação compartilhado (0..=15)
    pub alpha: u8,
    /// Bypass global de teste do gate de clock
    pub scan_override: bool,
}

impl TickInputs {
    /// Todos habilitados, sem pulsos nem wakes, limiares zerados
    pub fn new(slots: usize) -> Self {
        Self {
            activity_pulse: vec![false; slots],
            enabled: vec![true; slots],
            base_threshold: vec![0; slots],
            wake_event: vec![false; slots],
            alpha: 0,
            scan_override: false,
        }
    }

    pub fn slots(&self) -> usize {
        self.enabled.len()
    }

    /// Pulso de atividade no slot
    ///
    /// # Panics
    ///
    /// Se `slot >= self.slots()`.
    pub fn with_pulse(mut self, slot: usize) -> Self {
        self.activity_pulse[slot] = true;
        self
    }

    /// Evento de wake no slot
    ///
    /// # Panics
    ///
    /// Se `slot >= self.slots()`.
    pub fn with_wake(mut self, slot: usize) -> Self {
        self.wake_event[slot] = true;
        self
    }

    /// Desabilita o slot
    ///
    /// # Panics
    ///
    /// Se `slot >= self.slots()`.
    pub fn with_disabled(mut self, slot: usize) -> Self {
        self.enabled[slot] = false;
        self
    }

    /// Limiar base de um slot
    ///
    /// # Panics
    ///
    /// Se `slot >= self.slots()`.
    pub fn with_threshold(mut self, slot: usize, threshold: u64) -> Self {
        self.base_threshold[slot] = threshold;
        self
    }

    /// Mesmo limiar base para todos os slots
    pub fn with_thresholds(mut self, threshold: u64) -> Self {
        self.base_threshold.fill(threshold);
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_scan_override(mut self, scan_override: bool) -> Self {
        self.scan_override = scan_override;
        self
    }

    /// Verifica que todos os vetores por periférico têm tamanho N
    pub fn check_len(&self, slots: usize) -> PowerResult<()> {
        let fields: [(&'static str, usize); 4] = [
            ("activity_pulse", self.activity_pulse.len()),
            ("enabled", self.enabled.len()),
            ("base_threshold", self.base_threshold.len()),
            ("wake_event", self.wake_event.len()),
        ];
        for (field, got) in fields {
            if got != slots {
                return Err(PowerError::InputLengthMismatch {
                    field,
                    expected: slots,
                    got,
                });
            }
        }
        Ok(())
    }
}

/// Colaborador externo consultado uma vez por tick
pub trait RegisterSource {
    /// Entradas do tick `tick` (0 = primeiro tick após reset)
    fn poll(&mut self, tick: u64, slots: usize) -> TickInputs;
}

impl<F> RegisterSource for F
where
    F: FnMut(u64, usize) -> TickInputs,
{
    fn poll(&mut self, tick: u64, slots: usize) -> TickInputs {
        self(tick, slots)
    }
}

/// Intervalo semiaberto de ticks `[from, to)`
pub type TickRange = [u64; 2];

fn in_ranges(ranges: &[TickRange], tick: u64) -> bool {
    ranges.iter().any(|&[from, to]| tick >= from && tick < to)
}

fn default_enabled() -> bool {
    true
}

/// Roteiro de um periférico dentro de um cenário
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeripheralScript {
    pub index: usize,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub base_threshold: u64,
    /// Ticks com pulso de atividade
    #[serde(default)]
    pub pulses: Vec<u64>,
    /// Ticks com evento de wake
    #[serde(default)]
    pub wakes: Vec<u64>,
    /// Intervalos em que o periférico fica desabilitado
    #[serde(default)]
    pub disabled: Vec<TickRange>,
}

/// Cenário de estímulo completo (arquivo TOML)
///
/// ```toml
/// ticks = 64
/// alpha = 2
///
/// [system]
/// slots = 4
/// idle_width = 16
/// window = 8
///
/// [[peripheral]]
/// index = 0
/// base_threshold = 20
/// pulses = [0, 30]
/// ```
///
/// Periféricos sem roteiro ficam desabilitados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub system: SystemConfig,
    pub ticks: u64,
    #[serde(default)]
    pub alpha: u8,
    #[serde(default)]
    pub scan_override: Vec<TickRange>,
    #[serde(default, rename = "peripheral")]
    pub peripherals: Vec<PeripheralScript>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> PowerResult<Self> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_file(path: &Path) -> PowerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> PowerResult<()> {
        self.system.validate()?;

        if self.alpha > ALPHA_MAX {
            return Err(PowerError::Scenario(format!(
                "alpha {} exceeds {}",
                self.alpha, ALPHA_MAX
            )));
        }

        let mut seen = HashSet::new();
        for script in &self.peripherals {
            if script.index >= self.system.slots {
                return Err(PowerError::Scenario(format!(
                    "peripheral index {} out of range (slots = {})",
                    script.index, self.system.slots
                )));
            }
            if !seen.insert(script.index) {
                return Err(PowerError::Scenario(format!(
                    "peripheral {} scripted twice",
                    script.index
                )));
            }
            check_ranges(&script.disabled, "disabled")?;
        }
        check_ranges(&self.scan_override, "scan_override")?;
        Ok(())
    }
}

fn check_ranges(ranges: &[TickRange], what: &str) -> PowerResult<()> {
    for &[from, to] in ranges {
        if from >= to {
            return Err(PowerError::Scenario(format!(
                "empty {what} range [{from}, {to})"
            )));
        }
    }
    Ok(())
}

impl RegisterSource for Scenario {
    fn poll(&mut self, tick: u64, slots: usize) -> TickInputs {
        let mut inputs = TickInputs::new(slots)
            .with_alpha(self.alpha)
            .with_scan_override(in_ranges(&self.scan_override, tick));
        inputs.enabled.fill(false);

        for script in self.peripherals.iter().filter(|s| s.index < slots) {
            let i = script.index;
            inputs.enabled[i] = script.enabled && !in_ranges(&script.disabled, tick);
            inputs.base_threshold[i] = script.base_threshold;
            inputs.activity_pulse[i] = script.pulses.contains(&tick);
            inputs.wake_event[i] = script.wakes.contains(&tick);
        }
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        name = "two peripherals"
        ticks = 40
        alpha = 2
        scan_override = [[5, 7]]

        [system]
        slots = 4
        idle_width = 16
        window = 8

        [[peripheral]]
        index = 0
        base_threshold = 20
        pulses = [0, 12]
        wakes = [30]

        [[peripheral]]
        index = 2
        base_threshold = 4
        disabled = [[10, 15]]
    "#;

    #[test]
    #[should_panic]
    fn test_builder_panics_on_out_of_range_slot() {
        let _ = TickInputs::new(2).with_pulse(2);
    }

    #[test]
    fn test_builder() {
        let inputs = TickInputs::new(3)
            .with_pulse(0)
            .with_wake(1)
            .with_disabled(2)
            .with_thresholds(9)
            .with_threshold(1, 4)
            .with_alpha(3);
        assert_eq!(inputs.activity_pulse, vec![true, false, false]);
        assert_eq!(inputs.wake_event, vec![false, true, false]);
        assert_eq!(inputs.enabled, vec![true, true, false]);
        assert_eq!(inputs.base_threshold, vec![9, 4, 9]);
        assert_eq!(inputs.alpha, 3);
    }

    #[test]
    fn test_check_len() {
        let mut inputs = TickInputs::new(4);
        assert!(inputs.check_len(4).is_ok());
        inputs.wake_event.pop();
        assert!(matches!(
            inputs.check_len(4),
            Err(PowerError::InputLengthMismatch { field: "wake_event", expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_scenario_parse_and_poll() {
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        assert_eq!(scenario.ticks, 40);
        assert_eq!(scenario.peripherals.len(), 2);

        let t0 = scenario.poll(0, 4);
        assert_eq!(t0.enabled, vec![true, false, true, false]);
        assert!(t0.activity_pulse[0]);
        assert_eq!(t0.base_threshold[0], 20);
        assert_eq!(t0.alpha, 2);
        assert!(!t0.scan_override);

        let t5 = scenario.poll(5, 4);
        assert!(t5.scan_override);
        assert!(!t5.activity_pulse[0]);

        let t10 = scenario.poll(10, 4);
        assert!(!t10.enabled[2]);
        assert!(scenario.poll(15, 4).enabled[2]);
        assert!(scenario.poll(30, 4).wake_event[0]);
    }

    #[test]
    fn test_scenario_rejects_bad_index() {
        let bad = SCENARIO.replace("index = 2", "index = 9");
        assert!(matches!(Scenario::from_toml_str(&bad), Err(PowerError::Scenario(_))));
    }

    #[test]
    fn test_scenario_rejects_empty_range() {
        let bad = SCENARIO.replace("[[10, 15]]", "[[15, 10]]");
        assert!(matches!(Scenario::from_toml_str(&bad), Err(PowerError::Scenario(_))));
    }

    #[test]
    fn test_closure_source() {
        let mut source = |tick: u64, slots: usize| {
            let inputs = TickInputs::new(slots);
            if tick == 1 { inputs.with_pulse(0) } else { inputs }
        };
        assert!(!source.poll(0, 2).activity_pulse[0]);
        assert!(source.poll(1, 2).activity_pulse[0]);
    }
}
