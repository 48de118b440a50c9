//! # 🔋 APM-Core: Gerenciamento Adaptativo de Energia por Periférico
//!
//! Modelo lógico em tempo discreto do bloco de gerenciamento de energia:
//! observa atividade, prevê quando um periférico pode dormir, conduz a
//! decisão de habilitação de clock por um gate sem glitch e contabiliza a
//! ocupação dos estados de energia.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       PowerSystem (N slots)                      │
//! │                                                                  │
//! │  pulse ──► ┌─────────────────┐ idle_count   ┌───────────────┐    │
//! │            │ ActivityMonitor │─────────────►│ IdlePredictor │    │
//! │            └─────────────────┘ recent_act.  └───────┬───────┘    │
//! │                                       sleep_eligible│ (reg, +1)  │
//! │  wake, enable ───────────────────────────────────┐  ▼            │
//! │                                           ┌──────────────────┐   │
//! │                                           │ PowerStateMachine│   │
//! │                                           └────────┬─────────┘   │
//! │                                        clk_request │  state      │
//! │                      scan_override ──►┌────────────▼┐   │        │
//! │                                       │ ClockGate   │   ▼        │
//! │                                       └─────┬───────┘ ┌────────┐ │
//! │                                   gated_level│        │Counters│ │
//! │                                             ▼         └────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Uso
//!
//! ```
//! use apm_core::{PowerSystem, PowerState, SystemConfig, TickInputs};
//!
//! let mut system = PowerSystem::new(SystemConfig::new(4, 16, 8, 32))?;
//! let inputs = TickInputs::new(4).with_thresholds(20).with_alpha(2);
//!
//! let out = system.tick(&inputs)?;
//! assert_eq!(out.idle_count[0], 1);
//! assert_eq!(out.state[0], PowerState::Active);
//! # Ok::<(), apm_core::PowerError>(())
//! ```

pub mod clock_gate;
pub mod config;
pub mod counters;
pub mod error;
pub mod events;
pub mod fsm;
pub mod monitor;
pub mod predictor;
pub mod report;
pub mod saturating;
pub mod slot;
pub mod snapshot;
pub mod stimulus;
pub mod system;

// Re-exports
pub use clock_gate::{ClockGate, Phase, effective_enable};
pub use config::SystemConfig;
pub use counters::{PerfCounters, PerformanceCounters, Residency};
pub use error::{PowerError, PowerResult};
pub use events::PowerEvent;
pub use fsm::{FsmInputs, FsmStep, PowerStateMachine};
pub use monitor::{ActivityMonitor, ActivityNext};
pub use predictor::{IdlePredictor, Prediction};
pub use report::{PowerReport, SlotReport};
pub use saturating::saturating_add;
pub use slot::{PeripheralSlot, PowerState, StateReg};
pub use snapshot::SystemSnapshot;
pub use stimulus::{PeripheralScript, RegisterSource, Scenario, TickInputs};
pub use system::{PowerSystem, TickOutputs};
