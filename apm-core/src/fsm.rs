//! Máquina de estados de energia (ACTIVE / IDLE / SLEEP)
//!
//! Prioridade estrita por tick:
//!
//! 1. `!enabled` → SLEEP
//! 2. `wake_event` → ACTIVE
//! 3. tabela de transição sobre o estado atual; codificação ilegal → ACTIVE

use crate::slot::{PowerState, StateReg};

/// Entradas da FSM para um tick (todas registradas)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsmInputs {
    pub enabled: bool,
    pub wake_event: bool,
    pub sleep_eligible: bool,
}

/// Próximo estado e, se houve, a codificação ilegal corrigida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsmStep {
    pub next: PowerState,
    pub healed_from: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerStateMachine;

impl PowerStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Calcula o próximo estado a partir do registrador atual
    pub fn next_state(&self, current: StateReg, inputs: FsmInputs) -> FsmStep {
        let decoded = current.decode();
        let healed_from = match decoded {
            Some(_) => None,
            None => Some(current.raw()),
        };

        let next = if !inputs.enabled {
            PowerState::Sleep
        } else if inputs.wake_event {
            PowerState::Active
        } else {
            match decoded {
                Some(PowerState::Active) if inputs.sleep_eligible => PowerState::Idle,
                Some(PowerState::Active) => PowerState::Active,
                Some(PowerState::Idle) if inputs.sleep_eligible => PowerState::Sleep,
                Some(PowerState::Idle) => PowerState::Active,
                Some(PowerState::Sleep) => PowerState::Sleep,
                None => PowerState::Active,
            }
        };

        FsmStep { next, healed_from }
    }

    /// `clk_request = enabled && (ACTIVE || IDLE)`
    pub fn clk_request(&self, enabled: bool, state: StateReg) -> bool {
        enabled && state.decode().is_some_and(PowerState::wants_clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PowerState; 3] = [PowerState::Active, PowerState::Idle, PowerState::Sleep];

    fn inputs(enabled: bool, wake_event: bool, sleep_eligible: bool) -> FsmInputs {
        FsmInputs {
            enabled,
            wake_event,
            sleep_eligible,
        }
    }

    #[test]
    fn test_transition_table() {
        let fsm = PowerStateMachine::new();
        let cases = [
            (PowerState::Active, false, PowerState::Active),
            (PowerState::Active, true, PowerState::Idle),
            (PowerState::Idle, false, PowerState::Active),
            (PowerState::Idle, true, PowerState::Sleep),
            (PowerState::Sleep, false, PowerState::Sleep),
            (PowerState::Sleep, true, PowerState::Sleep),
        ];
        for (from, eligible, to) in cases {
            let step = fsm.next_state(from.into(), inputs(true, false, eligible));
            assert_eq!(step.next, to, "{from} eligible={eligible}");
            assert_eq!(step.healed_from, None);
        }
    }

    #[test]
    fn test_disable_dominates() {
        let fsm = PowerStateMachine::new();
        for from in ALL {
            for wake in [false, true] {
                for eligible in [false, true] {
                    let step = fsm.next_state(from.into(), inputs(false, wake, eligible));
                    assert_eq!(step.next, PowerState::Sleep);
                }
            }
        }
    }

    #[test]
    fn test_wake_dominates_table() {
        let fsm = PowerStateMachine::new();
        for from in ALL {
            for eligible in [false, true] {
                let step = fsm.next_state(from.into(), inputs(true, true, eligible));
                assert_eq!(step.next, PowerState::Active);
            }
        }
    }

    #[test]
    fn test_active_idle_sleep_sequence() {
        let fsm = PowerStateMachine::new();
        let step1 = fsm.next_state(PowerState::Active.into(), inputs(true, false, true));
        assert_eq!(step1.next, PowerState::Idle);
        assert!(fsm.clk_request(true, step1.next.into()));

        let step2 = fsm.next_state(step1.next.into(), inputs(true, false, true));
        assert_eq!(step2.next, PowerState::Sleep);
        assert!(!fsm.clk_request(true, step2.next.into()));
    }

    #[test]
    fn test_illegal_encoding_heals() {
        let fsm = PowerStateMachine::new();
        let step = fsm.next_state(StateReg::from_raw(3), inputs(true, false, true));
        assert_eq!(step.next, PowerState::Active);
        assert_eq!(step.healed_from, Some(3));

        let disabled = fsm.next_state(StateReg::from_raw(3), inputs(false, false, false));
        assert_eq!(disabled.next, PowerState::Sleep);
        assert_eq!(disabled.healed_from, Some(3));
    }

    #[test]
    fn test_clk_request() {
        let fsm = PowerStateMachine::new();
        assert!(fsm.clk_request(true, PowerState::Active.into()));
        assert!(fsm.clk_request(true, PowerState::Idle.into()));
        assert!(!fsm.clk_request(true, PowerState::Sleep.into()));
        assert!(!fsm.clk_request(false, PowerState::Active.into()));
        assert!(!fsm.clk_request(true, StateReg::from_raw(3)));
    }
}
