//! Monitor de atividade (ActivityMonitor)
//!
//! Deriva a duração de ociosidade e o sinal de atividade recente a partir do
//! pulso de atividade de cada tick. Regras, em ordem de prioridade:
//!
//! 1. desabilitado: zera `idle_count` e `activity_timer`
//! 2. pulso: zera `idle_count` e recarrega o timer com `WINDOW + 1`
//! 3. caso contrário `idle_count` incrementa, saturando em `2^W - 1`
//!
//! Sem pulso, o timer decrementa um por tick até zero.

use crate::saturating::{saturating_inc, timer_bits, width_max};

/// Valores registrados calculados pelo monitor para o próximo tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityNext {
    pub idle_count: u64,
    pub activity_timer: u32,
}

impl ActivityNext {
    /// Atividade recente vista depois do commit
    pub fn recent_activity(&self, enabled: bool) -> bool {
        ActivityMonitor::recent_activity(self.activity_timer, enabled)
    }
}

/// Monitor de atividade parametrizado por WINDOW e W
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityMonitor {
    window: u32,
    idle_width: u32,
}

impl ActivityMonitor {
    pub fn new(window: u32, idle_width: u32) -> Self {
        Self { window, idle_width }
    }

    /// Valor recarregado no timer a cada pulso
    pub fn reload(&self) -> u32 {
        self.window + 1
    }

    /// Valor de saturação de `idle_count`
    pub fn idle_max(&self) -> u64 {
        width_max(self.idle_width)
    }

    /// Largura do registrador `activity_timer` em bits
    pub fn timer_width(&self) -> u32 {
        timer_bits(self.window)
    }

    /// Calcula o próximo `idle_count`/`activity_timer` a partir do estado atual
    pub fn next(
        &self,
        idle_count: u64,
        activity_timer: u32,
        activity_pulse: bool,
        enabled: bool,
    ) -> ActivityNext {
        if !enabled {
            return ActivityNext {
                idle_count: 0,
                activity_timer: 0,
            };
        }

        if activity_pulse {
            return ActivityNext {
                idle_count: 0,
                activity_timer: self.reload(),
            };
        }

        ActivityNext {
            idle_count: saturating_inc(idle_count, self.idle_width),
            activity_timer: activity_timer.saturating_sub(1),
        }
    }

    /// `recent_activity = activity_timer > 0 && enabled`
    pub fn recent_activity(activity_timer: u32, enabled: bool) -> bool {
        activity_timer > 0 && enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> ActivityMonitor {
        ActivityMonitor::new(8, 16)
    }

    #[test]
    fn test_idle_count_increments() {
        let m = monitor();
        let mut idle = 0;
        let mut timer = 0;
        for expected in 1..=10 {
            let next = m.next(idle, timer, false, true);
            idle = next.idle_count;
            timer = next.activity_timer;
            assert_eq!(idle, expected);
        }
    }

    #[test]
    fn test_disable_beats_pulse() {
        let next = monitor().next(100, 5, true, false);
        assert_eq!(next.idle_count, 0);
        assert_eq!(next.activity_timer, 0);
        assert!(!next.recent_activity(false));
    }

    #[test]
    fn test_pulse_resets_and_reloads() {
        let next = monitor().next(37, 0, true, true);
        assert_eq!(next.idle_count, 0);
        assert_eq!(next.activity_timer, 9);
        assert!(u64::from(next.activity_timer) <= width_max(monitor().timer_width()));
        assert!(next.recent_activity(true));
    }

    #[test]
    fn test_recent_activity_window_length() {
        let m = monitor();
        let mut state = m.next(0, 0, true, true);
        let mut asserted = 1; // tick do pulso
        loop {
            state = m.next(state.idle_count, state.activity_timer, false, true);
            if !state.recent_activity(true) {
                break;
            }
            asserted += 1;
        }
        // tick do pulso + WINDOW ticks seguintes
        assert_eq!(asserted, 1 + 8);
    }

    #[test]
    fn test_new_pulse_reloads_not_extends() {
        let m = monitor();
        let first = m.next(0, 0, true, true);
        let mid = m.next(first.idle_count, first.activity_timer, false, true);
        let mid = m.next(mid.idle_count, mid.activity_timer, false, true);
        assert_eq!(mid.activity_timer, 7);
        let again = m.next(mid.idle_count, mid.activity_timer, true, true);
        assert_eq!(again.activity_timer, m.reload());
    }

    #[test]
    fn test_idle_count_saturates() {
        let m = ActivityMonitor::new(1, 2);
        let mut idle = 0;
        for _ in 0..10 {
            idle = m.next(idle, 0, false, true).idle_count;
        }
        assert_eq!(idle, m.idle_max());
        assert_eq!(m.next(idle, 0, false, true).idle_count, 3);
    }
}
