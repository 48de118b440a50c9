//! Sistema de controle de energia: N slots avançando em ticks síncronos
//!
//! Cada tick segue uma disciplina de duas fases:
//!
//! 1. **avaliar**: todo valor "próximo" (monitor, elegibilidade registrada,
//!    FSM) é calculado a partir do snapshot congelado pré-tick;
//! 2. **comprometer**: todos os slots trocam de estado na mesma borda.
//!
//! Depois do commit os observadores amostram o estado comprometido: o gate de
//! clock (cujo latch amostra na meia-fase inativa) e os contadores.

use crate::clock_gate::{ClockGate, effective_enable};
use crate::config::SystemConfig;
use crate::config::limits::ALPHA_MAX;
use crate::counters::PerformanceCounters;
use crate::error::{PowerError, PowerResult};
use crate::events::PowerEvent;
use crate::fsm::{FsmInputs, FsmStep, PowerStateMachine};
use crate::monitor::{ActivityMonitor, ActivityNext};
use crate::predictor::{IdlePredictor, Prediction};
use crate::report::PowerReport;
use crate::saturating::clamp_to_width;
use crate::slot::{PeripheralSlot, PowerState, StateReg};
use crate::snapshot::SystemSnapshot;
use crate::stimulus::{RegisterSource, TickInputs};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Saídas de um tick (após o commit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutputs {
    /// Índice do tick recém-concluído (1 = primeiro após reset)
    pub tick: u64,
    pub state: Vec<PowerState>,
    pub clk_request: Vec<bool>,
    pub gated_level: Vec<bool>,
    pub idle_count: Vec<u64>,
    pub recent_activity: Vec<bool>,
    /// Limiar adaptativo calculado neste tick
    pub adaptive_threshold: Vec<u64>,
    /// Elegibilidade registrada que a FSM verá no próximo tick
    pub sleep_eligible: Vec<bool>,
    pub active_cycles: Vec<u64>,
    pub idle_cycles: Vec<u64>,
    pub sleep_entries: Vec<u64>,
    pub events: Vec<PowerEvent>,
}

impl TickOutputs {
    fn with_capacity(tick: u64, slots: usize) -> Self {
        Self {
            tick,
            state: Vec::with_capacity(slots),
            clk_request: Vec::with_capacity(slots),
            gated_level: Vec::with_capacity(slots),
            idle_count: Vec::with_capacity(slots),
            recent_activity: Vec::with_capacity(slots),
            adaptive_threshold: Vec::with_capacity(slots),
            sleep_eligible: Vec::with_capacity(slots),
            active_cycles: Vec::with_capacity(slots),
            idle_cycles: Vec::with_capacity(slots),
            sleep_entries: Vec::with_capacity(slots),
            events: Vec::new(),
        }
    }

    fn push(&mut self, slot: &PeripheralSlot) {
        self.state.push(slot.power_state());
        self.clk_request.push(slot.clk_request);
        self.gated_level.push(slot.gated_level);
        self.idle_count.push(slot.idle_count);
        self.recent_activity.push(slot.recent_activity);
        self.adaptive_threshold.push(slot.adaptive_threshold);
        self.sleep_eligible.push(slot.sleep_eligible);
        self.active_cycles.push(slot.counters.active_cycles);
        self.idle_cycles.push(slot.counters.idle_cycles);
        self.sleep_entries.push(slot.counters.sleep_entries);
    }
}

/// Entradas de um slot já grampeadas nas larguras dos registradores
#[derive(Debug, Clone, Copy)]
struct SlotInput {
    activity_pulse: bool,
    enabled: bool,
    base_threshold: u64,
    wake_event: bool,
    alpha: u8,
}

/// Valores "próximos" de um slot calculados na fase de avaliação
#[derive(Debug, Clone, Copy)]
struct SlotNext {
    input: SlotInput,
    activity: ActivityNext,
    prediction: Prediction,
    fsm: FsmStep,
}

/// Sistema completo de N periféricos
#[derive(Debug, Clone)]
pub struct PowerSystem {
    config: SystemConfig,
    slots: Vec<PeripheralSlot>,
    gates: Vec<ClockGate>,
    tick: u64,
    monitor: ActivityMonitor,
    predictor: IdlePredictor,
    fsm: PowerStateMachine,
    counters: PerformanceCounters,
}

impl PowerSystem {
    /// Constrói o sistema; configuração inválida falha sem construção parcial
    pub fn new(config: SystemConfig) -> PowerResult<Self> {
        config.validate()?;

        info!(
            slots = config.slots,
            idle_width = config.idle_width,
            window = config.window,
            counter_width = config.counter_width,
            phase_width = config.phase_width,
            "power system constructed"
        );

        Ok(Self {
            slots: vec![PeripheralSlot::new(); config.slots],
            gates: vec![ClockGate::new(config.phase_width); config.slots],
            tick: 0,
            monitor: ActivityMonitor::new(config.window, config.idle_width),
            predictor: IdlePredictor::new(config.idle_width),
            fsm: PowerStateMachine::new(),
            counters: PerformanceCounters::new(config.counter_width),
            config,
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn slots(&self) -> &[PeripheralSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&PeripheralSlot> {
        self.slots.get(index)
    }

    pub fn gates(&self) -> &[ClockGate] {
        &self.gates
    }

    /// Ticks desde o último reset
    pub fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// Reset síncrono: todos os slots voltam ao estado canônico
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
        for gate in &mut self.gates {
            gate.reset();
        }
        self.tick = 0;
        info!(slots = self.slots.len(), "power system reset");
    }

    /// Avança um tick com as entradas externas congeladas
    pub fn tick(&mut self, inputs: &TickInputs) -> PowerResult<TickOutputs> {
        inputs.check_len(self.slots.len())?;

        // Fase 1: avaliar tudo a partir do estado pré-tick
        let next: Vec<SlotNext> = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| self.evaluate(slot, self.slot_input(inputs, i)))
            .collect();

        // Fase 2: commit atômico
        self.tick += 1;
        let mut outputs = TickOutputs::with_capacity(self.tick, self.slots.len());

        for (i, ((slot, gate), next)) in self
            .slots
            .iter_mut()
            .zip(self.gates.iter_mut())
            .zip(next)
            .enumerate()
        {
            let prev_state = slot.state;
            Self::commit(slot, &next, &self.fsm);

            // Observadores sobre o estado comprometido
            slot.gated_level = gate.tick(effective_enable(slot.clk_request, inputs.scan_override));
            let observation = self.counters.observe(&slot.counters, slot.prev_state, slot.state);
            slot.counters = observation.counters;
            slot.residency.record(next.fsm.next);

            if let Some(raw) = next.fsm.healed_from {
                warn!(slot = i, raw, to = %next.fsm.next, "illegal state encoding self-healed");
                outputs.events.push(PowerEvent::SelfHealed {
                    slot: i,
                    raw,
                    to: next.fsm.next,
                });
            } else if let Some(from) = prev_state.decode() {
                if from != next.fsm.next {
                    debug!(slot = i, %from, to = %next.fsm.next, tick = self.tick, "state transition");
                    outputs.events.push(PowerEvent::Transition {
                        slot: i,
                        from,
                        to: next.fsm.next,
                    });
                }
            }
            if observation.sleep_entry {
                outputs.events.push(PowerEvent::SleepEntry { slot: i });
            }

            outputs.push(slot);
        }

        trace!(tick = self.tick, events = outputs.events.len(), "tick committed");
        Ok(outputs)
    }

    /// Consulta a fonte externa e avança um tick
    pub fn step_from<S: RegisterSource + ?Sized>(&mut self, source: &mut S) -> PowerResult<TickOutputs> {
        let inputs = source.poll(self.tick, self.slots.len());
        self.tick(&inputs)
    }

    /// Avança `ticks` ticks consultando a fonte; retorna as saídas do último
    pub fn run<S: RegisterSource + ?Sized>(
        &mut self,
        source: &mut S,
        ticks: u64,
    ) -> PowerResult<Option<TickOutputs>> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step_from(source)?);
        }
        Ok(last)
    }

    /// Captura todo o estado interno para replay determinístico
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            config: self.config,
            tick: self.tick,
            slots: self.slots.clone(),
            gates: self.gates.clone(),
        }
    }

    /// Restaura um snapshot; em caso de erro o sistema fica intacto
    pub fn restore(&mut self, snapshot: &SystemSnapshot) -> PowerResult<()> {
        if snapshot.config != self.config {
            return Err(PowerError::SnapshotMismatch(format!(
                "config {:?} does not match system config {:?}",
                snapshot.config, self.config
            )));
        }
        if snapshot.slots.len() != self.config.slots || snapshot.gates.len() != self.config.slots {
            return Err(PowerError::SnapshotMismatch(format!(
                "expected {} slots and gates, got {} slots and {} gates",
                self.config.slots,
                snapshot.slots.len(),
                snapshot.gates.len()
            )));
        }
        if let Some(gate) = snapshot
            .gates
            .iter()
            .find(|g| g.phase_width() != self.config.phase_width)
        {
            return Err(PowerError::SnapshotMismatch(format!(
                "gate phase width {} differs from configured {}",
                gate.phase_width(),
                self.config.phase_width
            )));
        }

        if let Some((index, gate)) = snapshot
            .gates
            .iter()
            .enumerate()
            .find(|(_, g)| !g.is_aligned())
        {
            return Err(PowerError::SnapshotMismatch(format!(
                "gate {} position {} outside phase width {}",
                index,
                gate.position(),
                gate.phase_width()
            )));
        }

        self.slots = snapshot.slots.clone();
        self.gates = snapshot.gates.clone();
        self.tick = snapshot.tick;
        info!(tick = self.tick, "power system restored from snapshot");
        Ok(())
    }

    /// Relatório de ocupação a partir dos contadores
    pub fn report(&self, name: impl Into<String>) -> PowerReport {
        PowerReport::from_system(name, self)
    }

    fn slot_input(&self, inputs: &TickInputs, i: usize) -> SlotInput {
        SlotInput {
            activity_pulse: inputs.activity_pulse[i],
            enabled: inputs.enabled[i],
            base_threshold: clamp_to_width(inputs.base_threshold[i], self.config.idle_width),
            wake_event: inputs.wake_event[i],
            alpha: inputs.alpha.min(ALPHA_MAX),
        }
    }

    /// Função pura por slot: só lê o estado pré-tick
    fn evaluate(&self, slot: &PeripheralSlot, input: SlotInput) -> SlotNext {
        let activity = self.monitor.next(
            slot.idle_count,
            slot.activity_timer,
            input.activity_pulse,
            input.enabled,
        );

        let prediction = self.predictor.predict(
            slot.idle_count,
            input.base_threshold,
            slot.recent_activity,
            input.alpha,
        );

        let fsm = self.fsm.next_state(
            slot.state,
            FsmInputs {
                enabled: input.enabled,
                wake_event: input.wake_event,
                sleep_eligible: slot.sleep_eligible,
            },
        );

        SlotNext {
            input,
            activity,
            prediction,
            fsm,
        }
    }

    fn commit(slot: &mut PeripheralSlot, next: &SlotNext, fsm: &PowerStateMachine) {
        let input = next.input;
        let state = StateReg::from(next.fsm.next);

        slot.enabled = input.enabled;
        slot.base_threshold = input.base_threshold;
        slot.alpha = input.alpha;
        slot.wake_event = input.wake_event;

        slot.idle_count = next.activity.idle_count;
        slot.activity_timer = next.activity.activity_timer;
        slot.recent_activity = next.activity.recent_activity(input.enabled);

        slot.adaptive_threshold = next.prediction.adaptive_threshold;
        slot.sleep_eligible = next.prediction.eligible_now;

        slot.prev_state = slot.state;
        slot.state = state;
        slot.clk_request = fsm.clk_request(input.enabled, state);
    }
}
