//! Per-card state machines driven by a virtual clock.
//!
//! # Responsibility
//! - Mount/unmount cards and own their timers.
//! - Apply taps (flip toggle, one-shot effect reset) in issue order.
//! - Fire due timers when the caller advances the clock.
//!
//! # Invariants
//! - One `CardState` per `CardKey`; keys are never reused within an engine.
//! - Every timer handle is stored on its card; handlers ignore timers whose
//!   card is gone or whose handle no longer matches.
//! - Schedule times never overflow: a timer that would land past the end of
//!   the clock is not scheduled.
//! - Advancing over a long span costs at most a few cycles of each periodic
//!   timer; whole cycles are skipped without changing observable state.

use super::effect::{EffectMachine, EffectPhase};
use super::render::{back_face, detail_panel, front_face, CardView};
use super::timer::{Tick, TimerArena, TimerHandle};
use super::typewriter::{Typewriter, TypewriterTiming};
use crate::config::{CardConfig, DisplayConfig};
use crate::model::memory::{Memory, MemoryId};
use crate::style::effect::{resolve_effect, EffectMode};
use crate::style::{resolve_card_style, CardStyle};
use chrono::{FixedOffset, Offset, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;

/// Identity of one mounted card instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey(u64);

/// How a memory is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    /// Flip card with a typewriter prompt on the front.
    Flip,
    /// Everything at once, never flips.
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipState {
    Front,
    Back,
}

impl FlipState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardTimer {
    Arm(CardKey),
    PulseOn(CardKey),
    PulseOff(CardKey),
    Prompt(CardKey),
}

#[derive(Debug, Clone, Copy)]
struct EngineTiming {
    arm_delay: Tick,
    pulse_period: Tick,
    pulse_active: Tick,
    typewriter: TypewriterTiming,
    /// Full typewriter rotation; 0 without prompts.
    prompt_cycle: Tick,
}

/// State owned by one mounted card.
#[derive(Debug, Clone)]
pub struct CardState {
    memory: Memory,
    mode: CardMode,
    flip: FlipState,
    effect: Option<EffectMachine>,
    typewriter: Option<Typewriter>,
    style: CardStyle,
    effect_timer: Option<TimerHandle>,
    prompt_timer: Option<TimerHandle>,
}

impl CardState {
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn mode(&self) -> CardMode {
        self.mode
    }

    pub fn flip(&self) -> FlipState {
        self.flip
    }

    /// `None` when the memory has no applicable effect.
    pub fn effect_phase(&self) -> Option<EffectPhase> {
        self.effect.as_ref().map(EffectMachine::phase)
    }

    pub fn effect(&self) -> Option<&EffectMachine> {
        self.effect.as_ref()
    }

    pub fn shows_special_marker(&self) -> bool {
        self.effect.is_some()
    }

    pub fn prompt_index(&self) -> Option<usize> {
        self.typewriter.as_ref().map(Typewriter::prompt_index)
    }

    pub fn prompt_char_count(&self) -> Option<usize> {
        self.typewriter.as_ref().map(Typewriter::char_count)
    }

    pub fn prompt_deleting(&self) -> Option<bool> {
        self.typewriter.as_ref().map(Typewriter::is_deleting)
    }

    pub fn prompt_text(&self) -> String {
        self.typewriter
            .as_ref()
            .map(Typewriter::visible_text)
            .unwrap_or_default()
    }

    pub fn style(&self) -> CardStyle {
        self.style
    }
}

/// Owns every mounted card and the timers that drive them.
pub struct CardEngine {
    timing: EngineTiming,
    prompts: Arc<[String]>,
    offset: FixedOffset,
    now: Tick,
    timers: TimerArena<CardTimer>,
    cards: HashMap<CardKey, CardState>,
    next_key: u64,
    rng: StdRng,
}

impl CardEngine {
    /// Engine with an entropy-seeded prompt start index.
    pub fn new(card: &CardConfig, display: &DisplayConfig) -> Self {
        Self::with_rng(card, display, StdRng::from_entropy())
    }

    /// Engine with a reproducible prompt start index.
    pub fn with_seed(card: &CardConfig, display: &DisplayConfig, seed: u64) -> Self {
        Self::with_rng(card, display, StdRng::seed_from_u64(seed))
    }

    fn with_rng(card: &CardConfig, display: &DisplayConfig, rng: StdRng) -> Self {
        let prompts = card
            .prompts
            .iter()
            .map(|prompt| prompt.trim())
            .filter(|prompt| !prompt.is_empty())
            .map(str::to_string)
            .collect::<Arc<[String]>>();

        // Periodic timers must move the clock forward or `advance_to` spins.
        let pulse_period = card.pulse_period_ms.max(2);
        let typewriter = TypewriterTiming {
            type_ms: card.type_interval_ms.max(1),
            delete_ms: card.delete_interval_ms.max(1),
            pause_ms: card.prompt_pause_ms.max(1),
        };
        let prompt_cycle = Typewriter::new(Arc::clone(&prompts), 0)
            .map_or(0, |typewriter_state| typewriter_state.cycle_length(typewriter));
        Self {
            timing: EngineTiming {
                arm_delay: card.effect_arm_delay_ms,
                pulse_period,
                pulse_active: card.pulse_active_ms.clamp(1, pulse_period - 1),
                typewriter,
                prompt_cycle,
            },
            prompts,
            offset: FixedOffset::east_opt(display.utc_offset_minutes.saturating_mul(60))
                .unwrap_or_else(|| Utc.fix()),
            now: 0,
            timers: TimerArena::new(),
            cards: HashMap::new(),
            next_key: 0,
            rng,
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Mounts a card at the current time and acquires its timers.
    pub fn mount(&mut self, memory: Memory, mode: CardMode) -> CardKey {
        let key = CardKey(self.next_key);
        self.next_key += 1;

        let effect =
            resolve_effect(&memory.letter_style, memory.animation.as_deref()).map(EffectMachine::new);
        let effect_timer = effect.and_then(|effect| match effect.mode() {
            EffectMode::OneShot => self.schedule_after(self.timing.arm_delay, CardTimer::Arm(key)),
            EffectMode::Pulsing => {
                self.schedule_after(self.timing.pulse_period, CardTimer::PulseOn(key))
            }
        });

        let typewriter = match mode {
            CardMode::Flip if !self.prompts.is_empty() => {
                let start = self.rng.gen_range(0..self.prompts.len());
                Typewriter::new(Arc::clone(&self.prompts), start)
            }
            _ => None,
        };
        let prompt_timer = typewriter.as_ref().and_then(|_| {
            self.schedule_after(self.timing.typewriter.type_ms, CardTimer::Prompt(key))
        });

        debug!(
            "event=card_mount module=card status=ok card_key={} memory_id={} mode={:?} effect={}",
            key.0,
            memory.id,
            mode,
            effect.map_or("none", |effect| effect.effect().as_str())
        );

        let style = resolve_card_style(&memory.color, memory.full_background);
        self.cards.insert(
            key,
            CardState {
                memory,
                mode,
                flip: FlipState::Front,
                effect,
                typewriter,
                style,
                effect_timer,
                prompt_timer,
            },
        );
        key
    }

    /// Releases a card and cancels all of its timers.
    ///
    /// Returns `false` for unknown or already unmounted keys.
    pub fn unmount(&mut self, key: CardKey) -> bool {
        let Some(card) = self.cards.remove(&key) else {
            return false;
        };
        for handle in [card.effect_timer, card.prompt_timer].into_iter().flatten() {
            self.timers.cancel(handle);
        }
        debug!("event=card_unmount module=card status=ok card_key={}", key.0);
        true
    }

    /// Handles a tap: flips flip-mode cards and re-arms one-shot effects.
    ///
    /// Pulsing effects keep their cycle. Returns `false` for unknown keys.
    pub fn tap(&mut self, key: CardKey) -> bool {
        let Some(card) = self.cards.get_mut(&key) else {
            return false;
        };

        if card.mode == CardMode::Flip {
            card.flip = card.flip.toggled();
        }

        if let Some(effect) = card.effect.as_mut() {
            if effect.mode() == EffectMode::OneShot {
                effect.disarm();
                if let Some(handle) = card.effect_timer.take() {
                    self.timers.cancel(handle);
                }
                card.effect_timer = self
                    .now
                    .checked_add(self.timing.arm_delay)
                    .map(|due| self.timers.schedule(due, CardTimer::Arm(key)));
            }
        }
        true
    }

    /// Moves the clock forward by `delta` milliseconds.
    pub fn advance_by(&mut self, delta: Tick) {
        self.advance_to(self.now.saturating_add(delta));
    }

    /// Moves the clock to `target`, firing due timers in order.
    ///
    /// Targets in the past are ignored; the clock never runs backwards.
    pub fn advance_to(&mut self, target: Tick) {
        self.skip_whole_cycles(target);
        while let Some((handle, due, timer)) = self.timers.pop_due(target) {
            self.now = due;
            self.fire(handle, timer);
        }
        self.now = self.now.max(target);
    }

    pub fn card(&self, key: CardKey) -> Option<&CardState> {
        self.cards.get(&key)
    }

    /// Keys of mounted cards showing `id`.
    pub fn cards_for(&self, id: MemoryId) -> Vec<CardKey> {
        let mut keys = self
            .cards
            .iter()
            .filter(|(_, card)| card.memory.id == id)
            .map(|(key, _)| *key)
            .collect::<Vec<_>>();
        keys.sort();
        keys
    }

    pub fn mounted_count(&self) -> usize {
        self.cards.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Renders the visible side of a card.
    pub fn view(&self, key: CardKey) -> Option<CardView> {
        let card = self.cards.get(&key)?;
        let effect = card.effect.as_ref();
        let view = match (card.mode, card.flip) {
            (CardMode::Detail, _) => {
                CardView::Detail(detail_panel(&card.memory, effect, card.style, self.offset))
            }
            (CardMode::Flip, FlipState::Front) => CardView::Front(front_face(
                &card.memory,
                effect,
                card.prompt_text(),
                card.style,
                self.offset,
            )),
            (CardMode::Flip, FlipState::Back) => {
                CardView::Back(back_face(&card.memory, effect, card.style, self.offset))
            }
        };
        Some(view)
    }

    fn schedule_after(&mut self, delay: Tick, timer: CardTimer) -> Option<TimerHandle> {
        let due = self.now.checked_add(delay)?;
        Some(self.timers.schedule(due, timer))
    }

    /// Moves periodic timers forward by whole periods so that each one is
    /// left with less than two periods to run before `target`.
    fn skip_whole_cycles(&mut self, target: Tick) {
        let pulse_period = self.timing.pulse_period;
        let prompt_cycle = self.timing.prompt_cycle;
        for card in self.cards.values_mut() {
            if card.effect.is_some_and(|effect| effect.mode() == EffectMode::Pulsing) {
                card.effect_timer = card
                    .effect_timer
                    .map(|handle| shift_by_periods(&mut self.timers, handle, target, pulse_period));
            }
            card.prompt_timer = card
                .prompt_timer
                .map(|handle| shift_by_periods(&mut self.timers, handle, target, prompt_cycle));
        }
    }

    fn fire(&mut self, handle: TimerHandle, timer: CardTimer) {
        let (CardTimer::Arm(key)
        | CardTimer::PulseOn(key)
        | CardTimer::PulseOff(key)
        | CardTimer::Prompt(key)) = timer;
        let Some(card) = self.cards.get_mut(&key) else {
            return;
        };
        let now = self.now;

        match timer {
            CardTimer::Arm(_) | CardTimer::PulseOn(_) | CardTimer::PulseOff(_) => {
                if card.effect_timer != Some(handle) {
                    return;
                }
                card.effect_timer = None;
                let Some(effect) = card.effect.as_mut() else {
                    return;
                };
                match timer {
                    CardTimer::Arm(_) => effect.arm(),
                    CardTimer::PulseOn(_) => {
                        effect.arm();
                        card.effect_timer = now
                            .checked_add(self.timing.pulse_active)
                            .map(|due| self.timers.schedule(due, CardTimer::PulseOff(key)));
                    }
                    _ => {
                        effect.disarm();
                        card.effect_timer = now
                            .checked_add(self.timing.pulse_period - self.timing.pulse_active)
                            .map(|due| self.timers.schedule(due, CardTimer::PulseOn(key)));
                    }
                }
            }
            CardTimer::Prompt(_) => {
                if card.prompt_timer != Some(handle) {
                    return;
                }
                let Some(typewriter) = card.typewriter.as_mut() else {
                    card.prompt_timer = None;
                    return;
                };
                let delay = typewriter.step(self.timing.typewriter);
                card.prompt_timer = now
                    .checked_add(delay)
                    .map(|due| self.timers.schedule(due, CardTimer::Prompt(key)));
            }
        }
    }
}

/// Reschedules `handle` whole `period`s later while it would still fire at
/// least twice before `target`. Returns the handle now tracking the timer.
fn shift_by_periods(
    timers: &mut TimerArena<CardTimer>,
    handle: TimerHandle,
    target: Tick,
    period: Tick,
) -> TimerHandle {
    let Some(due) = timers.due(handle) else {
        return handle;
    };
    if period == 0 || due >= target {
        return handle;
    }
    let periods = (target - due) / period;
    if periods < 2 {
        return handle;
    }
    match timers.cancel(handle) {
        Some(timer) => timers.schedule(due + (periods - 1) * period, timer),
        None => handle,
    }
}
