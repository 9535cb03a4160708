//! Effect arming state for one card.

use crate::style::effect::{EffectMode, TextEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    Waiting,
    Active,
}

/// Arming state of a resolved text effect; timing lives in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectMachine {
    effect: TextEffect,
    phase: EffectPhase,
}

impl EffectMachine {
    pub fn new(effect: TextEffect) -> Self {
        Self {
            effect,
            phase: EffectPhase::Waiting,
        }
    }

    pub fn effect(&self) -> TextEffect {
        self.effect
    }

    pub fn mode(&self) -> EffectMode {
        self.effect.mode()
    }

    pub fn phase(&self) -> EffectPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == EffectPhase::Active
    }

    pub fn arm(&mut self) {
        self.phase = EffectPhase::Active;
    }

    pub fn disarm(&mut self) {
        self.phase = EffectPhase::Waiting;
    }

    /// Class for the message text: only while active.
    pub fn applied_class(&self) -> Option<&'static str> {
        self.is_active().then(|| self.effect.class_token())
    }
}
