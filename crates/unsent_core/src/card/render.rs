//! Rendered card faces and the detail panel.
//!
//! Views are plain data: the caller's UI layer maps tokens to markup.

use super::effect::EffectMachine;
use crate::model::memory::Memory;
use crate::style::effect::SPECIAL_MARKER;
use crate::style::{CardStyle, ColorValue};
use chrono::{DateTime, FixedOffset};

/// Date, weekday, time and color label shown under every card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub date: String,
    pub weekday: String,
    pub time: String,
    pub color_label: String,
}

impl Footer {
    pub fn new(created_at_ms: i64, color: &str, offset: FixedOffset) -> Self {
        let color_label = color.to_string();
        match DateTime::from_timestamp_millis(created_at_ms) {
            Some(utc) => {
                let local = utc.with_timezone(&offset);
                Self {
                    date: local.format("%Y-%m-%d").to_string(),
                    weekday: local.format("%A").to_string(),
                    time: local.format("%H:%M:%S").to_string(),
                    color_label,
                }
            }
            None => Self {
                date: "unknown".to_string(),
                weekday: "unknown".to_string(),
                time: "unknown".to_string(),
                color_label,
            },
        }
    }

    /// `Date: .. | Day: .. | Time: .. | Color: ..`
    pub fn line(&self) -> String {
        format!(
            "Date: {} | Day: {} | Time: {} | Color: {}",
            self.date, self.weekday, self.time, self.color_label
        )
    }
}

/// Marker glyph flagging a memory with a text effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialMarker {
    pub glyph: char,
    pub color: ColorValue,
}

/// Message text plus the effect class currently applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Verbatim message, line breaks included.
    pub text: String,
    /// `None` while the effect is waiting or when there is no effect.
    pub effect_class: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontFace {
    pub recipient_line: String,
    pub sender_line: Option<String>,
    pub special_marker: Option<SpecialMarker>,
    pub footer: Footer,
    pub prompt: String,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackFace {
    pub message: RenderedMessage,
    pub footer: Footer,
    pub style: CardStyle,
}

/// Non-flipping single memory view used for deep links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub recipient_line: String,
    pub message: RenderedMessage,
    pub attribution: Option<String>,
    pub special_marker: Option<SpecialMarker>,
    pub footer: Footer,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Front(FrontFace),
    Back(BackFace),
    Detail(DetailPanel),
}

pub(crate) fn front_face(
    memory: &Memory,
    effect: Option<&EffectMachine>,
    prompt: String,
    style: CardStyle,
    offset: FixedOffset,
) -> FrontFace {
    FrontFace {
        recipient_line: recipient_line(memory),
        sender_line: memory
            .sender
            .as_deref()
            .map(|sender| format!("From: {sender}")),
        special_marker: special_marker(effect, style),
        footer: Footer::new(memory.created_at, &memory.color, offset),
        prompt,
        style,
    }
}

pub(crate) fn back_face(
    memory: &Memory,
    effect: Option<&EffectMachine>,
    style: CardStyle,
    offset: FixedOffset,
) -> BackFace {
    BackFace {
        message: rendered_message(memory, effect),
        footer: Footer::new(memory.created_at, &memory.color, offset),
        style,
    }
}

pub(crate) fn detail_panel(
    memory: &Memory,
    effect: Option<&EffectMachine>,
    style: CardStyle,
    offset: FixedOffset,
) -> DetailPanel {
    DetailPanel {
        recipient_line: recipient_line(memory),
        message: rendered_message(memory, effect),
        attribution: memory
            .sender
            .as_deref()
            .map(|sender| format!("\u{2014} {sender}")),
        special_marker: special_marker(effect, style),
        footer: Footer::new(memory.created_at, &memory.color, offset),
        style,
    }
}

fn recipient_line(memory: &Memory) -> String {
    format!("To: {}", memory.recipient)
}

fn rendered_message(memory: &Memory, effect: Option<&EffectMachine>) -> RenderedMessage {
    RenderedMessage {
        text: memory.message.clone(),
        effect_class: effect.and_then(EffectMachine::applied_class),
    }
}

fn special_marker(effect: Option<&EffectMachine>, style: CardStyle) -> Option<SpecialMarker> {
    effect.map(|_| SpecialMarker {
        glyph: SPECIAL_MARKER,
        color: style.accent,
    })
}
