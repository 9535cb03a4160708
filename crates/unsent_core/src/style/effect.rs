//! Text effect and letter style tables.
//!
//! `letter_style` is a category and `animation` must belong to that
//! category's allowed set. `default` admits every effect, `sad` admits the
//! darker effects and `love` the warmer ones. An effect outside its category,
//! or an unknown identifier, resolves to no effect at all.

use std::fmt::{Display, Formatter};

/// Glyph shown on the card front when a memory carries an effect.
pub const SPECIAL_MARKER: char = '✦';

/// Timed treatment applied to a memory's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEffect {
    Bleeding,
    Handwritten,
    Glitch,
    Vanishing,
    Neon,
    Shattering,
}

/// How an armed effect behaves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMode {
    /// Arms once after a quiet period; a tap re-arms from scratch.
    OneShot,
    /// Flashes active on a fixed period until the card goes away.
    Pulsing,
}

const ALL_EFFECTS: [TextEffect; 6] = [
    TextEffect::Bleeding,
    TextEffect::Handwritten,
    TextEffect::Glitch,
    TextEffect::Vanishing,
    TextEffect::Neon,
    TextEffect::Shattering,
];

impl TextEffect {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        ALL_EFFECTS
            .into_iter()
            .find(|effect| effect.as_str().eq_ignore_ascii_case(value))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bleeding => "bleeding",
            Self::Handwritten => "handwritten",
            Self::Glitch => "glitch",
            Self::Vanishing => "vanishing",
            Self::Neon => "neon",
            Self::Shattering => "shattering",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bleeding => "Bleeding Text Effect",
            Self::Handwritten => "Handwritten Text Effect",
            Self::Glitch => "Glitch Text Effect",
            Self::Vanishing => "Vanishing Text Effect",
            Self::Neon => "Neon Text Effect",
            Self::Shattering => "Shattering Text Effect",
        }
    }

    /// Class applied to the message text while the effect is active.
    pub fn class_token(self) -> &'static str {
        match self {
            Self::Bleeding => "effect-bleeding",
            Self::Handwritten => "effect-handwritten",
            Self::Glitch => "effect-glitch",
            Self::Vanishing => "effect-vanishing",
            Self::Neon => "effect-neon",
            Self::Shattering => "effect-shattering",
        }
    }

    pub fn mode(self) -> EffectMode {
        match self {
            Self::Shattering => EffectMode::Pulsing,
            _ => EffectMode::OneShot,
        }
    }
}

impl Display for TextEffect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter category scoping which effects apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterStyle {
    Default,
    Sad,
    Love,
}

impl LetterStyle {
    /// Unknown identifiers fall back to `Default`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sad" => Self::Sad,
            "love" => Self::Love,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sad => "sad",
            Self::Love => "love",
        }
    }

    pub fn admits(self, effect: TextEffect) -> bool {
        match self {
            Self::Default => true,
            Self::Sad => matches!(
                effect,
                TextEffect::Bleeding
                    | TextEffect::Glitch
                    | TextEffect::Vanishing
                    | TextEffect::Shattering
            ),
            Self::Love => matches!(effect, TextEffect::Handwritten | TextEffect::Neon),
        }
    }

    /// Effects selectable for this category, in form order.
    pub fn allowed_effects(self) -> impl Iterator<Item = TextEffect> {
        ALL_EFFECTS
            .into_iter()
            .filter(move |effect| self.admits(*effect))
    }
}

/// Identifier/label pairs for the effect selector of one letter style.
pub fn effect_options(letter_style: &str) -> Vec<(&'static str, &'static str)> {
    LetterStyle::parse_or_default(letter_style)
        .allowed_effects()
        .map(|effect| (effect.as_str(), effect.label()))
        .collect()
}

/// Resolves the stored `letter_style`/`animation` pair into an effect.
///
/// Returns `None` for absent, unknown or out-of-category animations.
pub fn resolve_effect(letter_style: &str, animation: Option<&str>) -> Option<TextEffect> {
    let effect = TextEffect::parse(animation?)?;
    LetterStyle::parse_or_default(letter_style)
        .admits(effect)
        .then_some(effect)
}
