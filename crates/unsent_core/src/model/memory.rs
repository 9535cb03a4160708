//! Memory domain model and submission validator.
//!
//! # Responsibility
//! - Define the canonical record shared by list, recent and detail views.
//! - Turn raw submission input into a `ValidatedMemoryInput` with defaults.
//!
//! # Invariants
//! - `recipient` and `message` are non-empty after trimming.
//! - `message` is kept verbatim; line breaks and indentation are content.
//! - Style identifiers are never rejected here; unknown values fall back at
//!   render time.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store on insert.
pub type MemoryId = Uuid;

/// Palette identifier used when the submitter picks no color.
pub const DEFAULT_COLOR: &str = "default";
/// Letter style identifier used when the submitter picks no style.
pub const DEFAULT_LETTER_STYLE: &str = "default";

/// Moderation lifecycle flag.
///
/// Only `Approved` memories are publicly visible. Transitions are owned by the
/// external moderation collaborator; this crate only ever writes `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
}

impl ModerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Canonical stored memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub id: MemoryId,
    pub recipient: String,
    /// Displayed verbatim, whitespace preserved.
    pub message: String,
    /// `None` means anonymous; no attribution line is ever rendered.
    pub sender: Option<String>,
    /// Unix epoch milliseconds, assigned by the store.
    pub created_at: i64,
    pub status: ModerationStatus,
    /// Palette identifier as stored; may be unknown to the style tables.
    pub color: String,
    #[serde(rename = "full_bg")]
    pub full_background: bool,
    pub letter_style: String,
    pub animation: Option<String>,
}

impl Memory {
    pub fn is_anonymous(&self) -> bool {
        self.sender.is_none()
    }

    pub fn is_public(&self) -> bool {
        self.status.is_public()
    }
}

/// Raw submission as entered in the submit form.
///
/// Every field is optional at this stage so that validation can report all
/// missing required fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub recipient: Option<String>,
    pub message: Option<String>,
    pub sender: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "full_bg")]
    pub full_background: Option<bool>,
    pub letter_style: Option<String>,
    pub animation: Option<String>,
}

impl SubmissionInput {
    /// Starts an input with the two required fields set.
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: Some(recipient.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Submission that passed validation, with all defaults applied.
///
/// Has no `id`, `created_at` or `status`: those belong to the store and the
/// submission handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMemoryInput {
    pub recipient: String,
    pub message: String,
    pub sender: Option<String>,
    pub color: String,
    pub full_background: bool,
    pub letter_style: String,
    pub animation: Option<String>,
}

/// Required submission field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Recipient,
    Message,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recipient => "recipient",
            Self::Message => "message",
        }
    }
}

/// Submission rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Lists every required field that was absent or blank, in form order.
    MissingRequiredField { fields: Vec<RequiredField> },
}

impl ValidationError {
    pub fn fields(&self) -> &[RequiredField] {
        match self {
            Self::MissingRequiredField { fields } => fields,
        }
    }

    pub fn user_message(&self) -> &'static str {
        "Please fill in all required fields."
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField { fields } => {
                let names = fields
                    .iter()
                    .map(|field| field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "missing required field(s): {names}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Validates a raw submission and applies field defaults.
///
/// # Contract
/// - `recipient` and `message` must be non-empty after trimming.
/// - Optional blank strings count as absent.
/// - `input` is never mutated.
pub fn validate_submission(input: &SubmissionInput) -> Result<ValidatedMemoryInput, ValidationError> {
    let recipient = non_blank(input.recipient.as_deref());
    let message = input
        .message
        .as_deref()
        .filter(|value| !value.trim().is_empty());

    let mut missing = Vec::new();
    if recipient.is_none() {
        missing.push(RequiredField::Recipient);
    }
    if message.is_none() {
        missing.push(RequiredField::Message);
    }

    let (Some(recipient), Some(message)) = (recipient, message) else {
        return Err(ValidationError::MissingRequiredField { fields: missing });
    };

    Ok(ValidatedMemoryInput {
        recipient: recipient.to_string(),
        message: message.to_string(),
        sender: non_blank(input.sender.as_deref()).map(str::to_string),
        color: identifier_or(input.color.as_deref(), DEFAULT_COLOR),
        full_background: input.full_background.unwrap_or(false),
        letter_style: identifier_or(input.letter_style.as_deref(), DEFAULT_LETTER_STYLE),
        animation: non_blank(input.animation.as_deref()).map(str::to_ascii_lowercase),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn identifier_or(value: Option<&str>, fallback: &str) -> String {
    non_blank(value)
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| fallback.to_string())
}
