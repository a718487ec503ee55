//! Message types exchanged between the caller and agents.
//!
//! A [`Message`] is an ordered sequence of text fragments. It is used both as
//! the pipeline's initial input and as the content payload of an event.

use serde::{Deserialize, Serialize};

/// A single text fragment within a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// The fragment text.
    pub text: String,
}

impl Part {
    /// Creates a part from any string-like value.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An ordered, immutable sequence of text fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The fragments, in order.
    pub parts: Vec<Part>,
}

impl Message {
    /// Creates a message with a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }

    /// Creates a message from an ordered list of parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Joins all non-empty fragments with a single space.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true when the message carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.text.is_empty())
    }
}
