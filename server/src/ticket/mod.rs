//! Ticket identifiers and the payload carried by a guest's scannable code.

pub mod codec;

pub use codec::{MintedTicket, TicketCodec, DEFAULT_QR_RENDER_URL, PAYLOAD_NAMESPACE};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::GuestError;

pub const TICKET_PREFIX: &str = "TG-";

/// A guest's ticket identifier, `TG-<millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(String);

impl TicketId {
    pub(crate) fn from_millis(millis: u64) -> Self {
        Self(format!("{}{}", TICKET_PREFIX, millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part after the prefix.
    pub fn millis(&self) -> u64 {
        self.0[TICKET_PREFIX.len()..].parse().unwrap_or_default()
    }
}

impl FromStr for TicketId {
    type Err = GuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(TICKET_PREFIX).ok_or_else(|| {
            GuestError::MalformedPayload(format!("ticket id '{}' lacks the {} prefix", s, TICKET_PREFIX))
        })?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GuestError::MalformedPayload(format!(
                "ticket id '{}' must end in digits",
                s
            )));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TicketId {
    type Error = GuestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
