use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MailProbeError;

/// Outcome classification for a single mailbox check.
///
/// The set is closed; ids 1-6 are part of the wire format and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StatusId {
    /// The address is registered.
    Live = 1,
    /// The address is not registered.
    NotExists = 2,
    /// The account exists but is disabled.
    Disabled = 3,
    /// The provider demands phone verification before answering.
    VerifyPhone = 4,
    /// The check could not be completed.
    CheckError = 5,
    /// The address is not a well-formed email.
    FormatInvalid = 6,
}

impl StatusId {
    /// Display name, fixed per id.
    pub fn name(self) -> &'static str {
        match self {
            StatusId::Live => "Live",
            StatusId::NotExists => "Not exists",
            StatusId::Disabled => "Disable",
            StatusId::VerifyPhone => "Ver phone",
            StatusId::CheckError => "Check error",
            StatusId::FormatInvalid => "Format Invalid",
        }
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<StatusId> for u8 {
    fn from(id: StatusId) -> u8 {
        id as u8
    }
}

impl TryFrom<u8> for StatusId {
    type Error = MailProbeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StatusId::Live),
            2 => Ok(StatusId::NotExists),
            3 => Ok(StatusId::Disabled),
            4 => Ok(StatusId::VerifyPhone),
            5 => Ok(StatusId::CheckError),
            6 => Ok(StatusId::FormatInvalid),
            other => Err(MailProbeError::InvalidStatusId(other)),
        }
    }
}

/// A status id paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub name: String,
}

impl From<StatusId> for Status {
    fn from(id: StatusId) -> Self {
        Status {
            id,
            name: id.name().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
