use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant in the expense group.
///
/// Ids are opaque strings owned by the storage layer; the engine never
/// interprets them beyond equality and ordering.
///
/// # Examples
///
/// ```
/// use splitledger::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::new("bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this participant id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A person tracked by the ledger.
///
/// Participants are created and maintained by the storage collaborator;
/// the engine only reads them. A participant referenced by existing
/// transactions is deactivated rather than deleted, and inactive
/// participants are excluded from every balance and settlement
/// computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    /// Current display name.
    name: String,
    /// Name at creation time, kept across renames.
    initial_name: String,
    created_at: DateTime<Utc>,
    active: bool,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            initial_name: name.clone(),
            name,
            created_at: Utc::now(),
            active: true,
        }
    }

    /// Mark this participant inactive. Used by stores that soft-delete.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    // --- Accessors ---

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_name(&self) -> &str {
        &self.initial_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
