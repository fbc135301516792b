//! Partial status updates
//!
//! A `StatusUpdate` lists the fields a caller wants to change; unset fields
//! keep their current value. The derived fields (`current_section`,
//! `current_step`) have no counterpart here.

use super::status::{ParticipantStatus, ParticipationType};
use serde::{Deserialize, Serialize};

/// Partial update applied by [`ParticipantStore::update`](super::ParticipantStore::update)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_confirmed_presence: Option<bool>,

    /// `Some(None)` clears the participation type
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub participation_type: Option<Option<ParticipationType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_paid_activities: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_confirmed_live_follow: Option<bool>,
}

impl StatusUpdate {
    /// Empty update
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presence(mut self, confirmed: bool) -> Self {
        self.has_confirmed_presence = Some(confirmed);
        self
    }

    pub fn participation(mut self, participation: ParticipationType) -> Self {
        self.participation_type = Some(Some(participation));
        self
    }

    pub fn clear_participation(mut self) -> Self {
        self.participation_type = Some(None);
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.has_paid_activities = Some(paid);
        self
    }

    pub fn live_follow(mut self, confirmed: bool) -> Self {
        self.has_confirmed_live_follow = Some(confirmed);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the update can break the live-follow invariant: it confirms
    /// live follow or changes the participation type
    pub fn affects_live_follow(&self) -> bool {
        self.has_confirmed_live_follow == Some(true) || self.participation_type.is_some()
    }

    /// Overlay onto `current` without deriving anything
    pub fn merge_into(&self, current: &ParticipantStatus) -> ParticipantStatus {
        let mut merged = current.clone();
        if let Some(presence) = self.has_confirmed_presence {
            merged.has_confirmed_presence = presence;
        }
        if let Some(participation) = self.participation_type {
            merged.participation_type = participation;
        }
        if let Some(paid) = self.has_paid_activities {
            merged.has_paid_activities = paid;
        }
        if let Some(live) = self.has_confirmed_live_follow {
            merged.has_confirmed_live_follow = live;
        }
        merged
    }
}

/// Presence confirmed with the chosen attendance mode
pub fn confirm_presence(participation: ParticipationType) -> StatusUpdate {
    StatusUpdate::new().presence(true).participation(participation)
}

/// Simulated payment completed
pub fn complete_payment() -> StatusUpdate {
    StatusUpdate::new().paid(true)
}

/// Participant opted into live features
pub fn confirm_live_follow() -> StatusUpdate {
    StatusUpdate::new().live_follow(true)
}

// Distinguishes an absent `participationType` from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
