//! Participant status model
//!
//! The participant moves through a fixed journey:
//! presence confirmation → activity payment → live-follow unlock.
//! `current_section` and `current_step` are derived from the other fields and
//! are recomputed by the store on every update.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance mode chosen when confirming presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipationType {
    /// Follows the event remotely
    #[serde(alias = "enligne")]
    Online,
    /// Attends on site
    #[serde(alias = "enpresentiel")]
    InPerson,
}

impl ParticipationType {
    /// Wire/display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::InPerson => "inPerson",
        }
    }

    /// Parse from string (case-insensitive, accepts a few spellings)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "online" | "enligne" => Some(Self::Online),
            "inperson" | "in-person" | "in_person" | "enpresentiel" => Some(Self::InPerson),
            _ => None,
        }
    }
}

impl fmt::Display for ParticipationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of the participant area the participant is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    /// Landing area, before a participation type is chosen
    #[default]
    Initial,
    #[serde(alias = "enligne")]
    Online,
    #[serde(alias = "enpresentiel")]
    InPerson,
}

impl Section {
    /// Section matching an (optional) participation type
    pub fn for_participation(participation: Option<ParticipationType>) -> Self {
        match participation {
            Some(ParticipationType::Online) => Self::Online,
            Some(ParticipationType::InPerson) => Self::InPerson,
            None => Self::Initial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Online => "online",
            Self::InPerson => "inPerson",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse summary of journey progress
///
/// Ordered: `Initial < Confirmed < Paid < LiveReady`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    Initial,
    Confirmed,
    Paid,
    #[serde(alias = "live_ready")]
    LiveReady,
}

impl Step {
    /// Derive the step from the journey flags, highest priority first
    pub fn derive(status: &ParticipantStatus) -> Self {
        if status.has_confirmed_live_follow {
            Self::LiveReady
        } else if status.has_paid_activities {
            Self::Paid
        } else if status.has_confirmed_presence {
            Self::Confirmed
        } else {
            Self::Initial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Confirmed => "confirmed",
            Self::Paid => "paid",
            Self::LiveReady => "liveReady",
        }
    }

    /// Human readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initial => "Awaiting presence confirmation",
            Self::Confirmed => "Presence confirmed",
            Self::Paid => "Activities paid",
            Self::LiveReady => "Live follow unlocked",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant progress through the journey
///
/// Serialized with camelCase field names; a missing participation type is
/// written as `null`. Missing fields in a stored snapshot fall back to their
/// defaults, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantStatus {
    /// Participant has confirmed attendance intent
    pub has_confirmed_presence: bool,

    /// Chosen attendance mode, `None` until presence is confirmed
    pub participation_type: Option<ParticipationType>,

    /// Mirrors `participation_type`
    pub current_section: Section,

    /// Simulated payment completed for the selected activities
    pub has_paid_activities: bool,

    /// Opted into live interactive features (online only)
    pub has_confirmed_live_follow: bool,

    /// Derived summary of the flags above
    pub current_step: Step,
}

impl ParticipantStatus {
    /// Status at the start of a fresh session
    pub fn new() -> Self {
        Self::default()
    }

    /// Live follow is only valid for online participation
    pub fn live_follow_violation(&self) -> Option<InvariantViolation> {
        if self.has_confirmed_live_follow
            && self.participation_type != Some(ParticipationType::Online)
        {
            Some(InvariantViolation::LiveFollowRequiresOnline {
                participation_type: self.participation_type,
            })
        } else {
            None
        }
    }

    /// Recompute the derived fields in place
    pub fn derive(&mut self) {
        self.current_section = Section::for_participation(self.participation_type);
        self.current_step = Step::derive(self);
    }

    /// Whether the derived fields agree with the flags
    ///
    /// Stored snapshots are loaded verbatim, so this can be false until the
    /// next update.
    pub fn is_consistent(&self) -> bool {
        self.live_follow_violation().is_none()
            && self.current_section == Section::for_participation(self.participation_type)
            && self.current_step == Step::derive(self)
    }
}

/// Reason an update was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InvariantViolation {
    /// `has_confirmed_live_follow` set while participation is not online
    #[serde(rename_all = "camelCase")]
    LiveFollowRequiresOnline {
        participation_type: Option<ParticipationType>,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiveFollowRequiresOnline { participation_type } => {
                let kind = participation_type.map(|p| p.as_str()).unwrap_or("none");
                write!(
                    f,
                    "live follow requires online participation (participation type: {})",
                    kind
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(presence: bool, paid: bool, live: bool) -> ParticipantStatus {
        ParticipantStatus {
            has_confirmed_presence: presence,
            participation_type: Some(ParticipationType::Online),
            has_paid_activities: paid,
            has_confirmed_live_follow: live,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_status() {
        let status = ParticipantStatus::new();
        assert!(!status.has_confirmed_presence);
        assert_eq!(status.participation_type, None);
        assert_eq!(status.current_section, Section::Initial);
        assert!(!status.has_paid_activities);
        assert!(!status.has_confirmed_live_follow);
        assert_eq!(status.current_step, Step::Initial);
        assert!(status.is_consistent());
    }

    #[test]
    fn test_step_priority_order() {
        assert_eq!(Step::derive(&status(false, false, false)), Step::Initial);
        assert_eq!(Step::derive(&status(true, false, false)), Step::Confirmed);
        assert_eq!(Step::derive(&status(true, true, false)), Step::Paid);
        assert_eq!(Step::derive(&status(true, true, true)), Step::LiveReady);

        // Higher flags win even when lower ones are unset
        assert_eq!(Step::derive(&status(false, true, false)), Step::Paid);
        assert_eq!(Step::derive(&status(false, false, true)), Step::LiveReady);
    }

    #[test]
    fn test_step_ordering() {
        assert!(Step::Initial < Step::Confirmed);
        assert!(Step::Confirmed < Step::Paid);
        assert!(Step::Paid < Step::LiveReady);
    }

    #[test]
    fn test_section_mirrors_participation() {
        assert_eq!(Section::for_participation(None), Section::Initial);
        assert_eq!(
            Section::for_participation(Some(ParticipationType::Online)),
            Section::Online
        );
        assert_eq!(
            Section::for_participation(Some(ParticipationType::InPerson)),
            Section::InPerson
        );
    }

    #[test]
    fn test_live_follow_violation() {
        let mut s = status(true, true, true);
        assert!(s.live_follow_violation().is_none());

        s.participation_type = Some(ParticipationType::InPerson);
        assert_eq!(
            s.live_follow_violation(),
            Some(InvariantViolation::LiveFollowRequiresOnline {
                participation_type: Some(ParticipationType::InPerson)
            })
        );

        s.participation_type = None;
        assert!(s.live_follow_violation().is_some());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut s = status(true, true, false);
        s.derive();
        let json = serde_json::to_value(&s).unwrap();

        assert_eq!(json["hasConfirmedPresence"], true);
        assert_eq!(json["participationType"], "online");
        assert_eq!(json["currentSection"], "online");
        assert_eq!(json["hasPaidActivities"], true);
        assert_eq!(json["hasConfirmedLiveFollow"], false);
        assert_eq!(json["currentStep"], "paid");
    }

    #[test]
    fn test_default_serializes_null_participation() {
        let json = serde_json::to_string(&ParticipantStatus::new()).unwrap();
        assert!(json.contains("\"participationType\":null"));
        assert!(json.contains("\"currentStep\":\"initial\""));
    }

    #[test]
    fn test_in_person_and_live_ready_names() {
        let s = ParticipantStatus {
            participation_type: Some(ParticipationType::InPerson),
            current_section: Section::InPerson,
            current_step: Step::LiveReady,
            ..Default::default()
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["participationType"], "inPerson");
        assert_eq!(json["currentSection"], "inPerson");
        assert_eq!(json["currentStep"], "liveReady");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let s: ParticipantStatus =
            serde_json::from_str(r#"{"hasConfirmedPresence":true,"extra":1}"#).unwrap();
        assert!(s.has_confirmed_presence);
        assert_eq!(s.participation_type, None);
        assert_eq!(s.current_step, Step::Initial);
        assert!(!s.is_consistent());
    }

    #[test]
    fn test_reads_legacy_enum_spellings() {
        let s: ParticipantStatus = serde_json::from_str(
            r#"{"hasConfirmedPresence":true,"participationType":"enligne","currentSection":"enligne","hasPaidActivities":true,"hasConfirmedLiveFollow":true,"currentStep":"live_ready"}"#,
        )
        .unwrap();
        assert_eq!(s.participation_type, Some(ParticipationType::Online));
        assert_eq!(s.current_section, Section::Online);
        assert_eq!(s.current_step, Step::LiveReady);
        assert!(s.is_consistent());

        let s: ParticipantStatus = serde_json::from_str(
            r#"{"participationType":"enpresentiel","currentSection":"enpresentiel"}"#,
        )
        .unwrap();
        assert_eq!(s.participation_type, Some(ParticipationType::InPerson));
        assert_eq!(s.current_section, Section::InPerson);

        // Written back with the current spellings
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["participationType"], "inPerson");
    }

    #[test]
    fn test_parse_participation_type() {
        assert_eq!(ParticipationType::parse("online"), Some(ParticipationType::Online));
        assert_eq!(ParticipationType::parse("In-Person"), Some(ParticipationType::InPerson));
        assert_eq!(ParticipationType::parse("inPerson"), Some(ParticipationType::InPerson));
        assert_eq!(ParticipationType::parse("hybrid"), None);
    }
}
