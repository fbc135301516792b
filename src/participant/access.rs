//! Feature access derived from a participant status
//!
//! Decides which participant features are reachable at the current point of
//! the journey. Presentation (menus, buttons, dialogs) is up to the caller.

use super::status::{ParticipantStatus, ParticipationType, Section};
use serde::Serialize;

/// Features unlocked for a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeatureAccess {
    /// Landing prompt asking the participant to confirm presence
    pub presence_prompt: bool,

    /// Activity selection
    pub activities: bool,

    /// "My interactions" dashboard
    pub interactions: bool,

    /// Participant badge
    pub badge: bool,

    /// Prompt offering to follow the event live
    pub live_follow_prompt: bool,
}

impl FeatureAccess {
    /// Access for the section the participant is currently in
    pub fn for_status(status: &ParticipantStatus) -> Self {
        Self::in_section(status, status.current_section)
    }

    /// Access as seen from `section`
    ///
    /// Online participants unlock interactions and the badge only once live
    /// follow is confirmed; in-person participants unlock them on payment.
    pub fn in_section(status: &ParticipantStatus, section: Section) -> Self {
        let engaged = match section {
            Section::Initial => false,
            Section::InPerson => status.has_paid_activities,
            Section::Online => status.has_paid_activities && status.has_confirmed_live_follow,
        };

        Self {
            presence_prompt: section == Section::Initial && !status.has_confirmed_presence,
            activities: section != Section::Initial && status.has_confirmed_presence,
            interactions: engaged,
            badge: engaged,
            live_follow_prompt: section == Section::Online
                && status.participation_type == Some(ParticipationType::Online)
                && status.has_paid_activities
                && !status.has_confirmed_live_follow,
        }
    }

    /// Names of the unlocked features, in journey order
    pub fn unlocked(&self) -> Vec<&'static str> {
        [
            (self.presence_prompt, "presence-prompt"),
            (self.activities, "activities"),
            (self.interactions, "interactions"),
            (self.badge, "badge"),
            (self.live_follow_prompt, "live-follow-prompt"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}
