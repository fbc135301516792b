//! CLI command definitions
//!
//! All CLI structs and subcommand enums are defined here.

use crate::participant::{ParticipationType, StatusUpdate};
use crate::{ParticipantError, Result};
use clap::{Parser, Subcommand};

/// EventQuorum - participant journey for hybrid conferences
#[derive(Parser, Debug)]
#[command(name = "eventquorum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/eventquorum/config.yaml)
    #[arg(short, long, global = true, env = "EVENTQUORUM_CONFIG")]
    pub config: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the participant status
    Status,

    /// Confirm presence with an attendance mode
    Confirm {
        /// online or in-person
        participation: String,
    },

    /// Mark the selected activities as paid
    Pay,

    /// Opt into live interactive features (online participants only)
    LiveFollow,

    /// Apply a partial status update
    Update {
        /// Presence confirmed
        #[arg(long)]
        presence: Option<bool>,

        /// Participation type (online, in-person, none)
        #[arg(long)]
        participation: Option<String>,

        /// Activities paid
        #[arg(long)]
        paid: Option<bool>,

        /// Live follow confirmed
        #[arg(long)]
        live_follow: Option<bool>,
    },

    /// Reset the participant status and clear stored state
    Reset,

    /// Show which participant features are unlocked
    Access,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Check the configuration for problems
    Validate,
}

/// Parse a participation type argument
pub fn parse_participation(s: &str) -> Result<ParticipationType> {
    ParticipationType::parse(s).ok_or_else(|| {
        ParticipantError::Parse(format!(
            "Invalid participation type '{}': expected online or in-person",
            s
        ))
    })
}

/// Build a partial update from `update` subcommand flags
pub fn build_update(
    presence: Option<bool>,
    participation: Option<&str>,
    paid: Option<bool>,
    live_follow: Option<bool>,
) -> Result<StatusUpdate> {
    let participation_type = match participation {
        None => None,
        Some(s) if s.eq_ignore_ascii_case("none") => Some(None),
        Some(s) => Some(Some(parse_participation(s)?)),
    };

    let update = StatusUpdate {
        has_confirmed_presence: presence,
        participation_type,
        has_paid_activities: paid,
        has_confirmed_live_follow: live_follow,
    };

    if update.is_empty() {
        return Err(ParticipantError::Parse(
            "Nothing to update: pass at least one of --presence, --participation, --paid, --live-follow"
                .to_string(),
        ));
    }

    Ok(update)
}
