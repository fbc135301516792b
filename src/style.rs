//! Terminal styling utilities
//!
//! Consistent color scheme for participant status output.
//! Uses crossterm for cross-platform terminal colors.

use crate::participant::{Section, Step};
use crossterm::style::{StyledContent, Stylize};

/// Journey step colors
/// - initial: Dim
/// - confirmed: Cyan
/// - paid: Yellow
/// - liveReady: Green
pub fn step_style(step: Step) -> StyledContent<String> {
    let label = step.as_str().to_string();
    match step {
        Step::Initial => label.dark_grey(),
        Step::Confirmed => label.cyan(),
        Step::Paid => label.yellow(),
        Step::LiveReady => label.green().bold(),
    }
}

/// Step indicator, filling up along the journey
pub fn step_indicator(step: Step) -> &'static str {
    match step {
        Step::Initial => "○",
        Step::Confirmed => "◔",
        Step::Paid => "◑",
        Step::LiveReady => "●",
    }
}

pub fn section_style(section: Section) -> StyledContent<String> {
    let label = section.as_str().to_string();
    match section {
        Section::Initial => label.dark_grey(),
        Section::Online => label.blue(),
        Section::InPerson => label.magenta(),
    }
}

/// Yes/no flag
pub fn flag(on: bool) -> StyledContent<String> {
    if on {
        "yes".to_string().green()
    } else {
        "no".to_string().dark_grey()
    }
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

/// Success text
pub fn success(text: &str) -> StyledContent<String> {
    text.to_string().green()
}

/// Warning text
pub fn warning(text: &str) -> StyledContent<String> {
    text.to_string().yellow()
}

/// Error text
pub fn error(text: &str) -> StyledContent<String> {
    text.to_string().red()
}

/// Path styling
pub fn path(p: &str) -> StyledContent<String> {
    p.to_string().blue()
}
