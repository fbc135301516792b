//! EventQuorum - participant journey CLI
//!
//! Main entry point for the eventquorum binary.

use clap::Parser;
use eventquorum::storage::KeyValueStore;
use eventquorum::commands::{build_update, parse_participation, Cli, Commands, ConfigCommands};
use eventquorum::config::{validate_config, validate_config_result, EventQuorumConfig};
use eventquorum::participant::{
    complete_payment, confirm_live_follow, confirm_presence, FeatureAccess, LoadOutcome,
    ParticipantStatus, Persistence, Session, UpdateOutcome,
};
use eventquorum::style;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    if let Err(e) = eventquorum::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style::error("Error:"), e);
        process::exit(1);
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(EventQuorumConfig::default_path)
}

fn load_config(cli: &Cli) -> eventquorum::Result<EventQuorumConfig> {
    match cli.config {
        Some(ref path) => EventQuorumConfig::load(path),
        None => EventQuorumConfig::load_or_default(),
    }
}

fn run(cli: Cli) -> eventquorum::Result<()> {
    if let Commands::Init { force } = cli.command {
        return handle_init_command(&config_path(&cli), force);
    }

    let config = load_config(&cli)?;

    if let Commands::Config(ref cmd) = cli.command {
        return handle_config_command(cmd, &config, cli.json);
    }

    validate_config_result(&config)?;

    let storage = config.storage.open()?;
    tracing::debug!(backend = storage.backend_name(), key = %config.storage.key, "Storage ready");
    let mut session = Session::start(storage, config.storage.key.clone());

    report_load(session.store()?.load_outcome(), cli.json);

    let outcome = match cli.command {
        Commands::Status => None,
        Commands::Access => {
            let access = FeatureAccess::for_status(session.store()?.status());
            print_access(&access, cli.json)?;
            session.end();
            return Ok(());
        }
        Commands::Confirm { ref participation } => {
            let participation = parse_participation(participation)?;
            Some(session.store_mut()?.update(confirm_presence(participation)))
        }
        Commands::Pay => Some(session.store_mut()?.update(complete_payment())),
        Commands::LiveFollow => Some(session.store_mut()?.update(confirm_live_follow())),
        Commands::Update {
            presence,
            ref participation,
            paid,
            live_follow,
        } => {
            let update = build_update(presence, participation.as_deref(), paid, live_follow)?;
            Some(session.store_mut()?.update(update))
        }
        Commands::Reset => Some(session.store_mut()?.reset()),
        Commands::Init { .. } | Commands::Config(_) => unreachable!("handled above"),
    };

    match outcome {
        // Status, rejection and persistence result in one document
        Some(ref outcome) if cli.json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        Some(ref outcome) => {
            report_outcome(outcome);
            print_status(&outcome.status, false)?;
        }
        None => print_status(session.store()?.status(), cli.json)?,
    }
    session.end();
    Ok(())
}

fn handle_init_command(path: &Path, force: bool) -> eventquorum::Result<()> {
    if path.exists() && !force {
        println!(
            "Configuration already exists at {} (use --force to overwrite)",
            style::path(&path.display().to_string())
        );
        return Ok(());
    }

    let config = EventQuorumConfig::new();
    config.save(path)?;

    println!(
        "{} Created configuration at {}",
        style::success("✓"),
        style::path(&path.display().to_string())
    );
    println!(
        "  Storage: {:?} at {}",
        config.storage.backend,
        config.storage.path.display()
    );
    Ok(())
}

fn handle_config_command(
    cmd: &ConfigCommands,
    config: &EventQuorumConfig,
    json: bool,
) -> eventquorum::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                print!("{}", serde_yaml::to_string(config)?);
            }
        }
        ConfigCommands::Validate => match validate_config(config) {
            Ok(()) => println!("{} Configuration is valid", style::success("✓")),
            Err(errors) => {
                for error in &errors {
                    println!("{} {}", style::error("✗"), error);
                }
                return Err(eventquorum::ParticipantError::Config(format!(
                    "{} problem(s) found",
                    errors.len()
                )));
            }
        },
    }
    Ok(())
}

fn report_load(outcome: &LoadOutcome, json: bool) {
    if json {
        return;
    }
    match outcome {
        LoadOutcome::Corrupt(e) => eprintln!(
            "{} stored status was unreadable and has been ignored: {}",
            style::warning("warning:"),
            e
        ),
        LoadOutcome::ReadFailed(e) => eprintln!(
            "{} could not read stored status: {}",
            style::warning("warning:"),
            e
        ),
        LoadOutcome::Restored | LoadOutcome::Missing => {}
    }
}

fn report_outcome(outcome: &UpdateOutcome) {
    if let Some(violation) = outcome.rejection {
        println!("{} Update rejected: {}", style::warning("!"), violation);
    }
    if let Persistence::Failed(ref e) = outcome.persistence {
        eprintln!(
            "{} status changed but was not saved: {}",
            style::warning("warning:"),
            e
        );
    }
}

fn print_status(status: &ParticipantStatus, json: bool) -> eventquorum::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    let participation = status
        .participation_type
        .map(|p| p.to_string())
        .unwrap_or_else(|| "none".to_string());

    println!(
        "{} {}",
        style::step_indicator(status.current_step),
        style::header(status.current_step.display_name())
    );
    println!();
    println!("  Step:            {}", style::step_style(status.current_step));
    println!("  Section:         {}", style::section_style(status.current_section));
    println!("  Participation:   {}", participation);
    println!("  Presence:        {}", style::flag(status.has_confirmed_presence));
    println!("  Paid:            {}", style::flag(status.has_paid_activities));
    println!("  Live follow:     {}", style::flag(status.has_confirmed_live_follow));

    if !status.is_consistent() {
        println!();
        println!(
            "  {}",
            style::dim("stored status is inconsistent; the next update will re-derive it")
        );
    }
    Ok(())
}

fn print_access(access: &FeatureAccess, json: bool) -> eventquorum::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(access)?);
        return Ok(());
    }

    println!("{}", style::header("Unlocked features"));
    let unlocked = access.unlocked();
    if unlocked.is_empty() {
        println!("  {}", style::dim("none"));
    }
    for feature in unlocked {
        println!("  {} {}", style::success("✓"), feature);
    }
    Ok(())
}
