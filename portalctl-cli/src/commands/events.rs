//! Event commands - list, enroll, popularity report

use anyhow::{Context, Result};
use clap::Parser;
use portalctl_core::models::{Enrollment, TicketType};
use portalctl_core::PortalApi;

use super::OutputFormat;
use crate::{render, ui};

#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct EnrollArgs {
    /// Citizen (person) ID
    #[arg(long)]
    pub citizen: i32,

    /// Event ID
    #[arg(long)]
    pub event: i32,

    /// Ticket type (defaults to the configured ticket)
    #[arg(long)]
    pub ticket: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Only show the top N events
    #[arg(long, short)]
    pub limit: Option<u32>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

pub async fn run_events<P: PortalApi + ?Sized>(args: EventsArgs, portal: &P) -> Result<()> {
    let events = ui::with_spinner_async("Loading events...", portal.upcoming_events())
        .await
        .context("Failed to list events")?;

    match args.output.resolve(args.json) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Human if events.is_empty() => println!("No upcoming events found."),
        OutputFormat::Human => print!(
            "{}",
            render::events_table(&events).render(ui::use_color())
        ),
    }
    Ok(())
}

pub async fn run_enroll<P: PortalApi + ?Sized>(args: EnrollArgs, portal: &P) -> Result<()> {
    let ticket = match args.ticket.as_deref() {
        Some(raw) => TicketType::new(raw).context("Invalid ticket type")?,
        None => portal.default_ticket(),
    };
    let enrollment = Enrollment {
        citizen_id: args.citizen,
        event_id: args.event,
        ticket,
    };

    let outcome = ui::with_spinner_async(
        format!("Enrolling citizen {} in event {}...", args.citizen, args.event),
        portal.enroll(&enrollment),
    )
    .await
    .context("Enrollment failed")?;

    for notice in &outcome.notices {
        println!("DATABASE NOTICE: {}", notice);
    }
    if outcome.notices.is_empty() {
        println!(
            "Enrollment submitted for citizen {} in event {}.",
            args.citizen, args.event
        );
    }
    Ok(())
}

pub async fn run_report<P: PortalApi + ?Sized>(args: ReportArgs, portal: &P) -> Result<()> {
    let limit = args.limit.map(i64::from);
    let report = ui::with_spinner_async("Building report...", portal.popular_events(limit))
        .await
        .context("Failed to generate report")?;

    match args.output.resolve(args.json) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human if report.is_empty() => println!("No events found for the report."),
        OutputFormat::Human => print!(
            "{}",
            render::popularity_table(&report).render(ui::use_color())
        ),
    }
    Ok(())
}
