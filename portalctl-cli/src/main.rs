//! portalctl CLI - console front-end for the Portal da Cultura database
//!
//! Runs the interactive menu by default:
//! - Register new citizens
//! - List upcoming events with remaining seats
//! - Enroll citizens in events (via `sp_registrar_participante_evento`)
//! - Report the most popular events
//!
//! Every menu operation is also available as a subcommand for scripting.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use portalctl_core::{NoticeBuffer, Portal, PortalConfig};

mod commands;
mod config;
mod menu;
mod prompt;
mod render;
mod tracing_setup;
mod ui;

use menu::Menu;
use prompt::{can_use_inquire, InquirePrompter, LinePrompter};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "portalctl",
    author,
    version,
    about = "Citizen registration and event enrollment for the Portal da Cultura",
    long_about = "Console menu over the Portal da Cultura PostgreSQL database. Register citizens, \
                  list upcoming events, enroll citizens and see which events are most popular."
)]
struct Cli {
    /// PostgreSQL connection URL (overrides config file and DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    /// Config file (default: ~/.portalctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu (default when no command is given)
    Menu,
    /// Register a new citizen
    Register(commands::RegisterArgs),
    /// List upcoming events with remaining seats
    Events(commands::EventsArgs),
    /// List registered citizens
    Citizens(commands::CitizensArgs),
    /// Enroll a citizen in an event
    Enroll(commands::EnrollArgs),
    /// Rank events by number of enrolled citizens
    Report(commands::ReportArgs),
    /// Manage portalctl configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let notices = NoticeBuffer::new();
    if let Err(err) = tracing_setup::init(&TracingConfig { debug: cli.debug }, notices.clone()) {
        eprintln!("Warning: logging setup failed, database notices will not be shown: {}", err);
    }
    ui::init_quiet_mode(cli.quiet);

    let Cli {
        database_url,
        config: config_path,
        command,
        ..
    } = cli;

    match command.unwrap_or(Commands::Menu) {
        Commands::Config(args) => {
            config::run_config(args, config_path.as_deref(), database_url.as_deref())
        }
        Commands::Completions(args) => run_completions(args),
        command => {
            let config = load_config(config_path.as_deref(), database_url)?;
            run_with_portal(command, &config, notices).await
        }
    }
}

fn load_config(path: Option<&std::path::Path>, database_url: Option<String>) -> Result<PortalConfig> {
    let mut config = PortalConfig::load(path).context("Failed to load configuration")?;
    if let Some(url) = database_url {
        config.database.url = Some(url);
    }
    Ok(config)
}

async fn run_with_portal(command: Commands, config: &PortalConfig, notices: NoticeBuffer) -> Result<()> {
    let interactive = matches!(command, Commands::Menu);

    let portal = match Portal::connect(config, notices).await {
        Ok(portal) => portal,
        Err(err) => {
            if interactive {
                println!("Error connecting to the database: {}", err);
            }
            return Err(err).context(format!(
                "Failed to connect to {}",
                config.describe_target()
            ));
        }
    };

    let result = match command {
        Commands::Menu => run_menu(&portal).await,
        Commands::Register(args) => commands::run_register(args, &portal).await,
        Commands::Events(args) => commands::run_events(args, &portal).await,
        Commands::Citizens(args) => commands::run_citizens(args, &portal).await,
        Commands::Enroll(args) => commands::run_enroll(args, &portal).await,
        Commands::Report(args) => commands::run_report(args, &portal).await,
        Commands::Config(_) | Commands::Completions(_) => unreachable!("handled before connecting"),
    };

    portal.close().await;
    if interactive {
        println!("\nDatabase connection closed.");
    }
    result
}

async fn run_menu(portal: &Portal) -> Result<()> {
    println!("Connected to PostgreSQL database.");

    let styled = ui::use_color();
    if can_use_inquire() {
        Menu::new(portal, InquirePrompter, io::stdout(), styled)
            .run()
            .await
    } else {
        let prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
        Menu::new(portal, prompter, io::stdout(), styled).run().await
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
