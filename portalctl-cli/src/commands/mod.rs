//! Non-interactive commands for portalctl CLI
//!
//! Each command performs one menu operation from flags, for scripting.

pub mod citizens;
pub mod events;

use clap::ValueEnum;

pub use citizens::{run_citizens, run_register, CitizensArgs, RegisterArgs};
pub use events::{run_enroll, run_events, run_report, EnrollArgs, EventsArgs, ReportArgs};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
}

impl OutputFormat {
    /// `--json` shorthand wins over `--output`
    pub fn resolve(self, json: bool) -> Self {
        if json {
            Self::Json
        } else {
            self
        }
    }
}
