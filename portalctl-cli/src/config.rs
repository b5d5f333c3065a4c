use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portalctl_core::config::CONFIG_ENV;
use portalctl_core::PortalConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Show the effective configuration (passwords masked)
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// Config file the other commands would read
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(PortalConfig::config_path)
}

pub fn run_config(args: ConfigArgs, explicit: Option<&Path>, database_url: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommands::Init(init) => run_init(init, &resolve_path(explicit)),
        ConfigCommands::Show => run_show(explicit, database_url),
        ConfigCommands::Path => {
            println!("{}", resolve_path(explicit).display());
            Ok(())
        }
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let template = include_str!("../config.template.toml");
    std::fs::write(config_path, template)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point [database] at the portal database");
    println!("  3. Run: portalctl config show");

    Ok(())
}

fn run_show(explicit: Option<&Path>, database_url: Option<&str>) -> Result<()> {
    let mut config = PortalConfig::load(explicit)?;
    if let Some(url) = database_url {
        config.database.url = Some(url.to_string());
    }

    let toml_str = toml_string(&config.redacted())?;
    println!("{}", toml_str);
    Ok(())
}

fn toml_string(config: &PortalConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_path(Some(Path::new("/tmp/portal.toml")));
        assert_eq!(path, PathBuf::from("/tmp/portal.toml"));
    }

    #[test]
    fn init_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        run_init(InitArgs { force: false }, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed = PortalConfig::from_toml_str(&written).unwrap();
        assert_eq!(parsed.database.schema, "public");

        assert!(run_init(InitArgs { force: false }, &path).is_err());
        assert!(run_init(InitArgs { force: true }, &path).is_ok());
    }

    #[test]
    fn shown_config_hides_password() {
        let rendered = toml_string(&PortalConfig::default().redacted()).unwrap();
        assert!(rendered.contains("password = \"****\""));
        assert!(!rendered.contains("admin"));
    }
}
