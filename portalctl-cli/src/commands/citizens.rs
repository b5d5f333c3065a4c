//! Citizen commands - register and list

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use portalctl_core::models::{CitizenForm, NewCitizen};
use portalctl_core::PortalApi;

use super::OutputFormat;
use crate::{render, ui};

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Phone number (optional)
    #[arg(long, default_value = "")]
    pub phone: String,

    /// E-mail address
    #[arg(long)]
    pub email: String,

    /// CPF, 11 digits without separators
    #[arg(long)]
    pub cpf: String,

    /// Gender
    #[arg(long)]
    pub gender: String,

    /// Birth date as DD/MM/YYYY
    #[arg(long, value_name = "DD/MM/YYYY")]
    pub birth_date: String,
}

#[derive(Parser, Debug)]
pub struct CitizensArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

impl RegisterArgs {
    fn form(&self) -> CitizenForm {
        CitizenForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            cpf: self.cpf.clone(),
            gender: self.gender.clone(),
            birth_date: self.birth_date.clone(),
        }
    }
}

pub async fn run_register<P: PortalApi + ?Sized>(args: RegisterArgs, portal: &P) -> Result<()> {
    let citizen = NewCitizen::parse(&args.form()).map_err(|e| anyhow!("invalid citizen: {}", e))?;

    let id = ui::with_spinner_async("Registering citizen...", portal.register_citizen(&citizen))
        .await
        .context("Failed to register citizen")?;

    println!("Citizen registered with ID: {}", id);
    Ok(())
}

pub async fn run_citizens<P: PortalApi + ?Sized>(args: CitizensArgs, portal: &P) -> Result<()> {
    let citizens = ui::with_spinner_async("Loading citizens...", portal.citizens())
        .await
        .context("Failed to list citizens")?;

    match args.output.resolve(args.json) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&citizens)?),
        OutputFormat::Human if citizens.is_empty() => println!("No citizens registered."),
        OutputFormat::Human => print!("{}", render::citizen_list(&citizens)),
    }
    Ok(())
}
