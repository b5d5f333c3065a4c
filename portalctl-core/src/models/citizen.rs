//! Citizen registration input
//!
//! Raw prompt answers arrive as a [`CitizenForm`]; [`NewCitizen::parse`]
//! turns them into validated fields ready for the `pessoa`/`cidadao` inserts.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::validation::bounded_text;
use super::ValidationError;

const MAX_NAME_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 255;
const MAX_GENDER_LEN: usize = 50;
const MAX_PHONE_LEN: usize = 20;
const CPF_LEN: usize = 11;

/// Input format shown to the user for birth dates
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\- ]+$").expect("invalid phone regex"));

/// Four-digit year keeps "25/12/90" from becoming the year 90
static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("invalid date regex"));

/// Validated full name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitizenName(String);

impl CitizenName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "name", MAX_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated e-mail address (shape check only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let email = bounded_text(s, "e-mail", MAX_EMAIL_LEN)?;
        if !EMAIL_RE.is_match(&email) {
            return Err(ValidationError::InvalidFormat {
                field: "e-mail",
                reason: "must look like name@domain.tld",
            });
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Brazilian CPF, digits only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpf(String);

impl Cpf {
    /// # Rules
    /// - Exactly 11 characters
    /// - ASCII digits only (no dots or dashes)
    ///
    /// # Example
    /// ```
    /// use portalctl_core::models::Cpf;
    ///
    /// assert!(Cpf::new("12345678901").is_ok());
    /// assert!(Cpf::new("123.456.789-01").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let cpf = s.trim();
        if cpf.is_empty() {
            return Err(ValidationError::Empty { field: "CPF" });
        }
        if !cpf.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "CPF",
                reason: "must contain digits only",
            });
        }
        if cpf.len() != CPF_LEN {
            return Err(ValidationError::InvalidFormat {
                field: "CPF",
                reason: "must have exactly 11 digits",
            });
        }
        Ok(Self(cpf.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional phone number; blank input means "not provided"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(Option<String>);

impl Phone {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let phone = s.trim();
        if phone.is_empty() {
            return Ok(Self(None));
        }
        if phone.chars().count() > MAX_PHONE_LEN {
            return Err(ValidationError::TooLong {
                field: "phone",
                max: MAX_PHONE_LEN,
            });
        }
        if !PHONE_RE.is_match(phone) {
            return Err(ValidationError::InvalidFormat {
                field: "phone",
                reason: "may only contain digits, spaces and + ( ) -",
            });
        }
        Ok(Self(Some(phone.to_owned())))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Free-text gender as typed by the citizen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gender(String);

impl Gender {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "gender", MAX_GENDER_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Birth date entered as DD/MM/YYYY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Parse against the local calendar date.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::parse(s, Local::now().date_naive())
    }

    /// Parse with an explicit "today", rejecting dates after it.
    pub fn parse(s: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let raw = s.trim();
        let invalid = || ValidationError::InvalidDate {
            field: "birth date",
            value: raw.to_owned(),
        };

        if !DATE_SHAPE_RE.is_match(raw) {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT).map_err(|_| invalid())?;
        if date > today {
            return Err(ValidationError::FutureDate {
                field: "birth date",
            });
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Raw answers collected by the registration prompts
#[derive(Debug, Clone, Default)]
pub struct CitizenForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
    pub gender: String,
    pub birth_date: String,
}

/// Fully validated citizen ready to be inserted
#[derive(Debug, Clone)]
pub struct NewCitizen {
    pub name: CitizenName,
    pub phone: Phone,
    pub email: Email,
    pub cpf: Cpf,
    pub gender: Gender,
    pub birth_date: BirthDate,
}

impl NewCitizen {
    /// Validate every field, reporting the birth date first.
    ///
    /// The date is the one field with a fixed input format, so a typo there
    /// is the most common reason to cancel a registration.
    pub fn parse(form: &CitizenForm) -> Result<Self, ValidationError> {
        let birth_date = BirthDate::new(&form.birth_date)?;
        Ok(Self {
            name: CitizenName::new(&form.name)?,
            phone: Phone::new(&form.phone)?,
            email: Email::new(&form.email)?,
            cpf: Cpf::new(&form.cpf)?,
            gender: Gender::new(&form.gender)?,
            birth_date,
        })
    }
}

/// Citizen row shown when picking who to enroll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CitizenSummary {
    pub id: i32,
    pub name: String,
}
