//! Session-level settings: schema search path and ticket type

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::bounded_text;
use super::ValidationError;

/// Ticket type used when none is configured
pub const DEFAULT_TICKET: &str = "Pista Padrão";

const MAX_TICKET_LEN: usize = 100;

/// Unquoted PostgreSQL identifier (63 bytes max)
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("invalid identifier regex"));

/// Schema name safe to splice into `SET search_path`
///
/// `SET` does not accept bind parameters, so this is the only place a
/// value is formatted into SQL text; the regex keeps it a bare identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "schema" });
        }
        if !IDENT_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "schema",
                reason: "must be a lowercase SQL identifier (letters, digits, underscores)",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SchemaName {
    fn default() -> Self {
        Self("public".to_owned())
    }
}

/// Ticket category passed to the enrollment procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketType(String);

impl TicketType {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "ticket type", MAX_TICKET_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TicketType {
    fn default() -> Self {
        Self(DEFAULT_TICKET.to_owned())
    }
}
