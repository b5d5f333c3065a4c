//! portalctl-core: citizen registration and event enrollment for the
//! Portal da Cultura database.
//!
//! The schema and its routines (`fn_verificar_vagas_evento`,
//! `sp_registrar_participante_evento`) live in PostgreSQL; this crate
//! validates input, issues the SQL and relays what the database reports.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod portal;
pub mod repos;

pub use config::PortalConfig;
pub use db::{NoticeBuffer, NoticeLayer};
pub use error::{PortalError, Result};
pub use portal::{Portal, PortalApi};
