//! Database layer - connection pool and notice capture
//!
//! The schema itself (tables, `fn_verificar_vagas_evento`,
//! `sp_registrar_participante_evento`) is managed outside this crate.

pub mod notices;
pub mod pool;

pub use notices::{notice_filter, NoticeBuffer, NoticeLayer, NOTICE_TARGET};
pub use pool::create_pool;
