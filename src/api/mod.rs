//! Внешний API стола.
//!
//! Здесь описываются:
//! - команды (commands.rs) – всё, что приходит от клиентов и рантайма;
//! - DTO (dto.rs) – удобные структуры для фронта;
//! - ошибки (errors.rs) – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;

pub use commands::*;
pub use dto::*;
pub use errors::*;
