//! Движок покерной раздачи (Texas Hold'em, No-Limit).
//!
//! Слои:
//! - `domain` – карты, колода, фишки, игроки, стол, итоги раздачи;
//! - `eval` – оценка силы руки;
//! - `engine` – ставки, сайд-поты, переход стадий, сессия стола;
//! - `time_ctrl` – таймер хода, таймбанк, grace при отключении;
//! - `infra` – RNG, id, in-memory ledger;
//! - `api` – команды и DTO для клиентов;
//! - `runtime` – tokio-актёр на стол;
//! - `config` – загрузка конфига стола.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod runtime;
pub mod time_ctrl;
