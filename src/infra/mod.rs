//! Инфраструктурный слой вокруг покерного движка:
//! - генерация ID;
//! - RNG-реализации для движка;
//! - in-memory ledger и проверка прав на место.

pub mod auth;
pub mod ids;
pub mod ledger;
pub mod rng;

pub use auth::{AllowAllSeats, SeatRegistry};
pub use ids::IdGenerator;
pub use ledger::InMemoryLedger;
pub use rng::{DeterministicRng, NoShuffle, SystemRng};
