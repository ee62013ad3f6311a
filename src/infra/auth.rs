//! Простые реализации проверки прав на место.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::{PlayerId, SeatIndex};
use crate::engine::SeatAuthorizer;

/// Пропускает всех: актёр сверяется только с игроком на месте (это делает движок).
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAllSeats;

impl SeatAuthorizer for AllowAllSeats {
    fn is_authorized(&self, _player_id: PlayerId, _seat: SeatIndex) -> bool {
        true
    }
}

/// Явная таблица "игрок → место", которую ведёт внешний слой сессий.
#[derive(Clone, Debug, Default)]
pub struct SeatRegistry {
    seats: Arc<RwLock<HashMap<PlayerId, SeatIndex>>>,
}

impl SeatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, player_id: PlayerId, seat: SeatIndex) {
        if let Ok(mut seats) = self.seats.write() {
            seats.insert(player_id, seat);
        }
    }

    pub fn revoke(&self, player_id: PlayerId) {
        if let Ok(mut seats) = self.seats.write() {
            seats.remove(&player_id);
        }
    }
}

impl SeatAuthorizer for SeatRegistry {
    fn is_authorized(&self, player_id: PlayerId, seat: SeatIndex) -> bool {
        self.seats
            .read()
            .map(|seats| seats.get(&player_id) == Some(&seat))
            .unwrap_or(false)
    }
}
