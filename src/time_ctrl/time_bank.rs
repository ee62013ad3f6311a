// src/time_ctrl/time_bank.rs
//! Таймбанк игроков: сколько секунд дополнительного времени у кого осталось.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// Таймбанк одного игрока (секунды).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTimeBank {
    pub remaining_secs: u32,
}

impl PlayerTimeBank {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            remaining_secs: initial_secs,
        }
    }

    /// Выдать `requested` секунд из таймбанка.
    /// Возвращает фактически выданное (может быть меньше, если банк пустеет).
    pub fn grant(&mut self, requested: u32) -> u32 {
        let grant = requested.min(self.remaining_secs);
        self.remaining_secs -= grant;
        grant
    }
}

/// Таймбанки всех игроков стола. Игрок без записи получает `initial_secs` при первом обращении.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimeBank {
    initial_secs: u32,
    players: HashMap<PlayerId, PlayerTimeBank>,
}

impl TimeBank {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            initial_secs,
            players: HashMap::new(),
        }
    }

    /// Выдать `requested` секунд extra-time для текущего хода игрока.
    pub fn grant_for_turn(&mut self, player_id: PlayerId, requested: u32) -> u32 {
        let initial = self.initial_secs;
        self.players
            .entry(player_id)
            .or_insert_with(|| PlayerTimeBank::new(initial))
            .grant(requested)
    }

    /// Остаток таймбанка у игрока (для отображения на фронте).
    pub fn remaining_for(&self, player_id: PlayerId) -> u32 {
        self.players
            .get(&player_id)
            .map(|b| b.remaining_secs)
            .unwrap_or(self.initial_secs)
    }

    /// Игрок ушёл со стола – его банк больше не нужен.
    pub fn forget(&mut self, player_id: PlayerId) {
        self.players.remove(&player_id);
    }
}
