use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Статус игрока в контексте стола/раздачи.
///
/// Закрытый enum вместо набора bool-флагов: игрок не может одновременно
/// быть, например, Folded и AllIn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Игрок активен в текущей раздаче (или готов к следующей).
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок в олл-ине – ставок больше не делает, но претендует на банк.
    AllIn,
    /// Соединение потеряно, карты на руках. Когда дойдёт ход – авто check/fold.
    Disconnected,
    /// Игрок сидит за столом, но в раздаче не участвует.
    SittingOut,
}

/// Состояние игрока за конкретным столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка в текущем раунде ставок.
    pub current_bet: Chips,
    /// Сколько всего поставлено в текущей раздаче (все улицы).
    pub total_bet: Chips,
    pub status: PlayerStatus,
    /// Карманные карты (0, 1 или 2 для холдема).
    pub hole_cards: Vec<Card>,
}

impl PlayerAtTable {
    pub fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            current_bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            status: PlayerStatus::Active,
            hole_cards: Vec::new(),
        }
    }

    /// Претендует ли игрок на банк (не сфолдил и участвует в раздаче).
    pub fn is_in_hand(&self) -> bool {
        matches!(
            self.status,
            PlayerStatus::Active | PlayerStatus::AllIn | PlayerStatus::Disconnected
        )
    }

    /// Может ли игрок ещё делать ходы на улице (сам или через авто-действие).
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::Disconnected)
    }

    pub fn is_disconnected(&self) -> bool {
        self.status == PlayerStatus::Disconnected
    }

    /// Сброс "per-hand" полей перед новой раздачей.
    pub fn reset_for_hand(&mut self) {
        self.current_bet = Chips::ZERO;
        self.total_bet = Chips::ZERO;
        self.hole_cards.clear();
    }
}
