use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, SeatIndex};

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки (размер ставки).
    Bet(Chips),
    /// Raise существующей ставки – итоговая ставка на улице ("raise to").
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    /// Какой игрок действует.
    pub player_id: PlayerId,
    /// В каком месте он сидит (0..max_seats-1).
    pub seat: SeatIndex,
    /// Само действие.
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, seat: SeatIndex, kind: PlayerActionKind) -> Self {
        Self {
            player_id,
            seat,
            kind,
        }
    }
}

/// Почему действие было сделано за игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ForcedReason {
    /// Истекло время на ход (включая таймбанк).
    Timeout,
    /// Игрок отключён и не вернулся за grace-период.
    Disconnected,
}

/// Какое действие подставить за игрока: fold, если есть что уравнивать, иначе check.
pub fn forced_action_kind(to_call: Chips) -> PlayerActionKind {
    if to_call.is_zero() {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Fold
    }
}
