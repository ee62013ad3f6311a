use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::PlayerAtTable;
use crate::domain::SeatIndex;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

const CLOSED: &str = "неполный олл-ин не переоткрыл торговлю: только call или fold";

/// Что может сделать актёр прямо сейчас (для подсказки клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegalActions {
    /// Сколько нужно доплатить до call (0 – можно check).
    pub to_call: Chips,
    pub can_check: bool,
    /// Call возможен; если стека не хватает – это all-in call на весь стек.
    pub can_call: bool,
    /// Bet возможен (на улице ещё нет ставки).
    pub can_bet: bool,
    /// Минимальный bet / raise-to; None – повысить нельзя.
    pub min_raise_to: Option<Chips>,
    /// Максимальная ставка на улице = текущая ставка игрока + стек.
    pub max_raise_to: Chips,
    pub can_all_in: bool,
}

/// Список допустимых действий для игрока при текущем состоянии ставок.
pub fn legal_actions(seat: SeatIndex, player: &PlayerAtTable, betting: &BettingState, big_blind: Chips) -> LegalActions {
    let to_call = betting.to_call(player);
    let max_raise_to = player.current_bet + player.stack;
    let reopened = betting.can_reraise(seat);
    let can_increase = player.can_act() && player.stack > to_call && reopened;

    let min_raise_to = if !can_increase {
        None
    } else if betting.current_bet.is_zero() {
        Some(big_blind.min(max_raise_to))
    } else {
        Some((betting.current_bet + betting.min_raise).min(max_raise_to))
    };

    LegalActions {
        to_call,
        can_check: player.can_act() && to_call.is_zero(),
        can_call: player.can_act() && !to_call.is_zero(),
        can_bet: can_increase && betting.current_bet.is_zero(),
        min_raise_to,
        max_raise_to,
        can_all_in: player.can_act() && !player.stack.is_zero() && (reopened || player.stack <= to_call),
    }
}

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
///
/// Возвращает, сколько фишек действие переносит из стека в банк.
pub fn validate_action(
    seat: SeatIndex,
    player: &PlayerAtTable,
    action: &PlayerActionKind,
    betting: &BettingState,
    big_blind: Chips,
) -> Result<Chips, EngineError> {
    if !player.can_act() {
        return Err(EngineError::IllegalAction("игрок не может ходить в этом статусе"));
    }

    let stack = player.stack;
    let to_call = betting.to_call(player);

    match action {
        PlayerActionKind::Fold => Ok(Chips::ZERO),

        PlayerActionKind::Check => {
            if to_call.is_zero() {
                Ok(Chips::ZERO)
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                Err(EngineError::CannotCall)
            } else {
                // Не хватает на полный call – ставим всё (all-in call).
                Ok(to_call.min(stack))
            }
        }

        PlayerActionKind::Bet(amount) => {
            if !betting.current_bet.is_zero() {
                return Err(EngineError::IllegalAction("bet при существующей ставке, нужен raise"));
            }
            if amount.is_zero() {
                return Err(EngineError::IllegalAction("bet должен быть больше нуля"));
            }
            if *amount > stack {
                return Err(EngineError::InsufficientChips {
                    requested: *amount,
                    available: stack,
                });
            }
            if *amount < big_blind && *amount < stack {
                return Err(EngineError::RaiseTooSmall { min_to: big_blind });
            }
            Ok(*amount)
        }

        PlayerActionKind::Raise(total_bet) => {
            if betting.current_bet.is_zero() {
                // Когда нет ставки – это bet, а не raise.
                return Err(EngineError::IllegalAction("raise без ставки, нужен bet"));
            }

            let min_to = betting.current_bet + betting.min_raise;
            if *total_bet <= betting.current_bet {
                return Err(EngineError::RaiseTooSmall { min_to });
            }

            let diff = total_bet.saturating_sub(player.current_bet);
            if diff > stack {
                return Err(EngineError::InsufficientChips {
                    requested: diff,
                    available: stack,
                });
            }

            // Неполный рейз допустим только олл-ином.
            if *total_bet < min_to && diff < stack {
                return Err(EngineError::RaiseTooSmall { min_to });
            }
            if !betting.can_reraise(seat) {
                return Err(EngineError::IllegalAction(CLOSED));
            }

            Ok(diff)
        }

        PlayerActionKind::AllIn => {
            if stack.is_zero() {
                return Err(EngineError::IllegalAction("all-in с пустым стеком"));
            }
            if stack > to_call && !betting.can_reraise(seat) {
                return Err(EngineError::IllegalAction(CLOSED));
            }
            Ok(stack)
        }
    }
}
