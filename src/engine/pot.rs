use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::domain::SeatIndex;
use crate::engine::errors::EngineError;

/// Учёт ставок раздачи: сколько всего внёс каждый seat.
///
/// Разбиение на main/side pots делается в конце (`side_pots::finalize_pots`),
/// здесь только накопление вкладов.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotManager {
    contributions: BTreeMap<SeatIndex, Chips>,
    total: Chips,
}

impl PotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Перенести `amount` из стека игрока в банк.
    ///
    /// Больше стека поставить нельзя – `InsufficientChips`, состояние не меняется.
    /// Если стек обнулился, игрок становится AllIn.
    pub fn record_bet(
        &mut self,
        seat: SeatIndex,
        player: &mut PlayerAtTable,
        amount: Chips,
    ) -> Result<Chips, EngineError> {
        let remaining = player
            .stack
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientChips {
                requested: amount,
                available: player.stack,
            })?;

        if amount.is_zero() {
            return Ok(Chips::ZERO);
        }

        player.stack = remaining;
        player.current_bet += amount;
        player.total_bet += amount;
        if player.stack.is_zero() && player.can_act() {
            player.status = PlayerStatus::AllIn;
        }

        *self.contributions.entry(seat).or_insert(Chips::ZERO) += amount;
        self.total += amount;
        Ok(amount)
    }

    /// Неуравненная часть самой большой ставки (без изменения состояния).
    ///
    /// Если максимальный вклад больше второго по величине, разница никем не
    /// уравнена и принадлежит владельцу.
    pub fn uncalled_excess(&self) -> Option<(SeatIndex, Chips)> {
        let mut top: Option<(SeatIndex, Chips)> = None;
        let mut second = Chips::ZERO;
        for (&seat, &amount) in &self.contributions {
            match top {
                Some((_, best)) if amount <= best => {
                    second = second.max(amount);
                }
                Some((_, best)) => {
                    second = best;
                    top = Some((seat, amount));
                }
                None => top = Some((seat, amount)),
            }
        }

        let (seat, amount) = top?;
        let excess = amount - second;
        if excess.is_zero() {
            None
        } else {
            Some((seat, excess))
        }
    }

    /// Убрать неуравненную часть из банка. Стек игрока обновляет вызывающий код.
    pub fn return_uncalled(&mut self) -> Option<(SeatIndex, Chips)> {
        let (seat, excess) = self.uncalled_excess()?;
        if let Some(c) = self.contributions.get_mut(&seat) {
            *c -= excess;
        }
        self.total -= excess;
        Some((seat, excess))
    }

    pub fn total(&self) -> Chips {
        self.total
    }

    pub fn contribution(&self, seat: SeatIndex) -> Chips {
        self.contributions.get(&seat).copied().unwrap_or(Chips::ZERO)
    }

    pub fn contributions(&self) -> &BTreeMap<SeatIndex, Chips> {
        &self.contributions
    }
}
