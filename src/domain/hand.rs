use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::{HandId, PlayerId, TableId};
use crate::eval::HandCategory;

/// Стадия раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Stage {
    /// Сколько карт борда открывается при входе в эту стадию.
    pub const fn board_cards_on_enter(self) -> usize {
        match self {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            _ => 0,
        }
    }

    /// Следующая улица торговли (для River → Showdown).
    pub const fn next(self) -> Stage {
        match self {
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River => Stage::Showdown,
            Stage::Showdown | Stage::Complete => Stage::Complete,
        }
    }

    pub const fn is_betting(self) -> bool {
        matches!(self, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
            Stage::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Сила руки. Полный порядок: больше = сильнее, равно = сплит.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);

/// Чем закончилась раздача.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandOutcome {
    /// Все, кроме одного, сфолдили – банк без вскрытия.
    Uncontested,
    /// Дошли до шоудауна.
    Showdown,
}

/// Выплата одного банка (main или side).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotResult {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
    /// Кто сколько забрал из этого банка.
    pub awards: Vec<(PlayerId, Chips)>,
    /// Категория выигравшей руки (None – банк без вскрытия).
    pub winning_category: Option<HandCategory>,
}

/// Результат конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    /// Итоговый ранг руки (если дошёл до шоудауна).
    pub rank: Option<HandRank>,
    /// Сколько поставил за раздачу (после возврата неуравненной ставки).
    pub contributed: Chips,
    /// Сколько забрал из банков.
    pub won: Chips,
    /// Является ли игрок победителем хотя бы одного банка.
    pub is_winner: bool,
}

/// Итог завершённой раздачи – запись для UI/логов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResult {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub stage_reached: Stage,
    pub outcome: HandOutcome,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    pub pots: Vec<PotResult>,
    pub players: Vec<PlayerHandResult>,
}

impl HandResult {
    pub fn winners(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_winner)
            .map(|p| p.player_id)
            .collect()
    }

    pub fn won_by(&self, player_id: PlayerId) -> Chips {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.won)
            .unwrap_or(Chips::ZERO)
    }
}

/// Отчёт об аварийном завершении раздачи (сбой chip-ledger).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbortReport {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub reason: String,
    /// Возвраты вкладов исходным владельцам.
    pub refunds: Vec<(PlayerId, Chips)>,
    /// Операции ledger, которые не удалось провести при откате.
    pub unreconciled: Vec<String>,
}
