use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, Stage};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{ForcedReason, PlayerActionKind};
use crate::engine::betting::BettingRoundResult;

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted {
        table_id: TableId,
        hand_id: HandId,
    },

    /// Кнопка/блайнды.
    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: Option<(SeatIndex, Chips)>,
        ante: Vec<(SeatIndex, Chips)>,
    },

    /// Игрок получил карманную карту.
    HoleCardsDealt {
        seat: SeatIndex,
        cards: Vec<Card>,
    },

    /// Открыты общие карты. `cards` – новые, `board` – весь борд после открытия.
    BoardDealt {
        stage: Stage,
        cards: Vec<Card>,
        board: Vec<Card>,
    },

    /// Действие игрока (или подставленное за него).
    PlayerActed {
        player_id: PlayerId,
        seat: SeatIndex,
        action: PlayerActionKind,
        forced: Option<ForcedReason>,
        new_stack: Chips,
        pot_after: Chips,
    },

    /// Раунд ставок завершён.
    RoundFinished {
        stage: Stage,
        result: BettingRoundResult,
    },

    /// Неуравненная часть ставки вернулась игроку.
    UncalledReturned {
        seat: SeatIndex,
        amount: Chips,
    },

    /// Шоудаун – открытие карт.
    ShowdownReveal {
        seat: SeatIndex,
        player_id: PlayerId,
        hole_cards: Vec<Card>,
        rank: HandRank,
    },

    /// Выплата из банка.
    PotAwarded {
        seat: SeatIndex,
        player_id: PlayerId,
        amount: Chips,
    },

    PlayerDisconnected {
        player_id: PlayerId,
    },

    PlayerReconnected {
        player_id: PlayerId,
    },

    /// Раздача аннулирована, вклады возвращены.
    HandAborted {
        reason: String,
    },

    /// Раздача завершена.
    HandFinished {
        hand_id: HandId,
        table_id: TableId,
    },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    /// Сколько действий было подставлено за игрока по указанной причине.
    pub fn forced_count(&self, player_id: PlayerId, reason: ForcedReason) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    &e.kind,
                    HandEventKind::PlayerActed { player_id: p, forced: Some(r), .. }
                        if *p == player_id && *r == reason
                )
            })
            .count()
    }
}

/// Событие для клиентов в реальном времени: стадия, борд, чей ход.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageEvent {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub stage: Stage,
    pub board: Vec<Card>,
    pub acting_seat: Option<SeatIndex>,
    pub acting_player: Option<PlayerId>,
}
