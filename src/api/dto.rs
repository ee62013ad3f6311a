use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{AbortReport, HandResult, Stage};
use crate::domain::player::PlayerStatus;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::{HandStatus, LegalActions, TableSession};

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTableDto {
    pub player_id: PlayerId,
    pub seat_index: SeatIndex,
    pub stack: Chips,
    pub current_bet: Chips,
    pub status: PlayerStatus,
    /// Карманные карты – только для самого игрока.
    pub hole_cards: Option<Vec<Card>>,
}

/// DTO стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableViewDto {
    pub table_id: TableId,
    pub name: String,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub hand_id: Option<HandId>,
    /// Стадия текущей раздачи (None – раздачи нет).
    pub stage: Option<Stage>,
    pub dealer_button: Option<SeatIndex>,
    pub total_pot: Chips,
    pub board: Vec<Card>,
    pub players: Vec<PlayerAtTableDto>,
    pub hand_in_progress: bool,
    /// Текущий игрок, чей ход (если раздача идёт).
    pub current_actor_seat: Option<SeatIndex>,
    /// Стол заблокирован после сбоя ledger.
    pub under_review: bool,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CommandResponse {
    /// Успешный результат без доп.данных.
    Ok,

    /// Вернуть обновлённое состояние стола.
    TableState(TableViewDto),

    /// Раздача закончилась.
    HandFinished {
        table: TableViewDto,
        result: HandResult,
    },

    /// Раздача аннулирована из-за сбоя ledger.
    HandAborted {
        table: TableViewDto,
        report: AbortReport,
    },

    LegalActions(LegalActions),
}

/// Собрать вид стола. Чужие карманные карты скрыты.
pub fn build_table_view(session: &TableSession, viewer: Option<PlayerId>) -> TableViewDto {
    let table = session.table();
    let hand = session.hand();

    let players = table
        .seats
        .iter()
        .enumerate()
        .filter_map(|(idx, seat)| seat.as_ref().map(|p| (idx as SeatIndex, p)))
        .map(|(seat_index, p)| PlayerAtTableDto {
            player_id: p.player_id,
            seat_index,
            stack: p.stack,
            current_bet: p.current_bet,
            status: p.status,
            hole_cards: (viewer == Some(p.player_id) && !p.hole_cards.is_empty()).then(|| p.hole_cards.clone()),
        })
        .collect();

    TableViewDto {
        table_id: table.id,
        name: table.name.clone(),
        max_seats: table.max_seats(),
        small_blind: table.config.stakes.small_blind,
        big_blind: table.config.stakes.big_blind,
        ante: table.config.stakes.ante,
        hand_id: hand.map(|h| h.hand_id),
        stage: hand.map(|h| h.stage),
        dealer_button: table.dealer_button,
        total_pot: hand.map(|h| h.pot.total()).unwrap_or(Chips::ZERO),
        board: hand.map(|h| h.board.clone()).unwrap_or_default(),
        players,
        hand_in_progress: table.hand_in_progress,
        current_actor_seat: hand.and_then(|h| h.current_actor()),
        under_review: table.review.is_some(),
    }
}

/// Помощник: преобразование HandStatus движка в ответ.
pub fn map_hand_status_to_response(status: HandStatus, table: TableViewDto) -> CommandResponse {
    match status {
        HandStatus::Ongoing => CommandResponse::TableState(table),
        HandStatus::Finished(result, _history) => CommandResponse::HandFinished { table, result },
        HandStatus::Aborted(report) => CommandResponse::HandAborted { table, report },
    }
}
