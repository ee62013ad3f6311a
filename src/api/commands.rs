use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::PlayerAction;
use crate::engine::{RandomSource, TableSession};
use crate::infra::ids::IdGenerator;

use super::dto::{build_table_view, map_hand_status_to_response, CommandResponse};
use super::errors::ApiError;

/// Команды, которые относятся к существующему столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableCommand {
    /// Посадить игрока за стол.
    SeatPlayer {
        player_id: PlayerId,
        seat: SeatIndex,
        stack: Chips,
    },

    /// Убрать игрока с места (только между раздачами).
    UnseatPlayer { seat: SeatIndex },

    /// Вернуть игрока из sitting out.
    SitIn { seat: SeatIndex },

    /// Запустить новую раздачу (если сейчас нет активной).
    StartHand,

    /// Действие игрока в раздаче. `actor` – аутентифицированный отправитель.
    Act { actor: PlayerId, action: PlayerAction },

    /// Сеть сообщила, что игрок отвалился / вернулся.
    Disconnect { player_id: PlayerId },
    Reconnect { player_id: PlayerId },

    /// Прошло `delta_secs` логического времени.
    Tick { delta_secs: u32 },

    /// Что может сделать игрок на месте прямо сейчас.
    LegalActions { seat: SeatIndex },

    /// Снять флаг проверки после сбоя ledger.
    ClearReview,

    /// Текущее состояние стола глазами `viewer`.
    View { viewer: Option<PlayerId> },
}

/// Выполнить команду над сессией стола.
pub fn execute<R: RandomSource>(
    session: &mut TableSession,
    rng: &mut R,
    ids: &IdGenerator,
    command: TableCommand,
) -> Result<CommandResponse, ApiError> {
    debug!(table_id = session.table_id(), command = ?command, "команда стола");

    match command {
        TableCommand::SeatPlayer { player_id, seat, stack } => {
            session.seat_player(seat, player_id, stack)?;
            Ok(CommandResponse::TableState(build_table_view(session, Some(player_id))))
        }
        TableCommand::UnseatPlayer { seat } => {
            session.remove_player(seat)?;
            Ok(CommandResponse::Ok)
        }
        TableCommand::SitIn { seat } => {
            session.sit_in(seat)?;
            Ok(CommandResponse::Ok)
        }
        TableCommand::StartHand => {
            let status = session.start_hand(rng, ids.next_hand_id())?;
            Ok(map_hand_status_to_response(status, build_table_view(session, None)))
        }
        TableCommand::Act { actor, action } => {
            let status = session.submit_action(actor, action)?;
            Ok(map_hand_status_to_response(status, build_table_view(session, Some(actor))))
        }
        TableCommand::Disconnect { player_id } => {
            let status = session.on_disconnect(player_id)?;
            Ok(optional_status(session, status))
        }
        TableCommand::Reconnect { player_id } => {
            session.on_reconnect(player_id)?;
            Ok(CommandResponse::TableState(build_table_view(session, Some(player_id))))
        }
        TableCommand::Tick { delta_secs } => {
            let status = session.on_time_passed(delta_secs)?;
            Ok(optional_status(session, status))
        }
        TableCommand::LegalActions { seat } => Ok(CommandResponse::LegalActions(session.legal_actions(seat)?)),
        TableCommand::ClearReview => {
            session.clear_review();
            Ok(CommandResponse::Ok)
        }
        TableCommand::View { viewer } => Ok(CommandResponse::TableState(build_table_view(session, viewer))),
    }
}

fn optional_status(session: &TableSession, status: Option<crate::engine::HandStatus>) -> CommandResponse {
    match status {
        Some(status) => map_hand_status_to_response(status, build_table_view(session, None)),
        None => CommandResponse::Ok,
    }
}
