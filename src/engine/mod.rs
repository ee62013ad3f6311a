//! Покерный движок: ставки, переход стадий, сайд-поты, шоудаун.
//!
//! Высокоуровневые объекты:
//!   - `HandEngine` – состояние одной раздачи (`start_hand` / `apply_action`);
//!   - `TableSession` – стол + раздача + таймеры + отключения;
//!   - `TableManager` – набор независимых столов.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod side_pots;
pub mod table_manager;
pub mod validation;

pub use actions::{ForcedReason, PlayerAction, PlayerActionKind};
pub use betting::{BettingRoundResult, BettingState};
pub use errors::{EngineError, LedgerError};
pub use game_loop::{apply_action, apply_forced_action, start_hand, HandEngine, HandStatus};
pub use hand_history::{HandEvent, HandEventKind, HandHistory, StageEvent};
pub use pot::PotManager;
pub use side_pots::{distribute, finalize_pots, Contribution, PotAward, SidePot};
pub use table_manager::{TableManager, TableSession};
pub use validation::{legal_actions, LegalActions};

use crate::domain::{Chips, PlayerId, SeatIndex};

/// RNG интерфейс для engine. Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

/// Внешний учёт фишек игрока. Операции атомарны и fail-closed:
/// при нехватке баланса deduct падает и ничего не списывает.
pub trait ChipLedger {
    fn deduct(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError>;
    fn credit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError>;
}

/// Проверка "этот актёр действительно управляет этим местом".
pub trait SeatAuthorizer {
    fn is_authorized(&self, player_id: PlayerId, seat: SeatIndex) -> bool;
}

impl<F> SeatAuthorizer for F
where
    F: Fn(PlayerId, SeatIndex) -> bool,
{
    fn is_authorized(&self, player_id: PlayerId, seat: SeatIndex) -> bool {
        self(player_id, seat)
    }
}
