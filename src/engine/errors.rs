use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex, TableId};

use thiserror::Error;

/// Ошибки внешнего chip-ledger (кошелёк игрока вне стола).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Недостаточно средств у игрока {player_id}: нужно {requested}, есть {available}")]
    InsufficientBalance {
        player_id: PlayerId,
        requested: Chips,
        available: Chips,
    },

    #[error("Счёт игрока {0} не найден")]
    UnknownAccount(PlayerId),

    #[error("Ledger недоступен: {0}")]
    Unavailable(String),
}

/// Ошибки движка покера.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("В этом месте нет игрока")]
    EmptySeat,

    #[error("Место {0} уже занято")]
    SeatOccupied(SeatIndex),

    #[error("Игрок {0} уже сидит за столом")]
    AlreadySeated(PlayerId),

    #[error("Игрок {0} не найден за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Игрок {0} не авторизован для этого места")]
    Unauthorized(PlayerId),

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Сейчас не ход игрока с id={0}")]
    OutOfTurnAction(PlayerId),

    #[error("Недопустимое действие: {0}")]
    IllegalAction(&'static str),

    #[error("Недостаточно фишек: запрошено {requested}, в стеке {available}")]
    InsufficientChips { requested: Chips, available: Chips },

    #[error("Размер ставки слишком мал, минимум до {min_to}")]
    RaiseTooSmall { min_to: Chips },

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("Оценка руки вызвана с {cards} картами (нужно 5–7)")]
    InvalidEvaluationState { cards: usize },

    #[error("Карта {0} встречается дважды")]
    DuplicateCard(Card),

    #[error("В колоде закончились карты")]
    DeckExhausted,

    #[error("Стол {0} заблокирован до ручной проверки")]
    TableUnderReview(TableId),

    #[error("Ошибка ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
