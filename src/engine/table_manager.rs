// src/engine/table_manager.rs

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::domain::chips::Chips;
use crate::domain::player::PlayerStatus;
use crate::domain::table::{ReviewFlag, Table, TableConfig};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{ForcedReason, PlayerAction};
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{self, HandEngine, HandStatus};
use crate::engine::hand_history::{HandEventKind, HandHistory, StageEvent};
use crate::engine::validation::{legal_actions, LegalActions};
use crate::engine::{ChipLedger, RandomSource, SeatAuthorizer};
use crate::infra::ids::IdGenerator;
use crate::time_ctrl::{AutoActionDecision, TimeController};

/// Один стол: состояние, текущая раздача, таймеры, отключения.
///
/// Все входы (действия, отключения, время) проходят через сессию
/// последовательно, поэтому раздача не видит гонок.
pub struct TableSession {
    table: Table,
    hand: Option<HandEngine>,
    time: TimeController,
    /// Логическое время стола, сек.
    now_secs: u64,
    ledger: Box<dyn ChipLedger + Send>,
    authorizer: Box<dyn SeatAuthorizer + Send + Sync>,
    events: Vec<StageEvent>,
    last_history: Option<HandHistory>,
    /// Пропускают раздачи из-за отключения (Disconnected на старте раздачи).
    set_aside: HashSet<PlayerId>,
    /// Вернулись во время раздачи, в игру войдут после неё.
    returning: HashSet<PlayerId>,
}

impl TableSession {
    pub fn new(
        table: Table,
        ledger: Box<dyn ChipLedger + Send>,
        authorizer: Box<dyn SeatAuthorizer + Send + Sync>,
    ) -> Self {
        let time = TimeController::new(table.config.time.clone());
        Self {
            table,
            hand: None,
            time,
            now_secs: 0,
            ledger,
            authorizer,
            events: Vec::new(),
            last_history: None,
            set_aside: HashSet::new(),
            returning: HashSet::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_id(&self) -> TableId {
        self.table.id
    }

    pub fn hand(&self) -> Option<&HandEngine> {
        self.hand.as_ref()
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    pub fn now_secs(&self) -> u64 {
        self.now_secs
    }

    /// История последней завершённой (или аннулированной) раздачи.
    pub fn last_history(&self) -> Option<&HandHistory> {
        self.last_history.as_ref()
    }

    pub fn seat_player(&mut self, seat: SeatIndex, player_id: PlayerId, stack: Chips) -> Result<(), EngineError> {
        self.table.seat_player(seat, player_id, stack)
    }

    pub fn remove_player(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        let player = self.table.remove_player(seat)?;
        self.set_aside.remove(&player.player_id);
        self.returning.remove(&player.player_id);
        self.time.grace.cancel(player.player_id);
        self.time.bank.forget(player.player_id);
        Ok(())
    }

    pub fn sit_in(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        self.table.sit_in(seat)
    }

    /// Снять флаг проверки после сбоя ledger.
    pub fn clear_review(&mut self) -> Option<ReviewFlag> {
        let flag = self.table.review.take();
        if let Some(flag) = &flag {
            info!(table_id = self.table.id, hand_id = flag.hand_id, "флаг проверки снят");
        }
        flag
    }

    /// Забрать события для клиентов (стадии, борд, чей ход).
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn start_hand<R: RandomSource>(&mut self, rng: &mut R, hand_id: HandId) -> Result<HandStatus, EngineError> {
        if self.hand.is_some() {
            return Err(EngineError::HandAlreadyInProgress);
        }
        // Disconnected на старте пропускают раздачу (станут SittingOut).
        self.set_aside.extend(
            self.table
                .seats
                .iter()
                .flatten()
                .filter(|p| p.is_disconnected())
                .map(|p| p.player_id),
        );
        let (engine, status) = game_loop::start_hand(&mut self.table, rng, hand_id, &mut *self.ledger)?;
        self.hand = Some(engine);
        self.after_step(status)
    }

    /// Действие от игрока. `actor` – кто прислал команду (после аутентификации).
    pub fn submit_action(&mut self, actor: PlayerId, action: PlayerAction) -> Result<HandStatus, EngineError> {
        if actor != action.player_id || !self.authorizer.is_authorized(actor, action.seat) {
            warn!(
                table_id = self.table.id,
                actor,
                seat = action.seat,
                "действие без прав на место"
            );
            return Err(EngineError::Unauthorized(actor));
        }

        let engine = self.hand.as_mut().ok_or(EngineError::NoActiveHand)?;
        // Пришла команда – значит, игрок снова на связи.
        if self.time.grace.is_tracking(actor) && engine.current_actor() == Some(action.seat) {
            self.reconnect_inner(actor);
        }

        let engine = self.hand.as_mut().ok_or(EngineError::NoActiveHand)?;
        let status = game_loop::apply_action(&mut self.table, engine, action, None, &mut *self.ledger)?;
        self.time.on_action(actor);
        self.after_step(status)
    }

    /// Игрок потерял связь. Во время своей раздачи он сохраняет место на grace-период.
    ///
    /// Возвращает статус, если отключение сразу привело к авто-действию (grace = 0).
    pub fn on_disconnect(&mut self, player_id: PlayerId) -> Result<Option<HandStatus>, EngineError> {
        let seat = self
            .table
            .seat_of(player_id)
            .ok_or(EngineError::PlayerNotAtTable(player_id))?;

        self.time.grace.start(player_id, self.now_secs);
        let player = self.table.player_mut(seat)?;
        // Folded/AllIn доигрывают раздачу как есть, отключение вступит в силу после неё.
        if player.status == PlayerStatus::Active {
            player.status = PlayerStatus::Disconnected;
        }
        if let Some(engine) = self.hand.as_mut() {
            engine.history.push(HandEventKind::PlayerDisconnected { player_id });
        }
        info!(
            table_id = self.table.id,
            player_id,
            seat,
            grace_secs = self.time.rules.reconnect_grace_secs,
            "игрок отключился"
        );

        self.resolve_pending(None)
    }

    /// Игрок вернулся до истечения grace – контроль над местом сохраняется.
    ///
    /// Уже подставленные за него действия не откатываются.
    pub fn on_reconnect(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        if self.table.seat_of(player_id).is_none() {
            return Err(EngineError::PlayerNotAtTable(player_id));
        }
        self.reconnect_inner(player_id);
        Ok(())
    }

    /// Disconnected снова Active. Если из-за отключения игрок пропустил
    /// старт раздачи, он возвращается в игру: сразу, если раздачи нет,
    /// иначе после текущей.
    fn reconnect_inner(&mut self, player_id: PlayerId) {
        let was_tracked = self.time.grace.cancel(player_id);
        let was_set_aside = self.set_aside.remove(&player_id);
        if was_set_aside && self.hand.is_some() {
            self.returning.insert(player_id);
        }
        let sit_in_now = was_set_aside && self.hand.is_none();
        if let Some(seat) = self.table.seat_of(player_id) {
            if let Ok(player) = self.table.player_mut(seat) {
                match player.status {
                    PlayerStatus::Disconnected => player.status = PlayerStatus::Active,
                    PlayerStatus::SittingOut if sit_in_now && !player.stack.is_zero() => {
                        player.status = PlayerStatus::Active;
                    }
                    _ => {}
                }
            }
        }
        if was_tracked {
            if let Some(engine) = self.hand.as_mut() {
                engine.history.push(HandEventKind::PlayerReconnected { player_id });
            }
            info!(table_id = self.table.id, player_id, "игрок вернулся");
        }
    }

    /// Прошло `delta_secs` логического времени.
    ///
    /// Таймер хода тикает только у подключённого актёра; у отключённого
    /// идёт только grace. Возвращает статус, если было хотя бы одно авто-действие.
    pub fn on_time_passed(&mut self, delta_secs: u32) -> Result<Option<HandStatus>, EngineError> {
        self.now_secs += u64::from(delta_secs);

        let Some(engine) = self.hand.as_mut() else {
            return Ok(None);
        };
        let Some(seat) = engine.current_actor() else {
            return Ok(None);
        };
        let player = self.table.player(seat)?;
        let mut status = None;

        if !player.is_disconnected() {
            let player_id = player.player_id;
            self.time.ensure_turn(player_id);
            if self.time.on_time_passed(delta_secs) == AutoActionDecision::TimeoutCheckOrFold {
                self.time.clock.clear();
                let s = game_loop::apply_forced_action(
                    &mut self.table,
                    engine,
                    ForcedReason::Timeout,
                    &mut *self.ledger,
                )?;
                status = Some(self.after_step(s)?);
            }
        }

        self.resolve_pending(status)
    }

    /// Подставить действия за всех подряд идущих актёров с истёкшим grace.
    fn resolve_pending(&mut self, mut status: Option<HandStatus>) -> Result<Option<HandStatus>, EngineError> {
        loop {
            let Some(engine) = self.hand.as_mut() else {
                return Ok(status);
            };
            let Some(seat) = engine.current_actor() else {
                return Ok(status);
            };
            let player = self.table.player(seat)?;
            let player_id = player.player_id;
            if !(player.is_disconnected() && self.time.grace_expired(player_id, self.now_secs)) {
                self.time.ensure_turn(player_id);
                return Ok(status);
            }

            let s = game_loop::apply_forced_action(
                &mut self.table,
                engine,
                ForcedReason::Disconnected,
                &mut *self.ledger,
            )?;
            self.time.clock.clear();
            status = Some(self.after_step(s)?);
        }
    }

    /// Общая обработка после каждого шага раздачи.
    fn after_step(&mut self, status: HandStatus) -> Result<HandStatus, EngineError> {
        if let Some(engine) = self.hand.as_mut() {
            self.events.extend(engine.drain_events());
        }

        if status.is_over() {
            if let Some(engine) = self.hand.take() {
                self.last_history = Some(engine.history);
            }
            self.time.clock.clear();
            self.apply_deferred_disconnects();
            self.apply_returns();
            debug!(table_id = self.table.id, "раздача закрыта");
            return Ok(status);
        }

        // Ход перешёл к отключённому с истёкшим grace – сразу авто-действие.
        match self.resolve_pending(None)? {
            Some(next) => Ok(next),
            None => Ok(status),
        }
    }

    /// Отключившиеся во время раздачи (Folded/AllIn) становятся Disconnected после неё.
    fn apply_deferred_disconnects(&mut self) {
        let tracked: Vec<PlayerId> = self.time.grace.tracked().collect();
        for player_id in tracked {
            let Some(seat) = self.table.seat_of(player_id) else {
                continue;
            };
            if let Ok(player) = self.table.player_mut(seat) {
                if player.status == PlayerStatus::Active {
                    player.status = PlayerStatus::Disconnected;
                }
            }
        }
    }

    fn apply_returns(&mut self) {
        for player_id in std::mem::take(&mut self.returning) {
            let Some(seat) = self.table.seat_of(player_id) else {
                continue;
            };
            if let Ok(player) = self.table.player_mut(seat) {
                if player.status == PlayerStatus::SittingOut && !player.stack.is_zero() {
                    player.status = PlayerStatus::Active;
                }
            }
        }
    }

    /// Подсказка клиенту: что может сделать игрок на месте `seat` прямо сейчас.
    pub fn legal_actions(&self, seat: SeatIndex) -> Result<LegalActions, EngineError> {
        let engine = self.hand.as_ref().ok_or(EngineError::NoActiveHand)?;
        let player = self.table.player(seat)?;
        Ok(legal_actions(seat, player, &engine.betting, self.table.config.stakes.big_blind))
    }
}

/// Менеджер столов: независимые сессии по TableId.
pub struct TableManager {
    tables: HashMap<TableId, TableSession>,
    ids: IdGenerator,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Создать стол с новым id.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        config: TableConfig,
        ledger: Box<dyn ChipLedger + Send>,
        authorizer: Box<dyn SeatAuthorizer + Send + Sync>,
    ) -> TableId {
        let id = self.ids.next_table_id();
        let table = Table::new(id, name.into(), config);
        self.tables.insert(id, TableSession::new(table, ledger, authorizer));
        info!(table_id = id, "стол создан");
        id
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn session(&self, table_id: TableId) -> Result<&TableSession, EngineError> {
        self.tables.get(&table_id).ok_or(EngineError::TableNotFound(table_id))
    }

    pub fn session_mut(&mut self, table_id: TableId) -> Result<&mut TableSession, EngineError> {
        self.tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))
    }

    /// Запустить новую раздачу на конкретном столе.
    pub fn start_hand<R: RandomSource>(
        &mut self,
        table_id: TableId,
        rng: &mut R,
    ) -> Result<(HandId, HandStatus), EngineError> {
        let hand_id = self.ids.next_hand_id();
        let session = self
            .tables
            .get_mut(&table_id)
            .ok_or(EngineError::TableNotFound(table_id))?;
        let status = session.start_hand(rng, hand_id)?;
        Ok((hand_id, status))
    }

    pub fn submit_action(
        &mut self,
        table_id: TableId,
        actor: PlayerId,
        action: PlayerAction,
    ) -> Result<HandStatus, EngineError> {
        self.session_mut(table_id)?.submit_action(actor, action)
    }

    /// Протекание времени на всех столах. Ошибка одного стола не трогает остальные.
    pub fn tick_all(&mut self, delta_secs: u32) -> Vec<(TableId, Result<Option<HandStatus>, EngineError>)> {
        let mut out = Vec::with_capacity(self.tables.len());
        for id in self.table_ids() {
            if let Some(session) = self.tables.get_mut(&id) {
                let res = session.on_time_passed(delta_secs);
                if let Err(e) = &res {
                    warn!(table_id = id, error = %e, "ошибка при обработке времени");
                }
                out.push((id, res));
            }
        }
        out
    }
}
