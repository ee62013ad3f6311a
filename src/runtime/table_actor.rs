//! Актёр стола: все входы стола (команды, отключения, тики времени)
//! обрабатываются одним таском по очереди. Столы между собой независимы.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{execute, ApiError, CommandResponse, TableCommand};
use crate::domain::TableId;
use crate::engine::{RandomSource, StageEvent, TableSession};
use crate::infra::ids::IdGenerator;

const INBOX_CAPACITY: usize = 128;
const EVENTS_CAPACITY: usize = 256;

/// Сообщение в почтовый ящик стола.
#[derive(Debug)]
pub enum TableMessage {
    Command {
        command: TableCommand,
        reply: oneshot::Sender<Result<CommandResponse, ApiError>>,
    },
    Shutdown,
}

/// Ручка для общения с актёром стола. Дёшево клонируется.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableMessage>,
    events: broadcast::Sender<StageEvent>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Отправить команду и дождаться ответа.
    pub async fn send(&self, command: TableCommand) -> Result<CommandResponse, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Command { command, reply })
            .await
            .map_err(|_| ApiError::Internal(format!("table {} actor stopped", self.table_id)))?;
        rx.await
            .map_err(|_| ApiError::Internal(format!("table {} dropped reply", self.table_id)))?
    }

    /// Подписка на события стадий (борд, чей ход).
    pub fn subscribe(&self) -> broadcast::Receiver<StageEvent> {
        self.events.subscribe()
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(TableMessage::Shutdown).await;
    }
}

/// Актёр стола.
pub struct TableActor<R> {
    session: TableSession,
    rng: R,
    ids: Arc<IdGenerator>,
    inbox: mpsc::Receiver<TableMessage>,
    events: broadcast::Sender<StageEvent>,
    /// Период автоматического тика; None – время двигают только команды Tick.
    tick: Option<Duration>,
}

impl<R> TableActor<R>
where
    R: RandomSource + Send + 'static,
{
    pub fn new(session: TableSession, rng: R, ids: Arc<IdGenerator>, tick: Option<Duration>) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (events, _) = broadcast::channel(EVENTS_CAPACITY);
        let handle = TableHandle {
            table_id: session.table_id(),
            sender,
            events: events.clone(),
        };
        let actor = Self {
            session,
            rng,
            ids,
            inbox,
            events,
            tick,
        };
        (actor, handle)
    }

    /// Цикл обработки сообщений.
    pub async fn run(mut self) {
        let table_id = self.session.table_id();
        info!(table_id, "актёр стола запущен");

        let period = self.tick.unwrap_or(Duration::from_secs(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut elapsed = ElapsedSecs::new(Instant::now());

        loop {
            tokio::select! {
                msg = self.inbox.recv() => match msg {
                    Some(TableMessage::Command { command, reply }) => {
                        let result = self.handle(command);
                        if reply.send(result).is_err() {
                            debug!(table_id, "отправитель команды не дождался ответа");
                        }
                    }
                    Some(TableMessage::Shutdown) | None => break,
                },
                now = ticker.tick(), if self.tick.is_some() => {
                    let delta_secs = elapsed.advance(now);
                    if delta_secs == 0 {
                        continue;
                    }
                    if let Err(e) = self.handle(TableCommand::Tick { delta_secs }) {
                        warn!(table_id, error = %e, "ошибка тика");
                    }
                }
            }
        }

        info!(table_id, "актёр стола остановлен");
    }

    fn handle(&mut self, command: TableCommand) -> Result<CommandResponse, ApiError> {
        let result = execute(&mut self.session, &mut self.rng, &self.ids, command);
        for event in self.session.drain_events() {
            // Нет подписчиков – не ошибка.
            let _ = self.events.send(event);
        }
        result
    }
}

/// Реальное время между тиками в целых секундах; дробный остаток
/// переносится на следующий тик.
#[derive(Debug)]
struct ElapsedSecs {
    last: Instant,
    carry: Duration,
}

impl ElapsedSecs {
    fn new(start: Instant) -> Self {
        Self {
            last: start,
            carry: Duration::ZERO,
        }
    }

    fn advance(&mut self, now: Instant) -> u32 {
        self.carry += now.saturating_duration_since(self.last);
        self.last = now;
        let whole = u32::try_from(self.carry.as_secs()).unwrap_or(u32::MAX);
        self.carry -= Duration::from_secs(u64::from(whole));
        whole
    }
}

/// Запустить актёра стола в текущем tokio-рантайме.
pub fn spawn_table<R>(session: TableSession, rng: R, ids: Arc<IdGenerator>, tick: Option<Duration>) -> TableHandle
where
    R: RandomSource + Send + 'static,
{
    let (actor, handle) = TableActor::new(session, rng, ids, tick);
    tokio::spawn(actor.run());
    handle
}
