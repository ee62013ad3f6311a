use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use crate::domain::blinds::AnteType;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{
    AbortReport, HandOutcome, HandRank, HandResult, PlayerHandResult, PotResult, Stage,
};
use crate::domain::player::PlayerStatus;
use crate::domain::table::{OddChipRule, ReviewFlag, Table};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{forced_action_kind, ForcedReason, PlayerAction, PlayerActionKind};
use crate::engine::betting::{build_queue, queue_after_raise, round_outcome, BettingRoundResult, BettingState};
use crate::engine::errors::{EngineError, LedgerError};
use crate::engine::hand_history::{HandEventKind, HandHistory, StageEvent};
use crate::engine::positions::{next_dealer, seat_order_left_of, seats_from};
use crate::engine::pot::PotManager;
use crate::engine::side_pots::{distribute, finalize_pots, Contribution, PotAward};
use crate::engine::validation::validate_action;
use crate::engine::{ChipLedger, RandomSource};
use crate::eval::{evaluate_best_hand, hand_category};

/// Статус раздачи для внешнего кода.
#[derive(Clone, Debug, PartialEq)]
pub enum HandStatus {
    Ongoing,
    Finished(HandResult, HandHistory),
    /// Сбой ledger: вклады возвращены, стол помечен на проверку.
    Aborted(AbortReport),
}

impl HandStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, HandStatus::Ongoing)
    }
}

/// Внутреннее состояние раздачи.
#[derive(Clone, Debug)]
pub struct HandEngine {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub deck: Deck,
    /// Общие карты. Только 0, 3, 4 или 5 штук.
    pub board: Vec<Card>,
    pub stage: Stage,
    pub betting: BettingState,
    pub pot: PotManager,
    /// Итоги раундов ставок по улицам.
    pub round_results: Vec<(Stage, BettingRoundResult)>,
    /// История раздачи.
    pub history: HandHistory,
    /// Стеки участников до блайндов – для отката при сбое ledger.
    starting_stacks: BTreeMap<SeatIndex, Chips>,
    /// Выплаты, уже проведённые через ledger.
    credited: Vec<(PlayerId, Chips)>,
    events: Vec<StageEvent>,
}

impl HandEngine {
    fn new(table_id: TableId, hand_id: HandId, deck: Deck, big_blind: Chips) -> Self {
        Self {
            table_id,
            hand_id,
            deck,
            board: Vec::new(),
            stage: Stage::Preflop,
            betting: BettingState::new(Stage::Preflop, Chips::ZERO, big_blind, Vec::new()),
            pot: PotManager::new(),
            round_results: Vec::new(),
            history: HandHistory::new(),
            starting_stacks: BTreeMap::new(),
            credited: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Чей сейчас ход (seat). None вне торговли.
    pub fn current_actor(&self) -> Option<SeatIndex> {
        if self.stage.is_betting() {
            self.betting.current_actor()
        } else {
            None
        }
    }

    /// Места, получившие карты в этой раздаче.
    pub fn participants(&self) -> impl Iterator<Item = SeatIndex> + '_ {
        self.starting_stacks.keys().copied()
    }

    /// Забрать накопленные события для клиентов.
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit_stage_event(&mut self, table: &Table) {
        let acting_seat = self.current_actor();
        let acting_player = acting_seat
            .and_then(|s| table.seats.get(s as usize))
            .and_then(|s| s.as_ref())
            .map(|p| p.player_id);
        self.events.push(StageEvent {
            table_id: self.table_id,
            hand_id: self.hand_id,
            stage: self.stage,
            board: self.board.clone(),
            acting_seat,
            acting_player,
        });
    }
}

/// Старт новой раздачи:
/// - нормализует статусы (отключённые и пустые стеки пропускают раздачу);
/// - двигает кнопку;
/// - постит анте/блайнды через ledger;
/// - раздаёт карманные карты и открывает префлоп.
///
/// Если торговли нет (все в олл-ине с блайндов), раздача сразу доигрывается.
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    hand_id: HandId,
    ledger: &mut dyn ChipLedger,
) -> Result<(HandEngine, HandStatus), EngineError> {
    if table.hand_in_progress {
        return Err(EngineError::HandAlreadyInProgress);
    }
    if table.review.is_some() {
        return Err(EngineError::TableUnderReview(table.id));
    }

    // Обновляем статусы игроков.
    for p in table.seats.iter_mut().flatten() {
        p.reset_for_hand();
        p.status = match p.status {
            PlayerStatus::Disconnected | PlayerStatus::SittingOut => PlayerStatus::SittingOut,
            _ if p.stack.is_zero() => PlayerStatus::SittingOut,
            _ => PlayerStatus::Active,
        };
    }

    let dealt_in = seats_from(table, 0, |p| p.status == PlayerStatus::Active);
    if dealt_in.len() < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    // Определяем дилера (кнопку).
    let dealer_seat =
        next_dealer(table, |p| p.status == PlayerStatus::Active).ok_or(EngineError::NotEnoughPlayers)?;
    table.dealer_button = Some(dealer_seat);
    table.current_hand_id = Some(hand_id);
    table.hand_in_progress = true;

    let mut engine = HandEngine::new(table.id, hand_id, Deck::shuffled(rng), table.config.stakes.big_blind);
    for &seat in &dealt_in {
        let stack = table.player(seat)?.stack;
        engine.starting_stacks.insert(seat, stack);
    }

    engine.history.push(HandEventKind::HandStarted {
        table_id: table.id,
        hand_id,
    });
    info!(
        table_id = table.id,
        hand_id,
        dealer = dealer_seat,
        players = dealt_in.len(),
        "раздача началась"
    );

    let bb_seat = match post_blinds_and_antes(table, &mut engine, dealer_seat, ledger) {
        Ok(seat) => seat,
        Err(EngineError::Ledger(e)) => {
            let status = abort_hand(table, &mut engine, ledger, e);
            return Ok((engine, status));
        }
        Err(e) => return Err(e),
    };

    deal_hole_cards(table, &mut engine, dealer_seat)?;

    // Префлоп: первым ходит игрок слева от BB, BB ходит последним.
    let max = table.seats.len().max(1);
    let first = ((bb_seat as usize + 1) % max) as SeatIndex;
    engine.betting.to_act = build_queue(table, first, engine.betting.current_bet);

    let status = transition(table, &mut engine, ledger)?;
    Ok((engine, status))
}

/// Постинг анте и блайндов. Возвращает место большого блайнда.
///
/// Хедз-ап: кнопка ставит малый блайнд и первой ходит на префлопе.
fn post_blinds_and_antes(
    table: &mut Table,
    engine: &mut HandEngine,
    dealer_seat: SeatIndex,
    ledger: &mut dyn ChipLedger,
) -> Result<SeatIndex, EngineError> {
    let stakes = table.config.stakes.clone();
    let order = seats_from(table, dealer_seat, |p| p.status == PlayerStatus::Active);

    let (sb_seat, bb_seat) = if order.len() == 2 {
        (order[0], order[1])
    } else {
        (order[1], order[2 % order.len()])
    };

    // Анте не входит в ставку улицы.
    let mut ante_events = Vec::new();
    let ante_payers: Vec<SeatIndex> = match stakes.ante_type {
        AnteType::None => Vec::new(),
        AnteType::Classic => order.clone(),
        AnteType::BigBlind => vec![bb_seat],
    };
    if !stakes.ante.is_zero() {
        for seat in ante_payers {
            let amount = stakes.ante.min(table.player(seat)?.stack);
            let paid = commit_chips(table, engine, seat, amount, ledger)?;
            let player = table.player_mut(seat)?;
            player.current_bet = player.current_bet.saturating_sub(paid);
            ante_events.push((seat, paid));
        }
    }

    let sb_amount = stakes.small_blind.min(table.player(sb_seat)?.stack);
    let sb_paid = commit_chips(table, engine, sb_seat, sb_amount, ledger)?;
    let bb_amount = stakes.big_blind.min(table.player(bb_seat)?.stack);
    let bb_paid = commit_chips(table, engine, bb_seat, bb_amount, ledger)?;

    // Короткий олл-ин блайнда не поднимает цель выше фактически поставленного.
    engine.betting.current_bet = sb_paid.max(bb_paid);
    engine.betting.min_raise = stakes.big_blind;
    engine.betting.last_aggressor = Some(bb_seat);

    engine.history.push(HandEventKind::BlindsPosted {
        dealer: dealer_seat,
        small_blind: Some((sb_seat, sb_paid)),
        big_blind: Some((bb_seat, bb_paid)),
        ante: ante_events,
    });
    debug!(
        table_id = table.id,
        hand_id = engine.hand_id,
        sb_seat,
        %sb_paid,
        bb_seat,
        %bb_paid,
        "блайнды поставлены"
    );

    Ok(bb_seat)
}

/// Раздача карманных карт – по 2 карты, по кругу слева от кнопки.
fn deal_hole_cards(table: &mut Table, engine: &mut HandEngine, dealer_seat: SeatIndex) -> Result<(), EngineError> {
    let max = table.seats.len().max(1);
    let start = ((dealer_seat as usize + 1) % max) as SeatIndex;
    let order = seats_from(table, start, |p| p.is_in_hand());

    for _round in 0..2 {
        for &seat in &order {
            let card = engine.deck.draw_one()?;
            table.player_mut(seat)?.hole_cards.push(card);
            engine.history.push(HandEventKind::HoleCardsDealt {
                seat,
                cards: vec![card],
            });
        }
    }
    Ok(())
}

/// Перенести фишки из стека в банк: сначала списание в ledger, потом учёт в банке.
fn commit_chips(
    table: &mut Table,
    engine: &mut HandEngine,
    seat: SeatIndex,
    amount: Chips,
    ledger: &mut dyn ChipLedger,
) -> Result<Chips, EngineError> {
    if amount.is_zero() {
        return Ok(Chips::ZERO);
    }
    let player = table.player_mut(seat)?;
    if amount > player.stack {
        return Err(EngineError::InsufficientChips {
            requested: amount,
            available: player.stack,
        });
    }
    ledger.deduct(player.player_id, amount)?;
    engine.pot.record_bet(seat, player, amount)
}

/// Применить действие игрока. Возвращает статус раздачи (идёт / закончилась).
///
/// Действие не того игрока отклоняется без изменения состояния.
pub fn apply_action(
    table: &mut Table,
    engine: &mut HandEngine,
    action: PlayerAction,
    forced: Option<ForcedReason>,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress || !engine.stage.is_betting() {
        return Err(EngineError::NoActiveHand);
    }

    let seat = action.seat;
    if seat as usize >= table.seats.len() {
        return Err(EngineError::InvalidSeat(seat));
    }
    let player = table.player(seat)?;
    if player.player_id != action.player_id {
        return Err(EngineError::PlayerNotAtTable(action.player_id));
    }

    // Проверяем, что сейчас ход этого seat.
    if engine.current_actor() != Some(seat) {
        warn!(
            table_id = table.id,
            hand_id = engine.hand_id,
            player_id = action.player_id,
            seat,
            expected = ?engine.current_actor(),
            "действие не в свою очередь"
        );
        return Err(EngineError::OutOfTurnAction(action.player_id));
    }

    let amount = validate_action(seat, player, &action.kind, &engine.betting, table.config.stakes.big_blind)?;
    let bet_before = engine.betting.current_bet;

    match action.kind {
        PlayerActionKind::Fold => {
            table.player_mut(seat)?.status = PlayerStatus::Folded;
        }
        PlayerActionKind::Check => {}
        PlayerActionKind::Call
        | PlayerActionKind::Bet(_)
        | PlayerActionKind::Raise(_)
        | PlayerActionKind::AllIn => match commit_chips(table, engine, seat, amount, ledger) {
            Ok(_) => {}
            Err(EngineError::Ledger(e)) => return Ok(abort_hand(table, engine, ledger, e)),
            Err(e) => return Err(e),
        },
    }

    let (player_id, new_stack, new_bet) = {
        let p = table.player(seat)?;
        (p.player_id, p.stack, p.current_bet)
    };

    // Ставка сверху текущей → bet/raise (полный или неполный олл-ин).
    if new_bet > bet_before {
        let raise_size = new_bet - bet_before;
        let queue = queue_after_raise(table, seat);
        engine.betting.on_raise(seat, new_bet, raise_size, queue);
    } else {
        engine.betting.mark_acted(seat);
    }

    engine.history.push(HandEventKind::PlayerActed {
        player_id,
        seat,
        action: action.kind,
        forced,
        new_stack,
        pot_after: engine.pot.total(),
    });
    debug!(
        table_id = table.id,
        hand_id = engine.hand_id,
        player_id,
        seat,
        action = ?action.kind,
        forced = ?forced,
        pot = %engine.pot.total(),
        "действие применено"
    );

    transition(table, engine, ledger)
}

/// Подставить действие за текущего актёра: fold, если есть что уравнивать, иначе check.
pub fn apply_forced_action(
    table: &mut Table,
    engine: &mut HandEngine,
    reason: ForcedReason,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    let seat = engine.current_actor().ok_or(EngineError::NoActiveHand)?;
    let player = table.player(seat)?;
    let kind = forced_action_kind(engine.betting.to_call(player));
    warn!(
        table_id = table.id,
        hand_id = engine.hand_id,
        player_id = player.player_id,
        seat,
        reason = ?reason,
        action = ?kind,
        "действие за игрока"
    );
    let action = PlayerAction::new(player.player_id, seat, kind);
    apply_action(table, engine, action, Some(reason), ledger)
}

/// Единственная функция перехода стадий.
///
/// Крутится, пока раздача не упрётся в ожидание хода или не завершится.
fn transition(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    loop {
        match engine.stage {
            street if street.is_betting() => {
                let Some(result) = round_outcome(table, &engine.betting) else {
                    engine.emit_stage_event(table);
                    return Ok(HandStatus::Ongoing);
                };

                engine.round_results.push((street, result));
                engine.history.push(HandEventKind::RoundFinished { stage: street, result });
                debug!(
                    table_id = table.id,
                    hand_id = engine.hand_id,
                    stage = %street,
                    result = ?result,
                    "раунд ставок завершён"
                );

                match result {
                    BettingRoundResult::FoldedToOne(winner) => {
                        return finish_uncontested(table, engine, winner, ledger);
                    }
                    BettingRoundResult::BetsMatched => {
                        let next = street.next();
                        if next.is_betting() {
                            open_street(table, engine, next)?;
                        } else {
                            engine.stage = Stage::Showdown;
                        }
                    }
                    BettingRoundResult::AllInStandoff => {
                        run_out_board(table, engine)?;
                        engine.stage = Stage::Showdown;
                    }
                }
            }
            Stage::Showdown => return finish_showdown(table, engine, ledger),
            _ => return Err(EngineError::Internal("переход после завершения раздачи")),
        }
    }
}

/// Открыть карты улицы (с прожигом одной карты).
fn deal_board_cards(engine: &mut HandEngine, street: Stage) -> Result<(), EngineError> {
    let count = street.board_cards_on_enter();
    if count == 0 {
        return Ok(());
    }
    engine.deck.draw_one()?;
    let cards = engine.deck.draw_n(count)?;
    engine.board.extend_from_slice(&cards);
    engine.history.push(HandEventKind::BoardDealt {
        stage: street,
        cards,
        board: engine.board.clone(),
    });
    Ok(())
}

/// Новая улица торговли: борд, сброс ставок, очередь слева от кнопки.
fn open_street(table: &mut Table, engine: &mut HandEngine, street: Stage) -> Result<(), EngineError> {
    deal_board_cards(engine, street)?;
    engine.stage = street;

    for p in table.seats.iter_mut().flatten() {
        p.current_bet = Chips::ZERO;
    }

    let button = table.dealer_button.unwrap_or(0);
    let max = table.seats.len().max(1);
    let first = ((button as usize + 1) % max) as SeatIndex;
    let queue = build_queue(table, first, Chips::ZERO);
    engine.betting = BettingState::new(street, Chips::ZERO, table.config.stakes.big_blind, queue);

    debug!(
        table_id = table.id,
        hand_id = engine.hand_id,
        stage = %street,
        board = ?engine.board,
        "новая улица"
    );
    Ok(())
}

/// Торговли больше нет – открываем оставшиеся улицы подряд.
fn run_out_board(table: &mut Table, engine: &mut HandEngine) -> Result<(), EngineError> {
    let mut street = engine.stage.next();
    while street.is_betting() {
        deal_board_cards(engine, street)?;
        engine.stage = street;
        engine.betting = BettingState::new(street, Chips::ZERO, table.config.stakes.big_blind, Vec::new());
        engine.emit_stage_event(table);
        street = street.next();
    }
    for p in table.seats.iter_mut().flatten() {
        p.current_bet = Chips::ZERO;
    }
    Ok(())
}

/// Вернуть неуравненную ставку владельцу. Ledger – до изменения банка.
fn return_uncalled_bet(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut dyn ChipLedger,
) -> Result<(), EngineError> {
    let Some((seat, excess)) = engine.pot.uncalled_excess() else {
        return Ok(());
    };
    let player_id = table.player(seat)?.player_id;
    ledger.credit(player_id, excess)?;
    engine.pot.return_uncalled();

    let player = table.player_mut(seat)?;
    player.stack += excess;
    player.total_bet = player.total_bet.saturating_sub(excess);
    engine.history.push(HandEventKind::UncalledReturned { seat, amount: excess });
    debug!(table_id = table.id, hand_id = engine.hand_id, seat, %excess, "неуравненная ставка возвращена");
    Ok(())
}

/// Все, кроме одного, сфолдили: банк без вскрытия, оставшийся борд не открывается.
fn finish_uncontested(
    table: &mut Table,
    engine: &mut HandEngine,
    winner: SeatIndex,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    debug!(table_id = table.id, hand_id = engine.hand_id, winner, "банк без вскрытия");
    let stage_reached = engine.stage;
    settle(table, engine, HandOutcome::Uncontested, stage_reached, BTreeMap::new(), ledger)
}

/// Шоудаун: оценка рук, сайд-поты, выплаты.
fn finish_showdown(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    let mut ranks: BTreeMap<SeatIndex, HandRank> = BTreeMap::new();
    for seat in seats_from(table, 0, |p| p.is_in_hand()) {
        let player = table.player(seat)?;
        let rank = evaluate_best_hand(&player.hole_cards, &engine.board)?;
        engine.history.push(HandEventKind::ShowdownReveal {
            seat,
            player_id: player.player_id,
            hole_cards: player.hole_cards.clone(),
            rank,
        });
        ranks.insert(seat, rank);
    }
    settle(table, engine, HandOutcome::Showdown, Stage::Showdown, ranks, ledger)
}

/// Общий хвост раздачи: возврат неуравненного, банки, выплаты, итог.
fn settle(
    table: &mut Table,
    engine: &mut HandEngine,
    outcome: HandOutcome,
    stage_reached: Stage,
    ranks: BTreeMap<SeatIndex, HandRank>,
    ledger: &mut dyn ChipLedger,
) -> Result<HandStatus, EngineError> {
    match return_uncalled_bet(table, engine, ledger) {
        Ok(()) => {}
        Err(EngineError::Ledger(e)) => return Ok(abort_hand(table, engine, ledger, e)),
        Err(e) => return Err(e),
    }

    let entries: Vec<Contribution> = engine
        .pot
        .contributions()
        .iter()
        .map(|(&seat, &amount)| Contribution {
            seat,
            amount,
            folded: table
                .seats
                .get(seat as usize)
                .and_then(|s| s.as_ref())
                .map(|p| !p.is_in_hand())
                .unwrap_or(true),
        })
        .collect();
    let pots = finalize_pots(&entries);

    let seat_order = match table.config.odd_chip {
        OddChipRule::LeftOfButton => seat_order_left_of(table, table.dealer_button.unwrap_or(0)),
        OddChipRule::LowestSeat => Vec::new(),
    };
    let awards = distribute(&pots, &ranks, &seat_order);

    if let Err(e) = pay_awards(table, engine, &awards, ledger) {
        return match e {
            EngineError::Ledger(e) => Ok(abort_hand(table, engine, ledger, e)),
            other => Err(other),
        };
    }

    let result = build_result(table, engine, outcome, stage_reached, &awards, &ranks)?;
    engine.stage = Stage::Complete;
    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
    });
    engine.emit_stage_event(table);
    close_hand(table);

    info!(
        table_id = table.id,
        hand_id = engine.hand_id,
        outcome = ?outcome,
        pot = %result.total_pot,
        winners = ?result.winners(),
        "раздача завершена"
    );
    Ok(HandStatus::Finished(result, engine.history.clone()))
}

fn pay_awards(
    table: &mut Table,
    engine: &mut HandEngine,
    awards: &[PotAward],
    ledger: &mut dyn ChipLedger,
) -> Result<(), EngineError> {
    for award in awards {
        for &(seat, amount) in &award.shares {
            if amount.is_zero() {
                continue;
            }
            let player = table.player_mut(seat)?;
            ledger.credit(player.player_id, amount)?;
            player.stack += amount;
            engine.credited.push((player.player_id, amount));
            engine.history.push(HandEventKind::PotAwarded {
                seat,
                player_id: player.player_id,
                amount,
            });
        }
    }
    Ok(())
}

fn build_result(
    table: &Table,
    engine: &HandEngine,
    outcome: HandOutcome,
    stage_reached: Stage,
    awards: &[PotAward],
    ranks: &BTreeMap<SeatIndex, HandRank>,
) -> Result<HandResult, EngineError> {
    let player_id_of = |seat: SeatIndex| table.player(seat).map(|p| p.player_id);

    let mut pots = Vec::with_capacity(awards.len());
    for award in awards {
        pots.push(PotResult {
            amount: award.amount,
            eligible: award
                .eligible_seats
                .iter()
                .map(|s| player_id_of(*s))
                .collect::<Result<_, _>>()?,
            awards: award
                .shares
                .iter()
                .map(|(s, amount)| player_id_of(*s).map(|id| (id, *amount)))
                .collect::<Result<_, _>>()?,
            winning_category: award.winning_rank.map(hand_category),
        });
    }

    let mut players = Vec::new();
    for seat in engine.participants() {
        let won: Chips = awards
            .iter()
            .flat_map(|a| a.shares.iter())
            .filter(|(s, _)| *s == seat)
            .map(|(_, amount)| *amount)
            .sum();
        players.push(PlayerHandResult {
            player_id: player_id_of(seat)?,
            seat,
            rank: ranks.get(&seat).copied(),
            contributed: engine.pot.contribution(seat),
            won,
            is_winner: !won.is_zero(),
        });
    }

    Ok(HandResult {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
        stage_reached,
        outcome,
        board: engine.board.clone(),
        total_pot: engine.pot.total(),
        pots,
        players,
    })
}

/// Раздача закрыта: снимаем флаг, сбрасываем ставки (фишки уже в стеках),
/// пустые стеки – SittingOut.
fn close_hand(table: &mut Table) {
    table.hand_in_progress = false;
    for p in table.seats.iter_mut().flatten() {
        p.current_bet = Chips::ZERO;
        p.total_bet = Chips::ZERO;
        p.status = match p.status {
            PlayerStatus::Disconnected => PlayerStatus::Disconnected,
            PlayerStatus::SittingOut => PlayerStatus::SittingOut,
            _ if p.stack.is_zero() => PlayerStatus::SittingOut,
            _ => PlayerStatus::Active,
        };
    }
}

/// Сбой ledger: откатить выплаты, вернуть вклады, восстановить стеки,
/// пометить стол на проверку.
fn abort_hand(
    table: &mut Table,
    engine: &mut HandEngine,
    ledger: &mut dyn ChipLedger,
    cause: LedgerError,
) -> HandStatus {
    let reason = cause.to_string();
    error!(
        table_id = table.id,
        hand_id = engine.hand_id,
        %reason,
        "сбой учёта фишек, раздача аннулирована"
    );

    let mut unreconciled = Vec::new();
    for (player_id, amount) in std::mem::take(&mut engine.credited) {
        if let Err(e) = ledger.deduct(player_id, amount) {
            unreconciled.push(format!("откат выплаты {amount} игроку {player_id}: {e}"));
        }
    }

    let mut refunds = Vec::new();
    for (&seat, &amount) in engine.pot.contributions() {
        if amount.is_zero() {
            continue;
        }
        let Some(player) = table.seats.get(seat as usize).and_then(|s| s.as_ref()) else {
            continue;
        };
        if let Err(e) = ledger.credit(player.player_id, amount) {
            unreconciled.push(format!("возврат {amount} игроку {}: {e}", player.player_id));
        }
        refunds.push((player.player_id, amount));
    }

    for (&seat, &stack) in &engine.starting_stacks {
        if let Some(p) = table.seats.get_mut(seat as usize).and_then(|s| s.as_mut()) {
            p.stack = stack;
            p.reset_for_hand();
        }
    }

    if !unreconciled.is_empty() {
        error!(
            table_id = table.id,
            hand_id = engine.hand_id,
            failed = unreconciled.len(),
            "откат проведён не полностью"
        );
    }

    engine.stage = Stage::Complete;
    engine.history.push(HandEventKind::HandAborted { reason: reason.clone() });
    engine.emit_stage_event(table);
    close_hand(table);
    table.review = Some(ReviewFlag {
        hand_id: engine.hand_id,
        reason: reason.clone(),
    });

    HandStatus::Aborted(AbortReport {
        hand_id: engine.hand_id,
        table_id: engine.table_id,
        reason,
        refunds,
        unreconciled,
    })
}
