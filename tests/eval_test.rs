//! Оценка рук: категории, кикеры, колесо, ошибки, перестановки.

mod common;

use proptest::prelude::*;

use common::cards;
use poker_hand_engine::domain::card::Card;
use poker_hand_engine::domain::deck::Deck;
use poker_hand_engine::engine::EngineError;
use poker_hand_engine::eval::{describe_hand, evaluate_best_hand, evaluate_cards, hand_category, HandCategory};

fn category_of(s: &str) -> HandCategory {
    hand_category(evaluate_cards(&cards(s)).expect("валидная рука"))
}

#[test]
fn categories_are_detected() {
    assert_eq!(category_of("2c 5d 9h Js Kc"), HandCategory::HighCard);
    assert_eq!(category_of("2c 2d 9h Js Kc"), HandCategory::OnePair);
    assert_eq!(category_of("2c 2d 9h 9s Kc"), HandCategory::TwoPair);
    assert_eq!(category_of("2c 2d 2h 9s Kc"), HandCategory::ThreeOfAKind);
    assert_eq!(category_of("5c 6d 7h 8s 9c"), HandCategory::Straight);
    assert_eq!(category_of("2h 6h 9h Jh Kh"), HandCategory::Flush);
    assert_eq!(category_of("2c 2d 2h 9s 9c"), HandCategory::FullHouse);
    assert_eq!(category_of("2c 2d 2h 2s 9c"), HandCategory::FourOfAKind);
    assert_eq!(category_of("5h 6h 7h 8h 9h"), HandCategory::StraightFlush);
}

#[test]
fn category_order_beats_kickers() {
    let ordered = [
        "Ac Kd 9h 7s 3c",
        "2c 2d 3h 4s 6c",
        "2c 2d 3h 3s 4c",
        "2c 2d 2h 3s 4c",
        "Ac 2d 3h 4s 5c",
        "2h 3h 4h 5h 7h",
        "2c 2d 2h 3s 3c",
        "2c 2d 2h 2s 3c",
        "Ah 2h 3h 4h 5h",
    ];
    let ranks: Vec<_> = ordered
        .iter()
        .map(|s| evaluate_cards(&cards(s)).expect("рука"))
        .collect();
    for pair in ranks.windows(2) {
        assert!(pair[0] < pair[1], "{:?} должна быть слабее {:?}", pair[0], pair[1]);
    }
}

#[test]
fn kickers_break_ties() {
    let kk_ace = evaluate_cards(&cards("Kc Kd Ah 7s 3c")).unwrap();
    let kk_queen = evaluate_cards(&cards("Kh Ks Qh 7d 3d")).unwrap();
    assert!(kk_ace > kk_queen);

    // Две пары: сначала старшая пара, потом младшая, потом кикер.
    let kk77_a = evaluate_cards(&cards("Kc Kd 7h 7s Ac")).unwrap();
    let kk77_q = evaluate_cards(&cards("Kh Ks 7d 7c Qd")).unwrap();
    let kk66_a = evaluate_cards(&cards("Kh Ks 6d 6c Ad")).unwrap();
    assert!(kk77_a > kk77_q);
    assert!(kk77_q > kk66_a);

    assert_eq!(describe_hand(kk77_a), "Two pair (K, 7, A)");
}

#[test]
fn identical_strength_in_different_suits_ties() {
    let a = evaluate_cards(&cards("Ac Kd 9h 7s 3c")).unwrap();
    let b = evaluate_cards(&cards("Ad Kh 9s 7c 3d")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = evaluate_cards(&cards("Ac 2d 3h 4s 5c")).unwrap();
    let six_high = evaluate_cards(&cards("2d 3h 4s 5c 6h")).unwrap();
    assert_eq!(hand_category(wheel), HandCategory::Straight);
    assert!(wheel < six_high);

    let steel_wheel = evaluate_cards(&cards("Ah 2h 3h 4h 5h")).unwrap();
    let six_high_sf = evaluate_cards(&cards("2h 3h 4h 5h 6h")).unwrap();
    assert_eq!(hand_category(steel_wheel), HandCategory::StraightFlush);
    assert!(steel_wheel < six_high_sf);
}

#[test]
fn best_five_of_seven_is_chosen() {
    let hole = cards("Ah Kh");
    let board = cards("Qh Jh Th 2c 2d");
    let rank = evaluate_best_hand(&hole, &board).unwrap();
    assert_eq!(hand_category(rank), HandCategory::StraightFlush);

    // Борд играет сам за себя: карманные карты не улучшают.
    let a = evaluate_best_hand(&cards("2c 3d"), &cards("Ah Kh Qh Jh Th")).unwrap();
    let b = evaluate_best_hand(&cards("4s 5s"), &cards("Ah Kh Qh Jh Th")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn too_few_or_too_many_cards_is_an_error() {
    let err = evaluate_best_hand(&cards("Ah Kh"), &cards("Qh Jh")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidEvaluationState { cards: 4 }));

    let err = evaluate_cards(&cards("Ah Kh Qh Jh Th 9h 8h 7h")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidEvaluationState { cards: 8 }));
}

#[test]
fn duplicate_card_is_an_error() {
    let err = evaluate_best_hand(&cards("Ah Kh"), &cards("Ah 2c 3d 4s 9h")).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateCard(c) if c.to_string() == "Ah"));
}

fn seven_distinct_cards() -> impl Strategy<Value = Vec<Card>> {
    Just(Deck::standard_52().cards)
        .prop_shuffle()
        .prop_map(|mut all| {
            all.truncate(7);
            all
        })
}

proptest! {
    #[test]
    fn rank_does_not_depend_on_card_order(hand in seven_distinct_cards(), rotate in 0usize..7) {
        let base = evaluate_cards(&hand).unwrap();
        let mut reordered = hand.clone();
        reordered.rotate_left(rotate);
        reordered.reverse();
        prop_assert_eq!(base, evaluate_cards(&reordered).unwrap());
        prop_assert_eq!(base, evaluate_best_hand(&hand[..2], &hand[2..]).unwrap());
    }

    #[test]
    fn comparison_is_a_total_order(a in seven_distinct_cards(), b in seven_distinct_cards()) {
        let ra = evaluate_cards(&a).unwrap();
        let rb = evaluate_cards(&b).unwrap();
        // Ровно одно из трёх.
        let outcomes = [ra < rb, ra == rb, ra > rb];
        prop_assert_eq!(outcomes.iter().filter(|x| **x).count(), 1);
        // Категория монотонна по рангу.
        if hand_category(ra) > hand_category(rb) {
            prop_assert!(ra > rb);
        }
    }
}
