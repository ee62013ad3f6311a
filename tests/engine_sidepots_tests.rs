//! Main/side pots и раздача банков.

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;

use common::cards;
use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::hand::HandRank;
use poker_hand_engine::domain::SeatIndex;
use poker_hand_engine::engine::{distribute, finalize_pots, Contribution, SidePot};
use poker_hand_engine::eval::evaluate_cards;

fn c(seat: SeatIndex, amount: u64, folded: bool) -> Contribution {
    Contribution {
        seat,
        amount: Chips(amount),
        folded,
    }
}

fn rank(s: &str) -> HandRank {
    evaluate_cards(&cards(s)).expect("рука")
}

#[test]
fn short_all_in_caps_main_pot() {
    // A олл-ин на 50, B ставит 100, C коллирует 100.
    let pots = finalize_pots(&[c(0, 50, false), c(1, 100, false), c(2, 100, false)]);
    assert_eq!(
        pots,
        vec![
            SidePot {
                amount: Chips(150),
                eligible_seats: vec![0, 1, 2],
            },
            SidePot {
                amount: Chips(100),
                eligible_seats: vec![1, 2],
            },
        ]
    );
}

#[test]
fn short_stack_wins_main_and_side_goes_to_next_best() {
    let pots = finalize_pots(&[c(0, 50, false), c(1, 100, false), c(2, 100, false)]);

    let mut ranks = BTreeMap::new();
    ranks.insert(0, rank("As Ah Ac 2d 7h")); // сет
    ranks.insert(1, rank("Ks Kh 3c 2c 7d")); // пара
    ranks.insert(2, rank("Qs Jh 9c 4d 6h")); // старшая карта

    let awards = distribute(&pots, &ranks, &[0, 1, 2]);
    assert_eq!(awards.len(), 2);
    assert_eq!(awards[0].shares, vec![(0, Chips(150))]);
    assert_eq!(awards[1].shares, vec![(1, Chips(100))]);
    assert_eq!(awards[1].winning_rank, ranks.get(&1).copied());
}

#[test]
fn folded_chips_stay_in_pot_but_folded_seat_is_not_eligible() {
    // Фолд после вклада 30: его фишки в банке, но претендуют только B и C.
    let pots = finalize_pots(&[c(0, 30, true), c(1, 100, false), c(2, 100, false)]);
    assert_eq!(
        pots,
        vec![SidePot {
            amount: Chips(230),
            eligible_seats: vec![1, 2],
        }]
    );
}

#[test]
fn layer_contributed_only_by_folded_seat_merges_down() {
    // Сфолдивший внёс больше всех: верхний слой уходит в предыдущий банк.
    let pots = finalize_pots(&[c(0, 200, true), c(1, 50, false), c(2, 50, false)]);
    assert_eq!(
        pots,
        vec![SidePot {
            amount: Chips(300),
            eligible_seats: vec![1, 2],
        }]
    );
}

#[test]
fn several_all_ins_produce_layered_pots() {
    let pots = finalize_pots(&[
        c(0, 20, false),
        c(1, 60, false),
        c(2, 100, false),
        c(3, 100, false),
    ]);
    let amounts: Vec<u64> = pots.iter().map(|p| p.amount.0).collect();
    assert_eq!(amounts, vec![80, 120, 80]);
    assert_eq!(pots[0].eligible_seats, vec![0, 1, 2, 3]);
    assert_eq!(pots[1].eligible_seats, vec![1, 2, 3]);
    assert_eq!(pots[2].eligible_seats, vec![2, 3]);
}

#[test]
fn no_contributions_no_pots() {
    assert!(finalize_pots(&[]).is_empty());
    assert!(finalize_pots(&[c(0, 0, false), c(1, 0, true)]).is_empty());
}

#[test]
fn tie_splits_evenly_and_odd_chip_follows_seat_order() {
    let pots = vec![SidePot {
        amount: Chips(101),
        eligible_seats: vec![1, 2, 4],
    }];
    let mut ranks = BTreeMap::new();
    // Одинаковая сила в разных мастях.
    ranks.insert(2, rank("Ac Kd 9h 7s 3c"));
    ranks.insert(4, rank("Ad Kh 9s 7c 3d"));
    ranks.insert(1, rank("Qc Jd 9c 7d 3h"));

    // Кнопка на месте 2: порядок остатка 3, 4, 5, 0, 1, 2.
    let awards = distribute(&pots, &ranks, &[3, 4, 5, 0, 1, 2]);
    assert_eq!(awards[0].shares, vec![(4, Chips(51)), (2, Chips(50))]);

    // Тот же сплит при порядке по возрастанию места.
    let awards = distribute(&pots, &ranks, &[0, 1, 2, 3, 4, 5]);
    assert_eq!(awards[0].shares, vec![(2, Chips(51)), (4, Chips(50))]);
}

#[test]
fn levels_with_same_contenders_form_one_pot_and_split_once() {
    // Сфолдившие внесли 1, 2 и 3, двое оставшихся – по 4.
    let entries = [
        c(0, 1, true),
        c(1, 2, true),
        c(2, 3, true),
        c(3, 4, false),
        c(4, 4, false),
    ];
    let pots = finalize_pots(&entries);
    assert_eq!(
        pots,
        vec![SidePot {
            amount: Chips(14),
            eligible_seats: vec![3, 4],
        }]
    );

    let mut ranks = BTreeMap::new();
    ranks.insert(3, rank("Ac Kd 9h 7s 3c"));
    ranks.insert(4, rank("Ad Kh 9s 7c 3d"));

    // Один банк – остатка нет; по уровням вышло бы 8/6.
    let awards = distribute(&pots, &ranks, &[0, 1, 2, 3, 4, 5]);
    assert_eq!(awards.len(), 1);
    assert_eq!(awards[0].shares, vec![(3, Chips(7)), (4, Chips(7))]);
}

#[test]
fn three_way_tie_remainder_goes_one_chip_each() {
    let pots = vec![SidePot {
        amount: Chips(302),
        eligible_seats: vec![0, 1, 2],
    }];
    let same = rank("Ac Kd 9h 7s 3c");
    let ranks: BTreeMap<SeatIndex, HandRank> = [(0, same), (1, same), (2, same)].into_iter().collect();

    let awards = distribute(&pots, &ranks, &[1, 2, 0]);
    assert_eq!(
        awards[0].shares,
        vec![(1, Chips(101)), (2, Chips(101)), (0, Chips(100))]
    );
}

#[test]
fn pot_without_ranks_goes_to_eligible() {
    let pots = vec![SidePot {
        amount: Chips(150),
        eligible_seats: vec![3],
    }];
    let awards = distribute(&pots, &BTreeMap::new(), &[3]);
    assert_eq!(awards[0].shares, vec![(3, Chips(150))]);
    assert_eq!(awards[0].winning_rank, None);
}

proptest! {
    #[test]
    fn pots_preserve_total_contribution(
        entries in proptest::collection::vec((0u64..500, any::<bool>()), 2..9)
    ) {
        let contributions: Vec<Contribution> = entries
            .iter()
            .enumerate()
            .map(|(i, (amount, folded))| c(i as SeatIndex, *amount, *folded))
            .collect();
        let total: u64 = entries.iter().map(|(a, _)| *a).sum();

        let pots = finalize_pots(&contributions);
        let pots_total: u64 = pots.iter().map(|p| p.amount.0).sum();
        prop_assert_eq!(pots_total, total);

        let anyone_live = contributions.iter().any(|e| !e.folded && !e.amount.is_zero());
        for pot in &pots {
            // Пустой список претендентов возможен, только если все вложившиеся сфолдили.
            prop_assert!(!pot.eligible_seats.is_empty() || !anyone_live);
            for seat in &pot.eligible_seats {
                prop_assert!(!contributions[*seat as usize].folded);
            }
        }

        // Всё, что разыграно, выплачено (если есть кому).
        if anyone_live {
            let awards = distribute(&pots, &BTreeMap::new(), &[]);
            let paid: u64 = awards.iter().flat_map(|a| a.shares.iter()).map(|(_, x)| x.0).sum();
            prop_assert_eq!(paid, total);
        }
    }
}
