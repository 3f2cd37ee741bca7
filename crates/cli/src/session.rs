// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity and dealing sessions.
use anyhow::{Result, bail};
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;

use showdown_eval::{
    Board, Card, Deck, EquityCalculator, EquityConfig, EquityResult, Hand, HandValue, PlayerId,
};

/// Computes and prints the equity of the given hands.
pub fn equity(hands: &[String], board: &str, config: EquityConfig) -> Result<()> {
    let hands = parse_hands(hands)?;
    let board = board.parse::<Board>()?;
    if !matches!(board.len(), 0 | 3 | 4 | 5) {
        bail!("Board must have 0, 3, 4, or 5 cards, got {}", board.len());
    }

    let calc = EquityCalculator::new(config)?;
    let result = calc.estimate(&hands, &board)?;
    print_equity(&hands, &board, &result);

    if board.is_complete() {
        print_showdown(&hands, &board)?;
    }

    Ok(())
}

/// Deals a hand to the players and prints the equity on each street.
pub fn deal(players: usize, config: EquityConfig) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut deck = Deck::new_and_shuffled(&mut rng);

    // One card at a time to each player.
    let mut cards = vec![Vec::with_capacity(2); players];
    for idx in 0..players * 2 {
        cards[idx % players].push(deck.deal()?);
    }

    let hands = cards
        .iter()
        .enumerate()
        .map(|(idx, c)| Ok((PlayerId(idx), Hand::new(c[0], c[1])?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let calc = EquityCalculator::new(config)?;
    let mut board = Board::default();

    for (street, count) in [("Preflop", 0), ("Flop", 3), ("Turn", 1), ("River", 1)] {
        if count > 0 {
            // Burn one.
            deck.deal()?;
            for _ in 0..count {
                board.push(deck.deal()?)?;
            }
        }

        info!("Dealing {street} for {players} players");
        println!("\n{street}");

        let result = calc.estimate(&hands, &board)?;
        print_equity(&hands, &board, &result);
    }

    print_showdown(&hands, &board)
}

fn parse_hands(hands: &[String]) -> Result<BTreeMap<PlayerId, Hand>> {
    hands
        .iter()
        .enumerate()
        .map(|(idx, h)| Ok((PlayerId(idx), h.parse::<Hand>()?)))
        .collect()
}

/// Returns the players with the best hand on a complete board with their
/// best five cards.
fn winners(
    hands: &BTreeMap<PlayerId, Hand>,
    board: &Board,
) -> Result<Vec<(PlayerId, HandValue, [Card; 5])>> {
    let mut values = Vec::with_capacity(hands.len());
    for (&id, hand) in hands {
        let cards = hand
            .cards()
            .iter()
            .chain(board.cards())
            .copied()
            .collect::<Vec<_>>();
        let (value, best) = HandValue::eval_with_best_hand(&cards)?;
        values.push((id, value, best));
    }

    let top = values.iter().map(|(_, v, _)| *v).max();
    values.retain(|(_, v, _)| Some(*v) == top);
    Ok(values)
}

fn print_equity(hands: &BTreeMap<PlayerId, Hand>, board: &Board, result: &EquityResult) {
    if board.is_empty() {
        println!("Board:  -");
    } else {
        println!("Board:  {board}");
    }

    for (id, eq) in result.iter() {
        let hand = hands.get(&id).map(Hand::to_string).unwrap_or_default();
        println!(
            "Player {id}  {hand}  {:6.2}%  (win {:.2}%, tie {:.2}%)",
            eq.equity, eq.win, eq.tie
        );
    }
}

fn print_showdown(hands: &BTreeMap<PlayerId, Hand>, board: &Board) -> Result<()> {
    println!();
    for (id, value, best) in winners(hands, board)? {
        let cards = best.map(|c| c.to_string()).join(" ");
        println!("Player {id} wins with {value}: {cards}");
    }

    Ok(())
}
