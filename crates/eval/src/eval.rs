// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! Evaluates 5, 6, and 7 cards hands, for hands with more than 5 cards the
//! value is the best value of all the 5 cards subsets.
//!
//! It provides a [HandValue::eval] method that computes a hand value without
//! extracting the best hand out of a 7 cards hand, useful for computing odds
//! and other stats, and a [HandValue::eval_with_best_hand] that computes the
//! hand value and returns the five best cards, useful for UIs to show a
//! winning hand.
use serde::{Deserialize, Serialize};
use std::fmt;

use showdown_cards::{Card, DealtSet};

use crate::{Error, Result};

/// The hand rank category, from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight of the same suit, a royal flush is the ace high straight flush.
    StraightFlush,
}

impl HandRank {
    /// Returns all the ranks from weakest to strongest.
    pub fn ranks() -> impl DoubleEndedIterator<Item = HandRank> {
        use HandRank::*;
        [
            HighCard,
            OnePair,
            TwoPair,
            ThreeOfAKind,
            Straight,
            Flush,
            FullHouse,
            FourOfAKind,
            StraightFlush,
        ]
        .into_iter()
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{label}")
    }
}

/// The value of a hand.
///
/// Values compare by rank and then by the tie break ranks, two hands with
/// the same value split the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandValue {
    rank: HandRank,
    /// Rank values (2..=14) highest first, unused positions are zero.
    key: [u8; 5],
}

impl HandValue {
    /// A value lower than any hand.
    const NONE: HandValue = HandValue {
        rank: HandRank::HighCard,
        key: [0; 5],
    };

    /// Evaluates a 5, 6, or 7 cards hand.
    ///
    /// Returns an error if the number of cards is out of range or if a card
    /// appears more than once.
    pub fn eval(cards: &[Card]) -> Result<Self> {
        check_hand(cards)?;
        Ok(Self::eval_unchecked(cards))
    }

    /// Evaluates a 5, 6, or 7 cards hand and returns the best five cards.
    ///
    /// The best cards are ordered for display with the cards that make the
    /// hand rank first and the kickers last.
    pub fn eval_with_best_hand(cards: &[Card]) -> Result<(Self, [Card; 5])> {
        check_hand(cards)?;

        let (mut value, mut hand) = (HandValue::NONE, [cards[0]; 5]);
        for_each_five(cards, |h| {
            let v = eval5(h);
            if v > value {
                (value, hand) = (v, *h);
            }
        });

        value.order_for_display(&mut hand);
        Ok((value, hand))
    }

    /// Evaluates cards that have already been checked for size and duplicates.
    pub(crate) fn eval_unchecked(cards: &[Card]) -> Self {
        debug_assert!((5..=7).contains(&cards.len()));

        let mut best = HandValue::NONE;
        for_each_five(cards, |hand| best = best.max(eval5(hand)));
        best
    }

    /// The hand rank category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The tie break rank values (2..=14), highest priority first.
    ///
    /// For straights this is the straight high card, 5 for the wheel.
    pub fn tie_break(&self) -> &[u8] {
        let len = self.key.iter().take_while(|&&r| r != 0).count();
        &self.key[..len]
    }

    /// A description of this hand, an ace high straight flush is a royal
    /// flush.
    pub fn description(&self) -> String {
        match self.rank {
            HandRank::StraightFlush if self.key[0] == 14 => "Royal Flush".to_string(),
            rank => rank.to_string(),
        }
    }

    fn order_for_display(&self, hand: &mut [Card; 5]) {
        let mut counts = [0u8; 13];
        for c in hand.iter() {
            counts[c.rank_bits() as usize] += 1;
        }

        let is_wheel = matches!(self.rank, HandRank::Straight | HandRank::StraightFlush)
            && self.key[0] == 5;

        hand.sort_by_key(|c| {
            let rank = c.rank_bits();
            // In the wheel the ace plays low.
            let rank = if is_wheel && rank == 12 { 0 } else { rank + 1 };
            (std::cmp::Reverse(counts[c.rank_bits() as usize]), std::cmp::Reverse(rank))
        });
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// The rank mask of an A-5-4-3-2 straight.
const WHEEL_MASK: u16 = 0b1_0000_0000_1111;

/// Checks the hand size and that there are no duplicate cards.
fn check_hand(cards: &[Card]) -> Result<()> {
    if !(5..=7).contains(&cards.len()) {
        return Err(Error::InvalidHandSize(cards.len()));
    }

    let mut dealt = DealtSet::default();
    dealt.extend(cards.iter().copied())?;
    Ok(())
}

/// Calls `f` for each 5 cards subset of up to 7 cards.
#[inline]
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut(&[Card; 5]),
{
    let n = cards.len();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        f(&[cards[a], cards[b], cards[c], cards[d], cards[e]]);
                    }
                }
            }
        }
    }
}

/// Returns the straight high card value if the mask has 5 consecutive ranks.
#[inline]
fn straight_high(mask: u16) -> Option<u8> {
    if mask.count_ones() != 5 {
        return None;
    }

    if mask == WHEEL_MASK {
        return Some(5);
    }

    let low = mask.trailing_zeros();
    (mask >> low == 0b1_1111).then_some(low as u8 + 6)
}

/// Evaluates a 5 cards hand.
fn eval5(hand: &[Card; 5]) -> HandValue {
    let mut counts = [0u8; 13];
    let mut mask = 0u16;
    let mut suits = 0xfu8;

    for c in hand {
        counts[c.rank_bits() as usize] += 1;
        mask |= c.rank_mask();
        suits &= c.suit_bits();
    }

    let is_flush = suits != 0;
    let straight = straight_high(mask);

    // How many ranks appear once, twice, three, and four times.
    let mut groups = [0u8; 5];
    for &n in &counts {
        groups[n as usize] += 1;
    }

    let rank = match (straight, is_flush) {
        (Some(_), true) => HandRank::StraightFlush,
        _ if groups[4] == 1 => HandRank::FourOfAKind,
        _ if groups[3] == 1 && groups[2] == 1 => HandRank::FullHouse,
        (_, true) => HandRank::Flush,
        (Some(_), false) => HandRank::Straight,
        _ if groups[3] == 1 => HandRank::ThreeOfAKind,
        _ if groups[2] == 2 => HandRank::TwoPair,
        _ if groups[2] == 1 => HandRank::OnePair,
        _ => HandRank::HighCard,
    };

    let mut key = [0u8; 5];
    match straight {
        Some(high) => key[0] = high,
        _ => {
            // Larger groups first, higher ranks first within a group.
            let mut len = 0;
            for n in (1..=4).rev() {
                for r in (0..13).rev() {
                    if counts[r] == n {
                        key[len] = r as u8 + 2;
                        len += 1;
                    }
                }
            }
        }
    }

    HandValue { rank, key }
}
