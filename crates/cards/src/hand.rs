// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player hands, community board, and dealt cards.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{Card, Error, Result, parse_cards};

/// A player two hole cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hand([Card; 2]);

impl Hand {
    /// Creates a hand, the two cards must be different.
    pub fn new(c1: Card, c2: Card) -> Result<Self> {
        if c1 == c2 {
            Err(Error::DuplicateCard(c1))
        } else {
            Ok(Self([c1, c2]))
        }
    }

    /// The hand cards.
    pub fn cards(&self) -> &[Card; 2] {
        &self.0
    }
}

impl FromStr for Hand {
    type Err = Error;

    /// Parses a hand like `AS KD` or `AS,KD`.
    fn from_str(s: &str) -> Result<Self> {
        match parse_cards(s)?.as_slice() {
            &[c1, c2] => Hand::new(c1, c2),
            _ => Err(Error::InvalidCard(format!("hand {s}"))),
        }
    }
}

impl TryFrom<String> for Hand {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Hand> for String {
    fn from(hand: Hand) -> Self {
        hand.to_string()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

/// The community cards.
///
/// Cards are appended as they are dealt: three on the flop, one on the turn,
/// and one on the river.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// The number of cards on a complete board.
    pub const SIZE: usize = 5;

    /// Creates a board with the given cards.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        let mut board = Self::default();
        for card in cards {
            board.push(card)?;
        }

        Ok(board)
    }

    /// Appends a card to the board.
    pub fn push(&mut self, card: Card) -> Result<()> {
        if self.cards.len() == Self::SIZE {
            return Err(Error::BoardFull);
        }

        if self.cards.contains(&card) {
            return Err(Error::DuplicateCard(card));
        }

        self.cards.push(card);
        Ok(())
    }

    /// The board cards in dealing order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks if no cards have been dealt.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Checks if all five cards have been dealt.
    pub fn is_complete(&self) -> bool {
        self.cards.len() == Self::SIZE
    }

    /// The number of cards still to be dealt.
    pub fn missing(&self) -> usize {
        Self::SIZE.saturating_sub(self.cards.len())
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Board::with_cards(parse_cards(s)?)
    }
}

impl TryFrom<String> for Board {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, card) in self.cards.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }

            write!(f, "{card}")?;
        }

        Ok(())
    }
}

/// The set of cards visible at a table.
///
/// A 52 bits set indexed by [Card::index], adding a card that is already in
/// the set fails with [Error::DuplicateCard].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DealtSet(u64);

impl DealtSet {
    /// Adds a card to the set.
    pub fn insert(&mut self, card: Card) -> Result<()> {
        let bit = 1u64 << card.index();
        if self.0 & bit != 0 {
            return Err(Error::DuplicateCard(card));
        }

        self.0 |= bit;
        Ok(())
    }

    /// Adds all the cards to the set, stops at the first duplicate.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) -> Result<()> {
        cards.into_iter().try_for_each(|c| self.insert(c))
    }

    /// Checks if a card is in the set.
    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.0 & (1u64 << card.index()) != 0
    }

    /// Number of cards in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
