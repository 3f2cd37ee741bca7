// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{DealtSet, Error, Result};

mod ksubset;
#[cfg(feature = "parallel")]
mod parallel;

/// A Poker card.
///
/// A card is packed in a u32 that is used as a stable lookup key, each card
/// has the following format:
///
/// ```text
///   +--------+--------+--------+--------+
///   |xxxbbbbb|bbbbbbbb|cdhsrrrr|xxiiiiii|
///   +--------+--------+--------+--------+
///   i = card index in the canonical deck order (2C=0,3C=1,...,AS=51)
///   r = rank of card (deuce=0,trey=1,four=2,five=3,...,ace=12)
///   cdhs = suit of card
///   b = bit turned on depending on rank of card
/// ```
///
/// Cards order by rank and then by suit, the order is only used for
/// deterministic iteration and display.
///
/// Cards serialize as their string form, e.g. `"AS"`, and deserializing goes
/// through [FromStr] so that a malformed card is rejected.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(u32);

/// A Poker card.
impl Card {
    /// Create a card given a suit and rank.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        let index = suit.index() as u32 * Rank::COUNT as u32 + rank as u32;
        let (rank, suit) = (rank as u32, suit as u32);
        Self(index | (rank << 8) | (suit << 12) | (1 << (rank + 16)))
    }

    /// Create a card from a rank value in 2..=14 and a suit letter.
    ///
    /// Returns [Error::InvalidCard] if the rank or the suit are out of range.
    pub fn from_parts(rank: u8, suit: char) -> Result<Card> {
        Ok(Card::new(Rank::try_from(rank)?, Suit::try_from(suit)?))
    }

    /// This card unique id.
    pub fn id(&self) -> u32 {
        self.0
    }

    /// The card position in the canonical deck, in 0..52.
    #[inline]
    pub fn index(&self) -> usize {
        (self.0 & 0x3f) as usize
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        let suit_bits = self.suit_bits();
        match suit_bits {
            0x8 => Suit::Clubs,
            0x4 => Suit::Diamonds,
            0x2 => Suit::Hearts,
            0x1 => Suit::Spades,
            _ => panic!("Invalid suit value 0x{:x}", self.0),
        }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        Rank::from_index(self.rank_bits())
            .unwrap_or_else(|| panic!("Invalid rank 0x{:x}", self.0))
    }

    /// Returns the rank bits.
    #[inline]
    pub fn rank_bits(&self) -> u8 {
        ((self.0 >> 8) & 0xf) as u8
    }

    /// Returns the suit bits.
    #[inline]
    pub fn suit_bits(&self) -> u8 {
        ((self.0 >> 12) & 0xf) as u8
    }

    /// Returns a 13 bits mask with the bit for this card rank set.
    #[inline]
    pub fn rank_mask(&self) -> u16 {
        (self.0 >> 16) as u16
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank(), self.suit())
    }
}

impl FromStr for Card {
    type Err = Error;

    /// Parses a card like `AS`, `Td`, `10h`, or `2c`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidCard(s.to_string());

        let mut chars = s.chars();
        let suit = chars.next_back().ok_or_else(invalid)?;
        let rank = match chars.as_str().to_ascii_uppercase().as_str() {
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            r if r.len() == 1 => r
                .parse::<u8>()
                .ok()
                .and_then(|v| Rank::try_from(v).ok())
                .ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };

        Ok(Card::new(rank, Suit::try_from(suit)?))
    }
}

impl TryFrom<String> for Card {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parses a list of cards separated by whitespace or commas.
pub fn parse_cards(s: &str) -> Result<Vec<Card>> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// The number of ranks.
    pub const COUNT: usize = 13;

    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The rank value, from 2 for a deuce to 14 for an ace.
    pub fn value(&self) -> u8 {
        *self as u8 + 2
    }

    /// Returns the rank with the given index, deuce=0 to ace=12.
    pub fn from_index(index: u8) -> Option<Rank> {
        Rank::ranks().nth(index as usize)
    }
}

impl TryFrom<u8> for Rank {
    type Error = Error;

    /// Converts a rank value in 2..=14 (11=J, 12=Q, 13=K, 14=A).
    fn try_from(value: u8) -> Result<Self> {
        value
            .checked_sub(2)
            .and_then(Rank::from_index)
            .ok_or_else(|| Error::InvalidCard(format!("rank {value}")))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 8,
    /// Diamonds suit.
    Diamonds = 4,
    /// Hearts suit.
    Hearts = 2,
    /// Spades suit.
    Spades = 1,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }

    /// The suit position in the canonical deck order.
    fn index(&self) -> usize {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'C' => Ok(Suit::Clubs),
            'D' => Ok(Suit::Diamonds),
            'H' => Ok(Suit::Hearts),
            'S' => Ok(Suit::Spades),
            _ => Err(Error::InvalidCard(format!("suit {c}"))),
        }
    }
}

/// A cards Deck.
///
/// The deck holds the cards that have not been dealt yet, cards can be dealt
/// one at a time, drawn at random, or sampled and enumerated without
/// consuming the deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Creates a deck in canonical order without the dealt cards.
    pub fn without(dealt: &DealtSet) -> Self {
        let mut deck = Self::default();
        deck.exclude(dealt);
        deck
    }

    /// Deals a card from the deck.
    pub fn deal(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(Error::DeckExhausted {
            requested: 1,
            remaining: 0,
        })
    }

    /// Draws `n` cards uniformly at random and removes them from the deck.
    ///
    /// The order of the remaining cards is not preserved.
    pub fn draw<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<Vec<Card>> {
        self.check_remaining(n)?;

        let drawn = (0..n)
            .map(|_| {
                let idx = rng.random_range(0..self.cards.len());
                self.cards.swap_remove(idx)
            })
            .collect();

        Ok(drawn)
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// The cards left in the deck.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }

    /// Removes all the dealt cards from the deck.
    pub fn exclude(&mut self, dealt: &DealtSet) {
        self.cards.retain(|c| !dealt.contains(*c));
    }

    /// The number of k-cards hands in this deck.
    ///
    /// Panics if k > 7.
    pub fn combinations(&self, k: usize) -> usize {
        ksubset::nck(self.cards.len(), k)
    }

    /// Calls the `f` closure for each k-cards hand.
    ///
    /// With k = 0 the closure is called once with an empty slice, if k is
    /// greater than the number of cards the closure is never called.
    ///
    /// Panics if k > 7.
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!(k <= 7, "k={k} must be 0 <= k <= 7");

        let n = self.cards.len();
        if k > n {
            return;
        }

        if k == 0 {
            f(&[]);
            return;
        }

        let mut hand = Vec::with_capacity(k);
        ksubset::for_each_ksubset(n, k, 0, ksubset::nck(n, k), |positions| {
            hand.clear();
            hand.extend(positions.iter().map(|&pos| self.cards[pos]));
            f(&hand);
        });
    }

    /// Calls the `f` closure with `samples` independent k-cards hands drawn
    /// uniformly without replacement from this deck.
    ///
    /// Each sample is a new draw from all the cards in the deck, the deck is
    /// not modified. Returns [Error::DeckExhausted] if k is greater than the
    /// number of cards in the deck.
    pub fn sample<R, F>(&self, rng: &mut R, samples: usize, k: usize, mut f: F) -> Result<()>
    where
        R: Rng + ?Sized,
        F: FnMut(&[Card]),
    {
        self.check_remaining(k)?;

        // Partial Fisher-Yates, each sample moves k random cards to the front.
        let mut cards = self.cards.clone();
        let n = cards.len();
        for _ in 0..samples {
            for i in 0..k {
                let j = rng.random_range(i..n);
                cards.swap(i, j);
            }

            f(&cards[..k]);
        }

        Ok(())
    }

    fn check_remaining(&self, requested: usize) -> Result<()> {
        if requested > self.cards.len() {
            Err(Error::DeckExhausted {
                requested,
                remaining: self.cards.len(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
