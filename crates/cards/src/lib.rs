// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use showdown_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd: Card = "KD".parse().unwrap();
//! assert_eq!(kd.rank(), Rank::King);
//! ```
//!
//! the [Hand], [Board] and [DealtSet] types that hold the cards visible at a
//! table, and a [Deck] type for drawing, sampling, and iterating the cards that
//! have not been dealt yet.
//!
//! For example to sample 10 random boards from a deck without the cards in a
//! player hand:
//!
//! ```
//! # use showdown_cards::*;
//! # use rand::{SeedableRng, rngs::StdRng};
//! let hand: Hand = "AS KS".parse().unwrap();
//! let mut dealt = DealtSet::default();
//! dealt.extend(hand.cards().iter().copied()).unwrap();
//!
//! let deck = Deck::without(&dealt);
//! assert_eq!(deck.count(), 50);
//!
//! let mut counter = 0;
//! deck.sample(&mut StdRng::seed_from_u64(7), 10, 5, |board| {
//!     assert!(board.iter().all(|c| !dealt.contains(*c)));
//!     counter += 1;
//! })
//! .unwrap();
//! assert_eq!(counter, 10);
//! ```
//!
//! The **`parallel`** feature enables parallel sampling and iteration with
//! a given number of tasks, each task folds its hands into its own
//! accumulator and the accumulators are returned in task order:
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn par_for_each() {
//! # use showdown_cards::Deck;
//! // Count all 5 cards hands using 4 tasks.
//! let counts = Deck::default().par_for_each(4, 5, || 0u64, |count, _| *count += 1);
//! assert_eq!(counts.iter().sum::<u64>(), 2_598_960);
//! # }
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, Rank, Suit, parse_cards};

mod error;
pub use error::{Error, Result};

mod hand;
pub use hand::{Board, DealtSet, Hand};
