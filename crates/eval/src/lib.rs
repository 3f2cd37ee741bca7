// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker hand evaluator and equity calculator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands, use [HandValue] to
//! evaluate a hand and get its rank:
//!
//! ```
//! # use showdown_eval::*;
//! // 2C, 3C, .., JC
//! let cards = Deck::default().into_iter().take(10).collect::<Vec<_>>();
//! let v1 = HandValue::eval(&cards[0..5]).unwrap();
//! let v2 = HandValue::eval(&cards[5..]).unwrap();
//! assert!(v2 > v1);
//! assert_eq!(v2.rank(), HandRank::StraightFlush);
//! ```
//!
//! The [EquityCalculator] computes each player chance of winning at
//! showdown given the players hole cards and the cards on the board:
//!
//! ```
//! # use showdown_eval::*;
//! # use std::collections::BTreeMap;
//! let mut hands = BTreeMap::new();
//! hands.insert(PlayerId(0), "AS AH".parse::<Hand>().unwrap());
//! hands.insert(PlayerId(1), "KS KH".parse::<Hand>().unwrap());
//!
//! let config = EquityConfig {
//!     method: Method::Enumerate,
//!     ..Default::default()
//! };
//!
//! let board = "2C 7D 9S KD".parse::<Board>().unwrap();
//! let result = EquityCalculator::new(config).unwrap().estimate(&hands, &board).unwrap();
//! assert!(result.equity(PlayerId(1)).unwrap() > 95.0);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod equity;
pub use equity::{
    EquityCalculator, EquityConfig, EquityResult, Method, Mode, PlayerEquity, PlayerId, estimate,
};

pub mod eval;
pub use eval::{HandRank, HandValue};

mod error;
pub use error::{Error, Result};

// Reexport cards types.
pub use showdown_cards::{Board, Card, DealtSet, Deck, Hand, Rank, Suit, parse_cards};
