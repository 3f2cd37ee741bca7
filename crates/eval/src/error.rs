// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Evaluator errors.
use thiserror::Error;

/// Errors returned by the evaluator and the equity calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid or duplicate cards, or an exhausted deck.
    #[error(transparent)]
    Cards(#[from] showdown_cards::Error),
    /// The evaluator was given less than 5 or more than 7 cards.
    #[error("cannot evaluate {0} cards, expected 5 to 7")]
    InvalidHandSize(usize),
    /// No active players to compute equity for.
    #[error("no active players")]
    EmptyActiveSet,
    /// Invalid equity configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Evaluator result type.
pub type Result<T> = std::result::Result<T, Error>;
