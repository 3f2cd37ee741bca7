// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cards errors.
use thiserror::Error;

use crate::Card;

/// Errors returned by the cards types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A rank or suit outside the 52 cards domain.
    #[error("invalid card: {0}")]
    InvalidCard(String),
    /// The same card appears more than once.
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
    /// More cards were requested than the deck holds.
    #[error("deck exhausted: requested {requested} cards with {remaining} remaining")]
    DeckExhausted {
        /// Number of cards requested.
        requested: usize,
        /// Number of cards left in the deck.
        remaining: usize,
    },
    /// A card was added to a complete board.
    #[error("board already has 5 cards")]
    BoardFull,
}

/// Cards result type.
pub type Result<T> = std::result::Result<T, Error>;
