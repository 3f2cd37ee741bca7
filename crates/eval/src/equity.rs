// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown equity calculator.
//!
//! Computes for each active player the probability of having the best hand at
//! showdown. With a complete board the result is exact, with a partial board
//! the missing cards are either sampled ([Method::Simulate]) or enumerated
//! ([Method::Enumerate]).
use log::{debug, trace};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use showdown_cards::{Board, Card, DealtSet, Deck, Error as CardsError, Hand};

use crate::{Error, HandValue, Result};

/// A player identifier, usually the player seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for PlayerId {
    fn from(id: usize) -> Self {
        PlayerId(id)
    }
}

/// How to complete a partial board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Sample random boards, the result is an estimate.
    #[default]
    Simulate,
    /// Enumerate all possible boards, the result is exact.
    Enumerate,
}

/// Equity calculator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityConfig {
    /// Number of simulated boards for each call.
    pub trials: usize,
    /// Number of parallel tasks.
    pub tasks: usize,
    /// Random seed for reproducible simulations, seeded from the OS if none.
    pub seed: Option<u64>,
    /// How to complete a partial board.
    pub method: Method,
}

impl EquityConfig {
    /// The default number of trials.
    pub const DEFAULT_TRIALS: usize = 10_000;

    /// Checks the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::InvalidConfig("trials must be greater than zero"));
        }

        if self.tasks == 0 {
            return Err(Error::InvalidConfig("tasks must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            trials: Self::DEFAULT_TRIALS,
            tasks: 1,
            seed: None,
            method: Method::default(),
        }
    }
}

/// How an equity result was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Only one active player, no hand was evaluated.
    Uncontested,
    /// Complete board, a single showdown.
    Exact,
    /// Random board completions.
    Simulated,
    /// All board completions.
    Enumerated,
}

/// A player equity, all values are percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerEquity {
    /// Win plus tie share.
    pub equity: f64,
    /// Showdowns won outright.
    pub win: f64,
    /// Share of the tied showdowns.
    pub tie: f64,
}

/// The equity of each active player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    players: BTreeMap<PlayerId, PlayerEquity>,
    showdowns: u64,
    mode: Mode,
}

impl EquityResult {
    /// The equity of a player in [0, 100].
    pub fn equity(&self, player: PlayerId) -> Option<f64> {
        self.players.get(&player).map(|p| p.equity)
    }

    /// The equity details for a player.
    pub fn get(&self, player: PlayerId) -> Option<&PlayerEquity> {
        self.players.get(&player)
    }

    /// Iterates the players equities in player order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerEquity)> {
        self.players.iter().map(|(id, eq)| (*id, eq))
    }

    /// The number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Checks if there are no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The sum of all equities, 100 up to rounding errors.
    pub fn total(&self) -> f64 {
        self.players.values().map(|p| p.equity).sum()
    }

    /// The number of showdowns evaluated.
    pub fn showdowns(&self) -> u64 {
        self.showdowns
    }

    /// How this result was computed.
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Computes the equity with the default configuration.
pub fn estimate(hands: &BTreeMap<PlayerId, Hand>, board: &Board) -> Result<EquityResult> {
    EquityCalculator::default().estimate(hands, board)
}

/// Equity calculator.
#[derive(Debug, Clone, Default)]
pub struct EquityCalculator {
    config: EquityConfig,
}

impl EquityCalculator {
    /// Creates a calculator with the given configuration.
    pub fn new(config: EquityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The calculator configuration.
    pub fn config(&self) -> &EquityConfig {
        &self.config
    }

    /// Computes the equity of the active players.
    ///
    /// Simulations use the configured seed and number of tasks.
    pub fn estimate(
        &self,
        hands: &BTreeMap<PlayerId, Hand>,
        board: &Board,
    ) -> Result<EquityResult> {
        let showdown = match Showdown::new(hands, board)? {
            Prepared::Uncontested(result) => return Ok(result),
            Prepared::Showdown(showdown) => showdown,
        };

        if board.is_complete() {
            return Ok(showdown.exact());
        }

        match self.config.method {
            Method::Simulate => self.simulate(&showdown),
            Method::Enumerate => Ok(self.enumerate(&showdown)),
        }
    }

    /// Computes the equity of the active players drawing random boards from
    /// the given generator on the calling thread.
    pub fn estimate_with_rng<R: Rng + ?Sized>(
        &self,
        hands: &BTreeMap<PlayerId, Hand>,
        board: &Board,
        rng: &mut R,
    ) -> Result<EquityResult> {
        let showdown = match Showdown::new(hands, board)? {
            Prepared::Uncontested(result) => return Ok(result),
            Prepared::Showdown(showdown) => showdown,
        };

        if board.is_complete() {
            return Ok(showdown.exact());
        }

        match self.config.method {
            Method::Simulate => {
                let mut tally = Tally::new(showdown.num_players());
                showdown.deck.sample(rng, self.config.trials, showdown.missing(), |c| {
                    showdown.play(c, &mut tally)
                })?;
                Ok(showdown.result(tally, Mode::Simulated))
            }
            Method::Enumerate => Ok(self.enumerate(&showdown)),
        }
    }

    #[cfg(feature = "parallel")]
    fn simulate(&self, showdown: &Showdown<'_>) -> Result<EquityResult> {
        let EquityConfig {
            trials,
            tasks,
            seed,
            ..
        } = self.config;

        debug!(
            "Simulating {trials} boards for {} players on {tasks} tasks",
            showdown.num_players()
        );

        let tallies = showdown.deck.par_sample(
            tasks,
            seed,
            trials,
            showdown.missing(),
            || Tally::new(showdown.num_players()),
            |tally, completion| showdown.play(completion, tally),
        )?;

        Ok(showdown.result(Tally::merge(tallies), Mode::Simulated))
    }

    #[cfg(not(feature = "parallel"))]
    fn simulate(&self, showdown: &Showdown<'_>) -> Result<EquityResult> {
        debug!(
            "Simulating {} boards for {} players",
            self.config.trials,
            showdown.num_players()
        );

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut tally = Tally::new(showdown.num_players());
        showdown.deck.sample(&mut rng, self.config.trials, showdown.missing(), |c| {
            showdown.play(c, &mut tally)
        })?;

        Ok(showdown.result(tally, Mode::Simulated))
    }

    #[cfg(feature = "parallel")]
    fn enumerate(&self, showdown: &Showdown<'_>) -> EquityResult {
        debug!(
            "Enumerating {} boards for {} players on {} tasks",
            showdown.deck.combinations(showdown.missing()),
            showdown.num_players(),
            self.config.tasks
        );

        let tallies = showdown.deck.par_for_each(
            self.config.tasks,
            showdown.missing(),
            || Tally::new(showdown.num_players()),
            |tally, completion| showdown.play(completion, tally),
        );

        showdown.result(Tally::merge(tallies), Mode::Enumerated)
    }

    #[cfg(not(feature = "parallel"))]
    fn enumerate(&self, showdown: &Showdown<'_>) -> EquityResult {
        debug!(
            "Enumerating {} boards for {} players",
            showdown.deck.combinations(showdown.missing()),
            showdown.num_players()
        );

        let mut tally = Tally::new(showdown.num_players());
        showdown
            .deck
            .for_each(showdown.missing(), |c| showdown.play(c, &mut tally));

        showdown.result(tally, Mode::Enumerated)
    }
}

/// Validated showdown inputs or the uncontested result.
enum Prepared<'a> {
    Uncontested(EquityResult),
    Showdown(Showdown<'a>),
}

/// The active players cards, the known board, and the cards left in the deck.
struct Showdown<'a> {
    players: Vec<PlayerId>,
    hands: Vec<&'a Hand>,
    board: &'a [Card],
    deck: Deck,
}

impl<'a> Showdown<'a> {
    fn new(hands: &'a BTreeMap<PlayerId, Hand>, board: &'a Board) -> Result<Prepared<'a>> {
        if hands.is_empty() {
            return Err(Error::EmptyActiveSet);
        }

        // Rebuilt on every call, a card seen twice aborts the calculation.
        let mut dealt = DealtSet::default();
        dealt.extend(board.cards().iter().copied())?;
        for hand in hands.values() {
            dealt.extend(hand.cards().iter().copied())?;
        }

        if hands.len() == 1 {
            let players = hands
                .keys()
                .map(|&id| {
                    let equity = PlayerEquity {
                        equity: 100.0,
                        win: 100.0,
                        tie: 0.0,
                    };
                    (id, equity)
                })
                .collect();

            return Ok(Prepared::Uncontested(EquityResult {
                players,
                showdowns: 0,
                mode: Mode::Uncontested,
            }));
        }

        let deck = Deck::without(&dealt);
        let missing = board.missing();
        // With a full board at most 23 players fit in the winners mask.
        if missing > deck.count() {
            return Err(Error::Cards(CardsError::DeckExhausted {
                requested: missing,
                remaining: deck.count(),
            }));
        }

        Ok(Prepared::Showdown(Showdown {
            players: hands.keys().copied().collect(),
            hands: hands.values().collect(),
            board: board.cards(),
            deck,
        }))
    }

    fn num_players(&self) -> usize {
        self.players.len()
    }

    fn missing(&self) -> usize {
        Board::SIZE - self.board.len()
    }

    /// Evaluates the complete board.
    fn exact(&self) -> EquityResult {
        debug!("Evaluating showdown for {} players", self.num_players());

        let mut tally = Tally::new(self.num_players());
        self.play(&[], &mut tally);
        self.result(tally, Mode::Exact)
    }

    /// Plays a showdown with the board completed by `completion` cards.
    fn play(&self, completion: &[Card], tally: &mut Tally) {
        debug_assert_eq!(self.board.len() + completion.len(), Board::SIZE);

        let mut cards = [self.hands[0].cards()[0]; 7];
        cards[2..2 + self.board.len()].copy_from_slice(self.board);
        cards[2 + self.board.len()..].copy_from_slice(completion);

        let mut best = None;
        let mut winners = 0u32;
        for (idx, hand) in self.hands.iter().enumerate() {
            cards[..2].copy_from_slice(hand.cards());
            let value = HandValue::eval_unchecked(&cards);

            match best {
                Some(b) if value < b => {}
                Some(b) if value == b => winners |= 1 << idx,
                _ => {
                    best = Some(value);
                    winners = 1 << idx;
                }
            }
        }

        tally.add(winners);
    }

    fn result(&self, tally: Tally, mode: Mode) -> EquityResult {
        trace!("{} showdowns evaluated", tally.showdowns);

        let showdowns = tally.showdowns.max(1) as f64;
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(idx, &id)| {
                let win = tally.wins[idx] as f64 / showdowns * 100.0;
                let tie = tally.tie_shares[idx] / showdowns * 100.0;
                let equity = PlayerEquity {
                    equity: win + tie,
                    win,
                    tie,
                };
                (id, equity)
            })
            .collect();

        EquityResult {
            players,
            showdowns: tally.showdowns,
            mode,
        }
    }
}

/// Wins and tie shares counters.
#[derive(Debug, Clone)]
struct Tally {
    wins: Vec<u64>,
    tie_shares: Vec<f64>,
    showdowns: u64,
}

impl Tally {
    fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            tie_shares: vec![0.0; num_players],
            showdowns: 0,
        }
    }

    /// Adds a showdown result, `winners` has a bit set for each winner.
    fn add(&mut self, winners: u32) {
        let num_winners = winners.count_ones();
        if num_winners == 1 {
            self.wins[winners.trailing_zeros() as usize] += 1;
        } else {
            let share = 1.0 / num_winners as f64;
            for (idx, tie) in self.tie_shares.iter_mut().enumerate() {
                if winners & (1 << idx) != 0 {
                    *tie += share;
                }
            }
        }

        self.showdowns += 1;
    }

    /// Sums the per task counters.
    #[cfg(feature = "parallel")]
    fn merge(tallies: Vec<Tally>) -> Tally {
        let mut tallies = tallies.into_iter();
        let mut total = tallies.next().unwrap_or_else(|| Tally::new(0));
        for tally in tallies {
            total.wins.iter_mut().zip(&tally.wins).for_each(|(t, w)| *t += w);
            total
                .tie_shares
                .iter_mut()
                .zip(&tally.tie_shares)
                .for_each(|(t, s)| *t += s);
            total.showdowns += tally.showdowns;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use showdown_cards::parse_cards;

    fn player_hands(hands: &[&str]) -> BTreeMap<PlayerId, Hand> {
        hands
            .iter()
            .enumerate()
            .map(|(idx, h)| (PlayerId(idx), h.parse().unwrap()))
            .collect()
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn calculator(method: Method, trials: usize, tasks: usize) -> EquityCalculator {
        EquityCalculator::new(EquityConfig {
            trials,
            tasks,
            seed: Some(101),
            method,
        })
        .unwrap()
    }

    fn assert_total(result: &EquityResult) {
        assert!(
            (result.total() - 100.0).abs() < 0.01,
            "total {}",
            result.total()
        );
    }

    #[test]
    fn exact_split_pot() {
        // Both players play the royal flush on the board.
        let hands = player_hands(&["2C 3D", "4H 5C"]);
        let result = estimate(&hands, &board("AS KS QS JS TS")).unwrap();

        assert_eq!(result.mode(), Mode::Exact);
        assert_eq!(result.showdowns(), 1);
        assert_eq!(result.equity(PlayerId(0)), Some(50.0));
        assert_eq!(result.equity(PlayerId(1)), Some(50.0));
        assert_eq!(result.get(PlayerId(0)).unwrap().tie, 50.0);
        assert_total(&result);

        // Both play the board straight, the third player has a flush.
        let hands = player_hands(&["2C 2D", "3H 3C", "AH KH"]);
        let result = estimate(&hands, &board("5H 6D 7H 8S 9H")).unwrap();
        assert_eq!(result.equity(PlayerId(0)), Some(0.0));
        assert_eq!(result.equity(PlayerId(1)), Some(0.0));
        assert_eq!(result.equity(PlayerId(2)), Some(100.0));
        assert_eq!(result.get(PlayerId(2)).unwrap().win, 100.0);
    }

    #[test]
    fn exact_three_way_tie() {
        let hands = player_hands(&["2C 3D", "2D 3H", "2H 3C", "KH QD"]);
        let result = estimate(&hands, &board("AS AD AH AC 9D")).unwrap();

        // Three players play quad aces with a nine kicker, the fourth has a king.
        assert_eq!(result.equity(PlayerId(3)), Some(100.0));

        let hands = player_hands(&["2C 3D", "2D 3H", "2H 3C"]);
        let result = estimate(&hands, &board("AS AD AH AC 9D")).unwrap();
        for (_, eq) in result.iter() {
            assert!((eq.equity - 100.0 / 3.0).abs() < 1e-9);
        }
        assert_total(&result);
    }

    #[test]
    fn uncontested() {
        let hands = player_hands(&["7C 2D"]);
        let calc = EquityCalculator::default();

        for b in ["", "AS KS QS", "AS KS QS JS TS"] {
            let result = calc.estimate(&hands, &board(b)).unwrap();
            assert_eq!(result.mode(), Mode::Uncontested);
            assert_eq!(result.showdowns(), 0);
            assert_eq!(result.len(), 1);
            assert_eq!(result.equity(PlayerId(0)), Some(100.0));
        }
    }

    #[test]
    fn invalid_inputs() {
        let calc = EquityCalculator::default();

        let empty = BTreeMap::new();
        assert_eq!(
            calc.estimate(&empty, &Board::default()),
            Err(Error::EmptyActiveSet)
        );

        // Hole card on the board.
        let kd = "KD".parse().unwrap();
        let result = calc.estimate(&player_hands(&["AS KD", "QH QC"]), &board("2C 7D KD"));
        assert_eq!(result, Err(Error::Cards(CardsError::DuplicateCard(kd))));

        // Two players with the same card, also with a single player.
        let result = calc.estimate(&player_hands(&["AS KD", "KD QC"]), &Board::default());
        assert_eq!(result, Err(Error::Cards(CardsError::DuplicateCard(kd))));

        let result = calc.estimate(&player_hands(&["AS KD"]), &board("KD 2C 3C"));
        assert_eq!(result, Err(Error::Cards(CardsError::DuplicateCard(kd))));

        let mut rng = StdRng::seed_from_u64(1);
        let result = calc.estimate_with_rng(&player_hands(&["AS KD", "QH QC"]), &board("KD"), &mut rng);
        assert!(result.is_err());

        let config = EquityConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(matches!(
            EquityCalculator::new(config),
            Err(Error::InvalidConfig(_))
        ));

        let config = EquityConfig {
            tasks: 0,
            ..Default::default()
        };
        assert!(matches!(
            EquityCalculator::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn enumerate_river_outs() {
        // Kings have a set, aces need one of the two aces left out of 44 cards.
        let hands = player_hands(&["AS AH", "KS KH"]);
        let result = calculator(Method::Enumerate, 1, 1)
            .estimate(&hands, &board("2C 7D 9S KD"))
            .unwrap();

        assert_eq!(result.mode(), Mode::Enumerated);
        assert_eq!(result.showdowns(), 44);
        assert!((result.equity(PlayerId(0)).unwrap() - 200.0 / 44.0).abs() < 1e-9);
        assert!((result.equity(PlayerId(1)).unwrap() - 4200.0 / 44.0).abs() < 1e-9);
        assert_total(&result);
    }

    #[test]
    fn enumerate_parallel_matches_sequential() {
        let hands = player_hands(&["AS KS", "QH QD", "7C 8C"]);
        let board = board("2S 9S QC");

        let sequential = calculator(Method::Enumerate, 1, 1)
            .estimate(&hands, &board)
            .unwrap();
        let parallel = calculator(Method::Enumerate, 1, 4)
            .estimate(&hands, &board)
            .unwrap();

        assert_eq!(sequential.showdowns(), 903);
        assert_eq!(parallel.showdowns(), 903);
        for ((_, s), (_, p)) in sequential.iter().zip(parallel.iter()) {
            assert!((s.equity - p.equity).abs() < 1e-9);
            assert!((s.win - p.win).abs() < 1e-9);
        }

        assert_total(&sequential);
    }

    #[test]
    fn simulation_converges_to_enumeration() {
        let hands = player_hands(&["AH KH", "JC JD"]);
        let board = board("2H 7H TD");

        let exact = calculator(Method::Enumerate, 1, 1)
            .estimate(&hands, &board)
            .unwrap();
        assert_eq!(exact.showdowns(), 990);

        let mid = calculator(Method::Simulate, 50_000, 4)
            .estimate(&hands, &board)
            .unwrap();
        let high = calculator(Method::Simulate, 100_000, 4)
            .estimate(&hands, &board)
            .unwrap();

        assert_eq!(high.mode(), Mode::Simulated);
        assert_eq!(high.showdowns(), 100_000);
        assert_total(&mid);
        assert_total(&high);

        for player in [PlayerId(0), PlayerId(1)] {
            let e = exact.equity(player).unwrap();
            let m = mid.equity(player).unwrap();
            let h = high.equity(player).unwrap();
            assert!((m - h).abs() < 1.0, "{player}: {m} {h}");
            assert!((h - e).abs() < 1.0, "{player}: {h} {e}");
        }
    }

    #[test]
    fn simulation_with_rng() {
        let hands = player_hands(&["AS AD", "KC KD"]);
        let calc = calculator(Method::Simulate, 20_000, 1);

        let run = |seed| {
            calc.estimate_with_rng(&hands, &Board::default(), &mut StdRng::seed_from_u64(seed))
                .unwrap()
        };

        let r1 = run(5);
        assert_eq!(r1, run(5));
        assert_eq!(r1.showdowns(), 20_000);
        assert_total(&r1);

        // Aces are about 82% against kings.
        let aces = r1.equity(PlayerId(0)).unwrap();
        assert!((79.0..85.0).contains(&aces), "{aces}");
    }

    #[test]
    fn seeded_simulation_is_reproducible() {
        let hands = player_hands(&["AS AD", "KC KD", "7H 6H"]);
        let board = board("2H 9H JC");
        let calc = calculator(Method::Simulate, 5_000, 3);

        let r1 = calc.estimate(&hands, &board).unwrap();
        let r2 = calc.estimate(&hands, &board).unwrap();
        assert_eq!(r1, r2);
        assert_total(&r1);
    }

    #[test]
    fn turn_board_simulation() {
        let hands = player_hands(&["AS AH", "KS KH"]);
        let result = calculator(Method::Simulate, 10_000, 2)
            .estimate(&hands, &board("2C 7D 9S KD"))
            .unwrap();

        let aces = result.equity(PlayerId(0)).unwrap();
        assert!((2.0..7.5).contains(&aces), "{aces}");
        assert_total(&result);
    }

    #[test]
    fn sparse_player_ids() {
        let mut hands = BTreeMap::new();
        hands.insert(PlayerId(3), "AS AH".parse().unwrap());
        hands.insert(PlayerId(7), "KS KH".parse().unwrap());

        let result = estimate(&hands, &board("2C 7D 9S KD AD")).unwrap();
        assert_eq!(result.equity(PlayerId(3)), Some(100.0));
        assert_eq!(result.equity(PlayerId(7)), Some(0.0));
        assert_eq!(result.equity(PlayerId(0)), None);
        assert_eq!(
            result.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![PlayerId(3), PlayerId(7)]
        );
    }

    #[test]
    fn too_many_players() {
        let deck = parse_cards(
            "2C 3C 4C 5C 6C 7C 8C 9C TC JC QC KC AC \
             2D 3D 4D 5D 6D 7D 8D 9D TD JD QD KD AD \
             2H 3H 4H 5H 6H 7H 8H 9H TH JH QH KH AH \
             2S 3S 4S 5S 6S 7S 8S 9S TS JS QS KS AS",
        )
        .unwrap();

        let hands = deck
            .chunks(2)
            .enumerate()
            .map(|(idx, c)| (PlayerId(idx), Hand::new(c[0], c[1]).unwrap()))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(hands.len(), 26);

        let result = estimate(&hands, &Board::default());
        assert!(matches!(
            result,
            Err(Error::Cards(CardsError::DeckExhausted { .. }))
        ));
    }
}
