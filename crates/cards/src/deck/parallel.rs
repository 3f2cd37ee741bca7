// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Parallel hand iteration.
use rand::prelude::*;
use std::{panic, thread};

use super::{Card, Deck, ksubset};
use crate::Result;

impl Deck {
    /// Parallel for each, folds each k-cards hand into a per task accumulator.
    ///
    /// The hands are split in `num_tasks` contiguous ranges, each task creates
    /// its accumulator with `init` and calls `f` for each hand in its range.
    /// Returns the accumulators in task order.
    ///
    /// Panics if k > 7 or `num_tasks` is zero.
    pub fn par_for_each<T, I, F>(&self, num_tasks: usize, k: usize, init: I, f: F) -> Vec<T>
    where
        T: Send,
        I: Fn() -> T + Sync,
        F: Fn(&mut T, &[Card]) + Sync,
    {
        assert!(k <= 7, "k={k} must be 0 <= k <= 7");
        assert!(num_tasks > 0);

        let n = self.cards.len();
        if k == 0 || k > n {
            // Nothing to split, at most one empty hand.
            let mut acc = init();
            self.for_each(k, |hand| f(&mut acc, hand));
            return vec![acc];
        }

        let num_hands = ksubset::nck(n, k);
        let hands_per_task = num_hands.div_ceil(num_tasks);

        self.run_tasks(num_tasks, |task_id| {
            let mut acc = init();
            let start = task_id * hands_per_task;
            let mut hand = Vec::with_capacity(k);
            ksubset::for_each_ksubset(n, k, start, hands_per_task, |positions| {
                hand.clear();
                hand.extend(positions.iter().map(|&pos| self.cards[pos]));
                f(&mut acc, &hand);
            });

            acc
        })
    }

    /// Parallel sampling, folds `samples` k-cards hands into per task
    /// accumulators.
    ///
    /// The samples are split evenly between `num_tasks` tasks, each task draws
    /// its samples with its own random generator. If `seed` is given the task
    /// generators are seeded from it and the task index so that runs are
    /// reproducible, otherwise they are seeded from the OS.
    ///
    /// Returns [crate::Error::DeckExhausted] if k is greater than the number
    /// of cards in the deck.
    pub fn par_sample<T, I, F>(
        &self,
        num_tasks: usize,
        seed: Option<u64>,
        samples: usize,
        k: usize,
        init: I,
        f: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        I: Fn() -> T + Sync,
        F: Fn(&mut T, &[Card]) + Sync,
    {
        assert!(num_tasks > 0);
        self.check_remaining(k)?;

        let results = self.run_tasks(num_tasks, |task_id| {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(task_seed(seed, task_id)),
                None => SmallRng::from_os_rng(),
            };

            // The first tasks take the remainder.
            let task_samples = samples / num_tasks + usize::from(task_id < samples % num_tasks);

            let mut acc = init();
            self.sample(&mut rng, task_samples, k, |hand| f(&mut acc, hand))
                .map(|_| acc)
        });

        results.into_iter().collect()
    }

    /// Runs `task` on `num_tasks` scoped threads and returns the results in
    /// task order, a panic in a task is propagated to the caller.
    fn run_tasks<T, F>(&self, num_tasks: usize, task: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if num_tasks == 1 {
            return vec![task(0)];
        }

        thread::scope(|s| {
            let handles = (0..num_tasks)
                .map(|task_id| {
                    let task = &task;
                    s.spawn(move || task(task_id))
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        })
    }
}

/// Mixes the task index into the base seed.
fn task_seed(seed: u64, task_id: usize) -> u64 {
    seed ^ (task_id as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DealtSet;
    use ahash::HashSet;

    #[test]
    fn par_for_each_counts() {
        let deck = Deck::default();

        for num_tasks in [1, 3, 4, 7] {
            let counts = deck.par_for_each(num_tasks, 3, || 0usize, |c, _| *c += 1);
            assert_eq!(counts.len(), num_tasks);
            assert_eq!(counts.iter().sum::<usize>(), 22_100);
        }
    }

    #[test]
    fn par_for_each_visits_each_hand_once() {
        let mut dealt = DealtSet::default();
        dealt
            .extend(crate::parse_cards("AS KS QS JS TS").unwrap())
            .unwrap();
        let deck = Deck::without(&dealt);

        let hands = deck.par_for_each(5, 2, Vec::new, |v, h| v.push(h.to_vec()));
        let all = hands.into_iter().flatten().collect::<Vec<_>>();
        let unique = all.iter().cloned().collect::<HashSet<_>>();

        assert_eq!(all.len(), 1_081);
        assert_eq!(unique.len(), 1_081);
        assert!(all.iter().flatten().all(|c| !dealt.contains(*c)));
    }

    #[test]
    fn par_for_each_more_tasks_than_hands() {
        let mut deck = Deck::default();
        for card in Deck::default().into_iter().skip(4) {
            deck.remove(card);
        }

        // 6 hands split in 4 tasks of 2, the last task has nothing to do.
        let counts = deck.par_for_each(4, 2, || 0usize, |c, _| *c += 1);
        assert_eq!(counts, vec![2, 2, 2, 0]);

        let counts = deck.par_for_each(4, 0, || 0usize, |c, _| *c += 1);
        assert_eq!(counts, vec![1]);
    }

    #[test]
    fn par_sample_counts() {
        let deck = Deck::default();

        let counts = deck
            .par_sample(4, None, 1_001, 7, || 0usize, |c, h| {
                assert_eq!(h.len(), 7);
                *c += 1;
            })
            .unwrap();
        assert_eq!(counts, vec![251, 250, 250, 250]);
    }

    #[test]
    fn par_sample_seeded() {
        let deck = Deck::default();
        let run = |seed| {
            deck.par_sample(3, Some(seed), 30, 2, Vec::new, |v, h| {
                v.extend_from_slice(h)
            })
            .unwrap()
        };

        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));

        let err = deck.par_sample(2, Some(1), 10, 53, || (), |_, _| {});
        assert!(err.is_err());
    }
}
