// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example eval_all7 -- --tasks 8
// ...
// Total hands      133784560
//
// High Card:       23294460
// One Pair:        58627800
// Two Pair:        31433400
// Three of a Kind: 6461620
// Straight:        6180020
// Flush:           4047644
// Full House:      3473184
// Four of a Kind:  224848
// Straight Flush:  41584
// ```
use clap::Parser;
use std::time::Instant;

use showdown_eval::*;

#[derive(Debug, Parser)]
struct Cli {
    /// Number of parallel tasks.
    #[clap(long, short, default_value_t = 4)]
    tasks: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Evaluate all 133M hands.
    let now = Instant::now();

    let task_counts = Deck::default().par_for_each(
        cli.tasks.max(1),
        7,
        || Ok::<_, Error>([0usize; 9]),
        |acc, hand| {
            let Ok(counts) = acc else {
                return;
            };

            match HandValue::eval(hand) {
                Ok(value) => counts[value.rank() as usize] += 1,
                Err(e) => *acc = Err(e),
            }
        },
    );

    let mut counts = [0usize; 9];
    for task in task_counts {
        counts.iter_mut().zip(task?).for_each(|(c, t)| *c += t);
    }

    let elapsed = now.elapsed().as_secs_f64();
    let total = counts.iter().sum::<usize>();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);

    for rank in HandRank::ranks() {
        let label = format!("{rank}:");
        println!("{label:<17}{}", counts[rank as usize]);
    }

    Ok(())
}
