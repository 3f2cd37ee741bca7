// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Combinations of k cards positions out of n.

/// Pascal's triangle for n <= 52 and k <= 7.
const fn make_binomials() -> [[u32; 8]; 53] {
    let mut t = [[0u32; 8]; 53];
    t[0][0] = 1;

    let mut n = 1;
    while n <= 52 {
        t[n][0] = 1;

        let mut k = 1;
        while k <= 7 {
            t[n][k] = t[n - 1][k - 1] + t[n - 1][k];
            k += 1;
        }

        n += 1;
    }

    t
}

const BINOMIALS: [[u32; 8]; 53] = make_binomials();

/// Returns the binomial coefficient for n choose k.
#[inline]
pub(crate) fn nck(n: usize, k: usize) -> usize {
    assert!(n <= 52, "n={n} must be 0 <= n <= 52");
    assert!(k <= 7, "k={k} must be 0 <= k <= 7");

    BINOMIALS[n][k] as usize
}

/// Uses the combinatorial number system to convert n to a
/// k-combination (see Theorem L pg. 260 Knuth 4a).
pub(crate) fn nth_ksubset(mut n: usize, k: usize) -> [usize; 7] {
    assert!(k <= 7);

    let mut out = [0; 7];
    for i in (0..k).rev() {
        let mut c = i;
        while nck(c, i + 1) <= n {
            c += 1;
        }

        c -= 1;
        out[i] = c;
        n -= nck(c, i + 1);
    }

    out
}

/// Calls `f` with `count` k-subsets of 0..n in colexicographic order starting
/// from the nth k-subset.
///
/// Stops early if the last k-subset is reached before `count` subsets.
pub(crate) fn for_each_ksubset<F>(n: usize, k: usize, nth: usize, count: usize, mut f: F)
where
    F: FnMut(&[usize]),
{
    assert!(0 < k && k <= n);

    if count == 0 || nth >= nck(n, k) {
        return;
    }

    // Algorithm L from TAOCP 4a, c[1..=k] holds the current subset and
    // c[k + 1] is the sentinel n.
    let mut c = [0usize; 10];
    c[1..=k].copy_from_slice(&nth_ksubset(nth, k)[..k]);
    c[k + 1] = n;

    for _ in 0..count {
        f(&c[1..=k]);

        let mut j = 1;
        while c[j] + 1 == c[j + 1] {
            c[j] = j - 1;
            j += 1;
        }

        if j > k {
            break;
        }

        c[j] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nck() {
        assert_eq!(nck(2, 3), 0);
        assert_eq!(nck(0, 0), 1);

        [1, 52, 1326, 22100, 270725, 2598960, 20358520, 133784560]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(nck(52, k), v));

        [1, 47, 1081, 16215, 178365, 1533939, 10737573, 62891499]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(nck(47, k), v));

        [1, 5, 10, 10, 5, 1, 0, 0]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(nck(5, k), v));
    }

    #[test]
    fn ksubsets_in_order() {
        let mut subsets = Vec::new();
        for_each_ksubset(5, 3, 0, nck(5, 3), |s| subsets.push(s.to_vec()));

        assert_eq!(subsets.len(), 10);
        for (nth, s) in subsets.iter().enumerate() {
            assert_eq!(&nth_ksubset(nth, 3)[..3], s.as_slice());
            assert!(s.windows(2).all(|w| w[0] < w[1]));
        }

        // Start from the middle.
        let mut tail = Vec::new();
        for_each_ksubset(5, 3, 6, 100, |s| tail.push(s.to_vec()));
        assert_eq!(tail, subsets[6..]);
    }

    #[test]
    fn ksubsets_single() {
        let mut out = Vec::new();
        for_each_ksubset(4, 1, 0, 4, |s| out.push(s[0]));
        assert_eq!(out, vec![0, 1, 2, 3]);

        out.clear();
        for_each_ksubset(4, 4, 0, 10, |s| out.extend_from_slice(s));
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    // Goes through all 5-subsets of 47 positions, slow in debug mode.
    #[test]
    #[ignore]
    fn ksubsets_match_nth() {
        let mut counter = 0;
        let count = nck(47, 5);
        for_each_ksubset(47, 5, 0, count, |s| {
            let ks = nth_ksubset(counter, 5);
            s.iter().zip(ks).for_each(|(&l, r)| assert_eq!(l, r));
            counter += 1;
        });

        assert_eq!(count, counter);
    }
}
