//! Run-length scanning over daily boolean sequences.
//!
//! A *run* is a maximal stretch of consecutive `true` values. Both scanners
//! make a single pass and allocate nothing, so they can be called once per
//! cell-year inside the index loops.
//!
//! ```rust
//! use climdex_runs::{longest_run, run_lengths};
//!
//! let wet = [true, true, false, true, true, true];
//! assert_eq!(longest_run(&wet), 3);
//! assert_eq!(run_lengths(&wet, 3), 3);
//! ```

/// Length of the longest run of `true`. Returns 0 for an empty or
/// all-`false` sequence.
pub fn longest_run(seq: &[bool]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &flag in seq {
        if flag {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Total number of days belonging to runs of length `>= min_length`.
///
/// Runs shorter than `min_length` contribute nothing; qualifying runs
/// contribute their full length. A run still open at the end of `seq` is
/// closed there, so callers scanning one year at a time truncate runs at
/// the year boundary.
pub fn run_lengths(seq: &[bool], min_length: usize) -> usize {
    let mut total = 0;
    let mut current = 0;
    for &flag in seq {
        if flag {
            current += 1;
        } else {
            if current >= min_length {
                total += current;
            }
            current = 0;
        }
    }
    if current >= min_length {
        total += current;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(lengths: &[usize]) -> Vec<bool> {
        let mut seq = Vec::new();
        for (i, &len) in lengths.iter().enumerate() {
            if i > 0 {
                seq.push(false);
            }
            seq.extend(std::iter::repeat_n(true, len));
        }
        seq
    }

    #[test]
    fn longest_run_basic() {
        assert_eq!(longest_run(&[true, true, false, true, true, true]), 3);
    }

    #[test]
    fn longest_run_empty_and_all_false() {
        assert_eq!(longest_run(&[]), 0);
        assert_eq!(longest_run(&[false; 10]), 0);
    }

    #[test]
    fn longest_run_all_true() {
        assert_eq!(longest_run(&[true; 365]), 365);
    }

    #[test]
    fn run_lengths_skips_short_runs() {
        assert_eq!(run_lengths(&runs(&[7, 3, 6]), 5), 13);
    }

    #[test]
    fn run_lengths_run_at_end() {
        let mut seq = vec![false; 3];
        seq.extend([true; 5]);
        assert_eq!(run_lengths(&seq, 5), 5);
        assert_eq!(run_lengths(&seq, 6), 0);
    }

    #[test]
    fn run_lengths_boundary_truncation() {
        // A 7-day spell split 2 + 5 across two yearly slices.
        let year_one = [false, false, true, true];
        let year_two = [true, true, true, true, true, false];
        assert_eq!(run_lengths(&year_one, 5), 0);
        assert_eq!(run_lengths(&year_two, 5), 5);
    }

    #[test]
    fn run_lengths_min_zero_counts_all_true() {
        let seq = [true, false, true, true, false];
        assert_eq!(run_lengths(&seq, 0), 3);
        assert_eq!(run_lengths(&[], 5), 0);
    }
}
