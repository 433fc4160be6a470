use climdex_runs::{longest_run, run_lengths};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Splits `seq` into explicit runs of `true` and returns their lengths.
fn naive_runs(seq: &[bool]) -> Vec<usize> {
    seq.split(|&flag| !flag)
        .map(<[bool]>::len)
        .filter(|&len| len > 0)
        .collect()
}

fn random_sequence(rng: &mut StdRng, len: usize, p_true: f64) -> Vec<bool> {
    (0..len).map(|_| rng.random_bool(p_true)).collect()
}

#[test]
fn longest_run_matches_naive() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let len = rng.random_range(0..400);
        let seq = random_sequence(&mut rng, len, 0.7);
        let expected = naive_runs(&seq).into_iter().max().unwrap_or(0);
        assert_eq!(longest_run(&seq), expected);
    }
}

#[test]
fn run_lengths_matches_naive() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..200 {
        let len = rng.random_range(0..400);
        let min_length = rng.random_range(1..8);
        let seq = random_sequence(&mut rng, len, 0.75);
        let expected: usize = naive_runs(&seq)
            .into_iter()
            .filter(|&len| len >= min_length)
            .sum();
        assert_eq!(run_lengths(&seq, min_length), expected);
    }
}

#[test]
fn run_lengths_never_exceeds_true_count() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let seq = random_sequence(&mut rng, 365, 0.5);
        let trues = seq.iter().filter(|&&f| f).count();
        assert!(run_lengths(&seq, 5) <= trues);
        assert!(longest_run(&seq) <= trues);
    }
}
