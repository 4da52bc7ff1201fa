//! Bernoulli sampling of surviving cluster centers

use rand::Rng;

/// Decide whether a cluster center survives the current round
///
/// True with probability n^(-1/k): one uniform [0,1) draw compared against
/// that threshold. The random source is owned by the caller and threaded
/// through the whole construction, never a process-wide stream.
pub fn survives_round<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> bool {
    let threshold = (n as f64).powf(-1.0 / k as f64);
    rng.gen::<f64>() <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_vertex_always_survives() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(survives_round(&mut rng, 1, 2));
        }
    }

    #[test]
    fn survival_rate_tracks_the_threshold() {
        // n = 16, k = 2 gives a survival probability of exactly 0.25
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 10_000;
        let survived = (0..trials)
            .filter(|_| survives_round(&mut rng, 16, 2))
            .count();
        assert!(
            (2_200..=2_800).contains(&survived),
            "survived {} of {}",
            survived,
            trials
        );
    }

    #[test]
    fn draws_are_deterministic_under_a_fixed_seed() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..1_000 {
            assert_eq!(
                survives_round(&mut a, 50, 3),
                survives_round(&mut b, 50, 3)
            );
        }
    }
}
