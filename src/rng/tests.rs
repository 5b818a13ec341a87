#[cfg(test)]
mod units {
    use crate::rng::Lcg;

    #[test]
    fn reproducible_given_same_seed() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        let sa: Vec<f64> = (0..50).map(|_| a.next_f64()).collect();
        let sb: Vec<f64> = (0..50).map(|_| b.next_f64()).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Lcg::new(1);
        let mut b = Lcg::new(2);
        let sa: Vec<f64> = (0..10).map(|_| a.next_f64()).collect();
        let sb: Vec<f64> = (0..10).map(|_| b.next_f64()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn deviates_stay_in_unit_interval() {
        let mut rng = Lcg::new(123456789);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn reseed_resets_stream() {
        let mut rng = Lcg::new(7);
        let first: Vec<f64> = (0..20).map(|_| rng.next_f64()).collect();
        rng.reseed(7);
        let second: Vec<f64> = (0..20).map(|_| rng.next_f64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_seed_is_normalized_into_range() {
        // state must stay in 0 < state < m; a zero seed must not get stuck.
        let mut rng = Lcg::new(0);
        let x = rng.next_f64();
        assert!((0.0..1.0).contains(&x));
    }

    #[test]
    fn seed32_is_in_range() {
        let mut rng = Lcg::new(99);
        for _ in 0..1000 {
            let s = rng.next_seed32();
            assert!(s >= 0);
        }
    }

    #[test]
    fn empirical_mean_converges_towards_one_half() {
        let mut rng = Lcg::new(31);
        let n = 200_000;
        let sum: f64 = (0..n).map(|_| rng.next_f64()).sum();
        let mean = sum / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean was {mean}");
    }
}
