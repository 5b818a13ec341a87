#[cfg(test)]
mod units {
    use crate::result::{Estimator, ResultStore};

    #[test]
    fn initial_flux_is_crossings_over_time() {
        let mut store = ResultStore::new(3);
        store.add_flux_crossing();
        store.add_flux_crossing();
        store.accumulate_flux_time(4.0);
        assert_eq!(store.initial_flux(), 0.5);
    }

    #[test]
    fn initial_flux_is_zero_with_no_time() {
        let store = ResultStore::new(3);
        assert_eq!(store.initial_flux(), 0.0);
    }

    #[test]
    fn crossing_probability_is_one_with_perfect_survival() {
        let mut store = ResultStore::new(3);
        // interface 1: 100 trials fired; interface 2 gets weight 100 from
        // 100 successes (perfect survival), and records those successes.
        store.add_trial(1, 100);
        store.accumulate_weight(2, 100.0);
        for _ in 0..100 {
            store.add_success(2);
        }
        store.add_trial(2, 100);
        store.accumulate_weight(3, 100.0);
        for _ in 0..100 {
            store.add_success(3);
        }
        assert_eq!(store.crossing_probability(Estimator::Direct), 1.0);
    }

    #[test]
    fn crossing_probability_is_zero_if_an_interior_interface_never_succeeds() {
        let mut store = ResultStore::new(3);
        store.add_trial(1, 100);
        store.accumulate_weight(2, 0.0);
        store.add_trial(2, 100);
        store.accumulate_weight(3, 0.0);
        assert_eq!(store.crossing_probability(Estimator::Direct), 0.0);
    }

    #[test]
    fn crossing_probability_clamps_weight_to_ntrial() {
        let mut store = ResultStore::new(2);
        store.add_trial(1, 10);
        // pruning amplification pushed accumulated weight above ntrial.
        store.accumulate_weight(2, 25.0);
        for _ in 0..5 {
            store.add_success(2);
        }
        assert_eq!(store.crossing_probability(Estimator::Direct), 1.0);
    }

    #[test]
    fn rate_multiplies_flux_and_crossing_probability() {
        let mut store = ResultStore::new(2);
        store.add_flux_crossing();
        store.accumulate_flux_time(1.0);
        store.add_trial(1, 10);
        store.accumulate_weight(2, 5.0);
        let expected = store.initial_flux() * store.crossing_probability(Estimator::Direct);
        assert_eq!(store.rate(Estimator::Direct), expected);
    }

    #[test]
    fn branched_crossing_probability_divides_terminal_weight_by_starting_points() {
        let mut store = ResultStore::new(3);
        store.set_nkeep(1, 10);
        // every branch that reaches the last interface keeps
        // accumulating into its weight, regardless of how many
        // descendants it took to get there.
        store.accumulate_weight(3, 4.0);
        assert_eq!(store.crossing_probability(Estimator::Branched), 0.4);
    }

    #[test]
    fn branched_crossing_probability_is_zero_with_no_starting_points() {
        let store = ResultStore::new(2);
        assert_eq!(store.crossing_probability(Estimator::Branched), 0.0);
    }

    #[test]
    fn rosenbluth_crossing_probability_multiplies_success_over_incoming_weight() {
        let mut store = ResultStore::new(3);
        store.accumulate_weight(1, 1.0);
        store.accumulate_success_weight(1, 0.5);
        store.accumulate_weight(2, 0.5);
        store.accumulate_success_weight(2, 0.25);
        assert_eq!(store.crossing_probability(Estimator::Rosenbluth), 0.25);
    }

    #[test]
    fn rosenbluth_crossing_probability_is_zero_if_an_interface_gets_no_weight() {
        let mut store = ResultStore::new(3);
        store.accumulate_weight(1, 1.0);
        store.accumulate_success_weight(1, 0.5);
        assert_eq!(store.crossing_probability(Estimator::Rosenbluth), 0.0);
    }

    #[test]
    fn merge_sums_counters_and_flux() {
        let mut a = ResultStore::new(2);
        a.add_trial(1, 5);
        a.add_flux_crossing();
        a.accumulate_flux_time(2.0);

        let mut b = ResultStore::new(2);
        b.add_trial(1, 7);
        b.add_flux_crossing();
        b.accumulate_flux_time(3.0);

        a.merge(&b);
        assert_eq!(a.get(1).ntrial, 12);
        let totals = a.flux_totals();
        assert_eq!(totals.ncross, 2);
        assert_eq!(totals.time, 5.0);
    }

    #[test]
    fn back_counter_is_separate_from_prune_and_sums_on_merge() {
        let mut a = ResultStore::new(1);
        a.add_back(1);
        a.add_prune(1);

        let mut b = ResultStore::new(1);
        b.add_back(1);

        a.merge(&b);
        let counters = a.get(1);
        assert_eq!(counters.back, 2);
        assert_eq!(counters.nprune, 1);
    }

    #[test]
    fn nkeep_and_prune_and_timeout_counters_are_tracked() {
        let mut store = ResultStore::new(1);
        store.set_nkeep(1, 42);
        store.add_prune(1);
        store.add_prune(1);
        store.add_timeout(1, 3);
        let counters = store.get(1);
        assert_eq!(counters.nkeep, 42);
        assert_eq!(counters.nprune, 2);
        assert_eq!(counters.nto, 3);
    }
}
