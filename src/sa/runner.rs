//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The randomly drawn starting solution.
    pub initial: S,

    /// Cost of the starting solution.
    pub initial_cost: f64,

    /// The solution the chain holds when the budget runs out.
    pub current: S,

    /// Cost of `current`.
    pub current_cost: f64,

    /// Best solution visited and its cost, when `track_best` is set.
    pub best: Option<(S, f64)>,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature after the last cooling step.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Current cost sampled every `history_interval` iterations, starting
    /// with the initial cost and ending with the final one. Empty when
    /// `history_interval` is 0.
    pub cost_history: Vec<f64>,
}

/// Creates a seeded generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Metropolis acceptance probability for a move of cost change `delta`.
///
/// Non-worsening moves get probability 1. A worsening move at a
/// temperature that has underflowed to zero gets probability 0.
#[inline]
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temperature > 0.0 {
        (-delta / temperature).exp()
    } else {
        0.0
    }
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with a generator built from `config.seed`, or from fresh
    /// entropy when no seed is set.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs SA drawing every random value from `rng`.
    ///
    /// Draw order: the initial solution, then per iteration the
    /// neighbor, then one uniform draw only when the neighbor is not a
    /// strict improvement. Identical generators give identical runs.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        problem: &P,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let initial = problem.initial_solution(rng);
        let initial_cost = problem.cost(&initial);

        let mut current = initial.clone();
        let mut current_cost = initial_cost;
        let mut best = config
            .track_best
            .then(|| (current.clone(), current_cost));

        let mut temperature = config.initial_temperature;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let history_interval = config.history_interval;
        let mut cost_history = Vec::new();
        if history_interval > 0 {
            cost_history.push(current_cost);
        }

        for iteration in 0..config.iterations {
            let candidate = problem.neighbor(&current, rng);
            let candidate_cost = problem.cost(&candidate);
            let delta = candidate_cost - current_cost;

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                acceptance_probability(delta, temperature) > rng.random_range(0.0..1.0)
            };

            if accept {
                trace!(iteration, delta, temperature, cost = candidate_cost, "accepted move");
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;

                if let Some((best_solution, best_cost)) = best.as_mut() {
                    if current_cost < *best_cost {
                        *best_solution = current.clone();
                        *best_cost = current_cost;
                    }
                }
            }

            // Record history
            if history_interval > 0 && (iteration + 1).is_multiple_of(history_interval) {
                cost_history.push(current_cost);
            }

            // Cool down
            temperature = config.cooling.cool(temperature);
        }

        // Final history entry
        if history_interval > 0 && !config.iterations.is_multiple_of(history_interval) {
            cost_history.push(current_cost);
        }

        Ok(SaResult {
            initial,
            initial_cost,
            current,
            current_cost,
            best,
            iterations: config.iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cost_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sa::{CoolingSchedule, SaConfig};
    use rand::seq::SliceRandom;

    // ---- Quadratic minimization: f(x) = x^2, minimum at 0 ----

    struct QuadraticProblem;

    impl SaProblem for QuadraticProblem {
        type Solution = f64;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(-10.0..10.0)
        }

        fn cost(&self, x: &f64) -> f64 {
            x * x
        }

        fn neighbor<R: Rng>(&self, x: &f64, rng: &mut R) -> f64 {
            x + rng.random_range(-1.0..1.0)
        }
    }

    #[test]
    fn test_sa_quadratic_geometric() {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.995 })
            .with_iterations(5000)
            .with_track_best(true)
            .with_seed(42);

        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        let (_, best_cost) = result.best.unwrap();

        assert!(best_cost < 1.0, "expected near-zero cost, got {best_cost}");
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves > result.improving_moves);
    }

    #[test]
    fn test_sa_quadratic_lundy_mees() {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling(CoolingSchedule::LundyMees { beta: 0.002 })
            .with_iterations(20000)
            .with_track_best(true)
            .with_seed(42);

        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        let (_, best_cost) = result.best.unwrap();

        assert!(best_cost < 1.0, "expected near-zero cost, got {best_cost}");
    }

    #[test]
    fn test_sa_runs_exact_iteration_count() {
        let config = SaConfig::default()
            .with_iterations(123)
            .with_history_interval(1)
            .with_seed(1);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();

        assert_eq!(result.iterations, 123);
        assert_eq!(result.cost_history.len(), 124);
        assert_eq!(result.cost_history[0], result.initial_cost);
        assert_eq!(*result.cost_history.last().unwrap(), result.current_cost);
    }

    #[test]
    fn test_sa_history_is_sampled() {
        let config = SaConfig::default().with_iterations(1000).with_seed(2);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        assert_eq!(result.cost_history.len(), 11);

        let config = config.with_iterations(1050);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        assert_eq!(result.cost_history.len(), 12);
        assert_eq!(*result.cost_history.last().unwrap(), result.current_cost);
    }

    #[test]
    fn test_sa_history_disabled() {
        let config = SaConfig::default()
            .with_iterations(500)
            .with_history_interval(0)
            .with_seed(2);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        assert!(result.cost_history.is_empty());
        assert_eq!(result.iterations, 500);
    }

    #[test]
    fn test_sa_zero_iterations_returns_initial() {
        let config = SaConfig::default().with_iterations(0).with_seed(3);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();

        assert_eq!(result.initial, result.current);
        assert_eq!(result.initial_cost, result.current_cost);
        assert_eq!(result.accepted_moves, 0);
        assert!((result.final_temperature - config.initial_temperature).abs() < 1e-12);
    }

    #[test]
    fn test_sa_final_temperature_follows_schedule() {
        let config = SaConfig::default()
            .with_initial_temperature(1000.0)
            .with_cooling_rate(0.8)
            .with_iterations(10)
            .with_seed(5);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();

        let expected = 1000.0 * 0.8f64.powi(10);
        assert!((result.final_temperature - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sa_same_seed_same_trajectory() {
        let config = SaConfig::default().with_iterations(300).with_seed(99);

        let a = SaRunner::run(&QuadraticProblem, &config).unwrap();
        let b = SaRunner::run(&QuadraticProblem, &config).unwrap();

        assert_eq!(a.initial, b.initial);
        assert_eq!(a.current, b.current);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_sa_injected_rng_matches_seeded_run() {
        let config = SaConfig::default().with_iterations(200).with_seed(11);
        let seeded = SaRunner::run(&QuadraticProblem, &config).unwrap();

        let mut rng = create_rng(11);
        let injected = SaRunner::run_with_rng(&QuadraticProblem, &config, &mut rng).unwrap();

        assert_eq!(seeded.current, injected.current);
        assert_eq!(seeded.cost_history, injected.cost_history);
    }

    #[test]
    fn test_sa_invalid_config_fails_before_search() {
        let config = SaConfig::default().with_cooling_rate(2.0);
        let result = SaRunner::run(&QuadraticProblem, &config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_sa_best_not_tracked_by_default() {
        let config = SaConfig::default().with_seed(8);
        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        assert!(result.best.is_none());
    }

    #[test]
    fn test_sa_best_never_worse_than_visited() {
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_cooling_rate(0.99)
            .with_iterations(2000)
            .with_track_best(true)
            .with_history_interval(1)
            .with_seed(42);

        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();
        let (_, best_cost) = result.best.unwrap();
        let visited_min = result
            .cost_history
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        assert_eq!(best_cost, visited_min);
        assert!(best_cost <= result.current_cost);
        assert!(best_cost <= result.initial_cost);
    }

    #[test]
    fn test_sa_cold_chain_never_worsens() {
        // Temperature so low that any uphill move has probability ~0.
        let config = SaConfig::default()
            .with_initial_temperature(1e-300)
            .with_iterations(500)
            .with_history_interval(1)
            .with_seed(42);

        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "cold chain should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_sa_metropolis_accepts_uphill() {
        // At very high temperature, almost all moves should be accepted
        let config = SaConfig::default()
            .with_initial_temperature(1e8)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.9999 })
            .with_iterations(1000)
            .with_seed(42);

        let result = SaRunner::run(&QuadraticProblem, &config).unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.8,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }

    #[test]
    fn test_acceptance_probability_bounds() {
        assert_eq!(acceptance_probability(-5.0, 10.0), 1.0);
        assert_eq!(acceptance_probability(0.0, 10.0), 1.0);
        assert_eq!(acceptance_probability(0.0, 0.0), 1.0);
        assert_eq!(acceptance_probability(1.0, 0.0), 0.0);
        assert!((acceptance_probability(10.0, 10.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert!(acceptance_probability(1e6, 1.0) < 1e-300);
        assert!(acceptance_probability(5.0, 100.0) > acceptance_probability(5.0, 10.0));
    }

    // ---- Discrete: permutation sorting ----

    struct PermSortProblem {
        n: usize,
    }

    impl SaProblem for PermSortProblem {
        type Solution = Vec<usize>;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
            let mut perm: Vec<usize> = (0..self.n).collect();
            perm.shuffle(rng);
            perm
        }

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            // Number of elements not in their correct position
            perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
        }

        fn neighbor<R: Rng>(&self, perm: &Vec<usize>, rng: &mut R) -> Vec<usize> {
            let mut new = perm.clone();
            let i = rng.random_range(0..self.n);
            let j = rng.random_range(0..self.n);
            new.swap(i, j);
            new
        }
    }

    #[test]
    fn test_sa_permutation_sort() {
        let config = SaConfig::default()
            .with_initial_temperature(5.0)
            .with_cooling_rate(0.999)
            .with_iterations(20000)
            .with_track_best(true)
            .with_seed(42);

        let result = SaRunner::run(&PermSortProblem { n: 10 }, &config).unwrap();
        let (_, best_cost) = result.best.unwrap();

        assert!(
            best_cost <= 4.0,
            "expected near-sorted permutation, got cost {best_cost}"
        );
    }
}
