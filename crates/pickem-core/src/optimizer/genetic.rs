// Genetic search over pick vectors.
//
// Each generation: evaluate, keep the top half as parents (truncation
// selection), then breed a full replacement population through single-point
// crossover and per-position mutation.

use std::collections::HashSet;

use rand::Rng;
use tracing::{info, trace};

use super::fitness::{by_fitness_desc, FitnessContext, Individual};
use super::{rank, OptimizerParams, SlateResult};
use crate::game::{Game, Side};

/// Search for the best `params.num_slates` distinct slates.
///
/// Results are sorted by fitness, highest first, and never contain the same
/// pick vector twice. Identical inputs and an identically seeded `rng` give
/// identical output. An empty week (or an empty population) yields no slates.
pub fn optimize<R: Rng + ?Sized>(
    games: &[Game],
    params: &OptimizerParams,
    rng: &mut R,
) -> Vec<SlateResult> {
    if games.is_empty() || params.population_size == 0 {
        return Vec::new();
    }

    let ctx = FitnessContext::new(games, params.underdog_bonus);

    let mut population: Vec<Individual> = (0..params.population_size)
        .map(|_| random_individual(&ctx, rng))
        .collect();

    for generation in 0..params.generations {
        population = next_generation(&population, &ctx, params.mutation_rate, rng);
        if tracing::enabled!(tracing::Level::TRACE) {
            let best = population
                .iter()
                .map(|ind| ctx.evaluate(ind).fitness)
                .fold(f64::NAN, f64::max);
            trace!("generation {}: best fitness {:.5}", generation + 1, best);
        }
    }

    for ind in population.iter_mut() {
        ctx.canonicalize(ind);
    }
    let slates = rank(games, &ctx, unique(population), params.num_slates);
    info!(
        "Genetic search finished: {} generations, {} slates returned",
        params.generations,
        slates.len()
    );
    slates
}

/// Breed the generation that replaces `population`.
///
/// The top `len / 2` individuals by fitness form the parent pool (at least
/// one parent is kept for a population of one). The returned population has
/// the same size as the input.
pub fn next_generation<R: Rng + ?Sized>(
    population: &[Individual],
    ctx: &FitnessContext,
    mutation_rate: f64,
    rng: &mut R,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&Individual, f64)> = population
        .iter()
        .map(|ind| (ind, ctx.evaluate(ind).fitness))
        .collect();
    scored.sort_by(|a, b| by_fitness_desc(a.1, b.1));

    let pool_size = (population.len() / 2).max(1);
    let parents: Vec<&Individual> = scored.iter().take(pool_size).map(|(ind, _)| *ind).collect();

    let mut offspring = Vec::with_capacity(population.len());
    while offspring.len() < population.len() {
        let p1 = parents[rng.gen_range(0..parents.len())];
        let p2 = parents[rng.gen_range(0..parents.len())];
        let mut child = crossover(p1, p2, rng);
        mutate(&mut child, mutation_rate, rng);
        offspring.push(child);
    }
    offspring
}

/// One pick per game, each drawn with the game's win probabilities as weights.
fn random_individual<R: Rng + ?Sized>(ctx: &FitnessContext, rng: &mut R) -> Individual {
    ctx.probabilities
        .iter()
        .map(|p| {
            // A NaN weight compares false and lands on the underdog.
            if rng.gen::<f64>() < p.favorite {
                Side::Favorite
            } else {
                Side::Underdog
            }
        })
        .collect()
}

/// Single-point crossover. With fewer than two games there is nowhere to
/// split, so the child is a copy of `p1`.
fn crossover<R: Rng + ?Sized>(p1: &[Side], p2: &[Side], rng: &mut R) -> Individual {
    let n = p1.len();
    if n < 2 {
        return p1.to_vec();
    }
    let point = rng.gen_range(1..n);
    let mut child = Vec::with_capacity(n);
    child.extend_from_slice(&p1[..point]);
    child.extend_from_slice(&p2[point..]);
    child
}

fn mutate<R: Rng + ?Sized>(child: &mut [Side], mutation_rate: f64, rng: &mut R) {
    for side in child.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *side = side.other();
        }
    }
}

/// Drop repeated pick vectors, keeping first occurrences in order.
fn unique(population: Vec<Individual>) -> Vec<Individual> {
    let mut seen = HashSet::new();
    population
        .into_iter()
        .filter(|ind| seen.insert(ind.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn scenario() -> Vec<Game> {
        vec![Game::new("A", "B", 3.0), Game::new("C", "D", 7.0)]
    }

    fn week(n: usize) -> Vec<Game> {
        let spreads = [
            1.0, 3.0, 7.0, 2.5, 10.0, 4.5, 6.0, 13.5, 0.0, -2.0, 3.5, 9.5, 5.0, 1.5, 8.0, 17.0,
        ];
        (0..n)
            .map(|i| Game::new(format!("F{i}"), format!("U{i}"), spreads[i % spreads.len()]))
            .collect()
    }

    fn small_params() -> OptimizerParams {
        OptimizerParams {
            population_size: 60,
            generations: 25,
            ..OptimizerParams::default()
        }
    }

    #[test]
    fn empty_week_yields_no_slates() {
        let out = optimize(&[], &OptimizerParams::default(), &mut rng(0));
        assert!(out.is_empty());
    }

    #[test]
    fn zero_population_yields_no_slates() {
        let params = OptimizerParams {
            population_size: 0,
            ..OptimizerParams::default()
        };
        assert!(optimize(&scenario(), &params, &mut rng(0)).is_empty());
    }

    #[test]
    fn two_game_scenario_converges_to_full_ranking() {
        let params = OptimizerParams {
            num_slates: 4,
            population_size: 200,
            generations: 60,
            mutation_rate: 0.2,
            underdog_bonus: 0.45,
        };
        let out = optimize(&scenario(), &params, &mut rng(7));
        assert_eq!(out.len(), 4);

        assert_eq!(out[0].picks, vec!["A", "C"]);
        assert!((out[0].fitness - 0.45).abs() < 1e-9);
        assert_eq!(out[1].picks, vec!["B", "C"]);
        assert!((out[1].fitness - 0.435).abs() < 1e-9);
        assert_eq!(out[2].picks, vec!["A", "D"]);
        assert!((out[2].fitness - 0.2175).abs() < 1e-9);
        assert_eq!(out[3].picks, vec!["B", "D"]);
        assert!((out[3].fitness - 0.19).abs() < 1e-9);
    }

    #[test]
    fn deterministic_under_same_seed() {
        let games = week(12);
        let a = optimize(&games, &small_params(), &mut rng(42));
        let b = optimize(&games, &small_params(), &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn results_unique_sorted_and_bounded() {
        let games = week(16);
        let params = OptimizerParams {
            num_slates: 10,
            ..small_params()
        };
        let out = optimize(&games, &params, &mut rng(3));
        assert!(out.len() <= 10);
        assert!(!out.is_empty());

        let distinct: HashSet<_> = out.iter().map(|s| s.sides.clone()).collect();
        assert_eq!(distinct.len(), out.len());

        for pair in out.windows(2) {
            assert!(pair[0].fitness >= pair[1].fitness);
        }
        for slate in &out {
            assert_eq!(slate.picks.len(), games.len());
            assert!(slate.overall_probability > 0.0 && slate.overall_probability <= 1.0);
            assert!(slate.fitness >= slate.overall_probability);
        }
    }

    #[test]
    fn single_game_has_at_most_two_slates() {
        let games = vec![Game::new("Chiefs", "Raiders", 3.0)];
        let params = OptimizerParams {
            num_slates: 5,
            population_size: 50,
            generations: 20,
            mutation_rate: 0.3,
            underdog_bonus: 0.45,
        };
        let out = optimize(&games, &params, &mut rng(11));
        assert!(out.len() <= 2);
        assert!(!out.is_empty());
        // 0.60 vs 0.40 * 1.45 = 0.58: favorite ranks first when both appear.
        if out.len() == 2 {
            assert_eq!(out[0].picks, vec!["Chiefs"]);
            assert_eq!(out[1].picks, vec!["Raiders"]);
        }
    }

    #[test]
    fn single_game_bonus_can_promote_underdog() {
        // 0.53 vs 0.47 * 1.45 = 0.6815
        let games = vec![Game::new("Chiefs", "Raiders", 1.0)];
        let params = OptimizerParams {
            num_slates: 2,
            population_size: 50,
            generations: 20,
            mutation_rate: 0.3,
            underdog_bonus: 0.45,
        };
        let out = optimize(&games, &params, &mut rng(5));
        assert_eq!(out[0].picks, vec!["Raiders"]);
    }

    #[test]
    fn result_count_capped_by_combinations() {
        let games = vec![Game::new("A", "B", 3.0)];
        let params = OptimizerParams {
            num_slates: 50,
            population_size: 100,
            generations: 5,
            mutation_rate: 0.5,
            underdog_bonus: 0.45,
        };
        let out = optimize(&games, &params, &mut rng(9));
        assert!(out.len() <= 2);
    }

    #[test]
    fn next_generation_preserves_size_and_length() {
        let games = week(6);
        let ctx = FitnessContext::new(&games, 0.45);
        let mut r = rng(1);
        let population: Vec<Individual> =
            (0..31).map(|_| random_individual(&ctx, &mut r)).collect();
        let next = next_generation(&population, &ctx, 0.07, &mut r);
        assert_eq!(next.len(), 31);
        assert!(next.iter().all(|ind| ind.len() == 6));
    }

    #[test]
    fn next_generation_breeds_only_from_top_half() {
        // All-favorite scores 0.5625 here, all-underdog 0.0625 * 1.9.
        let games = vec![Game::new("A", "B", 7.0), Game::new("C", "D", 7.0)];
        let ctx = FitnessContext::new(&games, 0.45);
        let mut population = vec![vec![Side::Underdog; 2]; 10];
        population.extend(vec![vec![Side::Favorite; 2]; 10]);

        let next = next_generation(&population, &ctx, 0.0, &mut rng(12));
        assert_eq!(next.len(), 20);
        assert!(next.iter().all(|ind| ind == &vec![Side::Favorite; 2]));
    }

    #[test]
    fn initial_picks_follow_win_probability() {
        // 20 points is past the top step: favorite wins 93% of the time.
        let ctx = FitnessContext::new(&[Game::new("A", "B", 20.0)], 0.45);
        let mut r = rng(13);
        let draws = 10_000;
        let favorites = (0..draws)
            .filter(|_| random_individual(&ctx, &mut r)[0] == Side::Favorite)
            .count();
        let share = favorites as f64 / draws as f64;
        assert!((0.90..=0.96).contains(&share), "favorite share {share}");
    }

    #[test]
    fn self_matchup_does_not_duplicate_slates() {
        let games = vec![Game::new("X", "X", 3.0), Game::new("C", "D", 7.0)];
        let params = OptimizerParams {
            num_slates: 5,
            population_size: 100,
            generations: 20,
            ..OptimizerParams::default()
        };
        let out = optimize(&games, &params, &mut rng(1));

        let distinct: HashSet<_> = out.iter().map(|s| s.picks.clone()).collect();
        assert_eq!(distinct.len(), out.len());
        assert!(out.len() <= 2);
        assert!(out.iter().all(|s| s.sides[0] == Side::Favorite));
        assert_eq!(out[0].picks, vec!["X", "C"]);
        assert_eq!(out[0].underdog_count, 0);
    }

    #[test]
    fn next_generation_of_single_individual() {
        let games = week(3);
        let ctx = FitnessContext::new(&games, 0.45);
        let population = vec![vec![Side::Favorite; 3]];
        let next = next_generation(&population, &ctx, 0.0, &mut rng(2));
        assert_eq!(next, population);
    }

    #[test]
    fn crossover_splits_inside_the_vector() {
        let p1 = vec![Side::Favorite; 5];
        let p2 = vec![Side::Underdog; 5];
        let mut r = rng(8);
        for _ in 0..50 {
            let child = crossover(&p1, &p2, &mut r);
            assert_eq!(child[0], Side::Favorite);
            assert_eq!(child[4], Side::Underdog);
            let switch = child.iter().position(|s| *s == Side::Underdog).unwrap();
            assert!(child[switch..].iter().all(|s| *s == Side::Underdog));
        }
    }

    #[test]
    fn crossover_single_game_copies_first_parent() {
        let child = crossover(&[Side::Underdog], &[Side::Favorite], &mut rng(0));
        assert_eq!(child, vec![Side::Underdog]);
    }

    #[test]
    fn mutation_rate_extremes() {
        let mut r = rng(4);
        let mut child = vec![Side::Favorite; 8];
        mutate(&mut child, 0.0, &mut r);
        assert!(child.iter().all(|s| *s == Side::Favorite));
        mutate(&mut child, 1.0, &mut r);
        assert!(child.iter().all(|s| *s == Side::Underdog));
    }

    #[test]
    fn nan_probabilities_do_not_panic_and_sort_last() {
        let games = week(3);
        let mut ctx = FitnessContext::new(&games, 0.45);
        ctx.probabilities[1].favorite = f64::NAN;
        let mut r = rng(6);
        let population: Vec<Individual> =
            (0..20).map(|_| random_individual(&ctx, &mut r)).collect();
        // Game 1 always starts on the underdog when its weight is NaN.
        assert!(population.iter().all(|ind| ind[1] == Side::Underdog));

        let next = next_generation(&population, &ctx, 0.5, &mut r);
        let ranked = rank(&games, &ctx, unique(next), 10);
        let first_nan = ranked.iter().position(|s| s.fitness.is_nan());
        if let Some(i) = first_nan {
            assert!(ranked[i..].iter().all(|s| s.fitness.is_nan()));
        }
    }

    #[test]
    fn unique_keeps_first_occurrence_order() {
        let a = vec![Side::Favorite];
        let b = vec![Side::Underdog];
        let out = unique(vec![b.clone(), a.clone(), b.clone(), a.clone()]);
        assert_eq!(out, vec![b, a]);
    }
}
