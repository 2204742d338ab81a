//! Benchmarks for the deferred-acceptance kernel.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- run_to_completion
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use deferred_acceptance::engine::{blocking_pairs, DriveMode, MatchingEngine};
use deferred_acceptance::{Market, MarketConfig, Preference, ProposerId, ResponderId};

// ============================================================================
// HELPER FUNCTIONS - Deterministic market generation
// ============================================================================

/// Preference lists for a complete n x n market, seeded.
fn generate_lists(size: usize, seed: u64) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let shuffled = |rng: &mut ChaCha8Rng| {
        let mut order: Vec<usize> = (0..size).collect();
        order.shuffle(rng);
        order
    };

    let proposers = (0..size).map(|_| shuffled(&mut rng)).collect();
    let responders = (0..size).map(|_| shuffled(&mut rng)).collect();
    (proposers, responders)
}

/// Build a market from index-based preference lists.
fn build_market(lists: &(Vec<Vec<usize>>, Vec<Vec<usize>>)) -> Market {
    let (proposer_lists, responder_lists) = lists;
    let mut market = Market::with_config(MarketConfig::with_capacity(proposer_lists.len()));

    let ps: Vec<ProposerId> = proposer_lists
        .iter()
        .map(|_| market.register_proposer(None, None).expect("register proposer"))
        .collect();
    let rs: Vec<ResponderId> = responder_lists
        .iter()
        .map(|_| market.register_responder(None, None).expect("register responder"))
        .collect();

    for (&p, list) in ps.iter().zip(proposer_lists) {
        market
            .set_proposer_order(p, list.iter().map(|&i| rs[i]).collect())
            .expect("proposer order");
    }
    for (&r, list) in rs.iter().zip(responder_lists) {
        market
            .set_responder_preference(r, Preference::Strict(list.iter().map(|&i| ps[i]).collect()))
            .expect("responder preference");
    }
    market
}

// ============================================================================
// BENCHMARK: Run to completion
// ============================================================================

fn bench_run_to_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_to_completion");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    for size in [10, 100, 500] {
        let lists = generate_lists(size, 42);
        group.throughput(Throughput::Elements(size as u64));

        for (label, mode) in [("rounds", DriveMode::Rounds), ("single_step", DriveMode::SingleStep)] {
            group.bench_with_input(BenchmarkId::new(label, size), &lists, |b, lists| {
                b.iter_batched(
                    || build_market(lists),
                    |mut market| black_box(MatchingEngine::new(mode).run(&mut market)),
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Single proposal
// ============================================================================

fn bench_single_proposal(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_proposal");

    group.measurement_time(Duration::from_secs(5));

    let lists = generate_lists(1_000, 7);
    group.bench_function("first_move_1k_market", |b| {
        b.iter_batched(
            || build_market(&lists),
            |mut market| black_box(market.advance_one(ProposerId(1))),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Stability check and state root
// ============================================================================

fn bench_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification");

    group.measurement_time(Duration::from_secs(5));

    let mut market = build_market(&generate_lists(300, 12345));
    MatchingEngine::default()
        .run(&mut market)
        .expect("market runs to completion");

    group.bench_function("blocking_pairs_300", |b| b.iter(|| black_box(blocking_pairs(&market))));
    group.bench_function("state_root_300", |b| b.iter(|| black_box(market.state_root())));

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_run_to_completion, bench_single_proposal, bench_verification);

criterion_main!(benches);
