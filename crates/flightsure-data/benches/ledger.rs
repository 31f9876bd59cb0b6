//! FlightSure ledger benchmarks
//!
//! - Composite key digests
//! - Crediting a policy list of varying size
//! - Withdrawal through the payout rail

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flightsure_common::{AccountId, FlightKey, PolicyKey, VoteKey};
use flightsure_data::{FlightSureData, LedgerConfig, PayoutLog};

// ============ KEY BENCHMARKS ============

fn bench_key_digests(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");
    let delta = AccountId::from_label("delta");
    let united = AccountId::from_label("united");

    group.bench_function("flight_key", |b| {
        b.iter(|| FlightKey::new(black_box(delta), black_box("DL100"), black_box(1_700_000_000)).digest())
    });

    group.bench_function("policy_key", |b| {
        b.iter(|| PolicyKey::new(black_box(delta), black_box("DL100")).digest())
    });

    group.bench_function("vote_key", |b| {
        b.iter(|| VoteKey::new(black_box(united), black_box(delta)).digest())
    });

    group.finish();
}

// ============ CREDIT BENCHMARKS ============

fn bench_credit_insurees(c: &mut Criterion) {
    let mut group = c.benchmark_group("credit_insurees");
    let owner = AccountId::from_label("owner");
    let delta = AccountId::from_label("delta");

    for policies in [1usize, 16, 256, 4096].iter() {
        group.throughput(Throughput::Elements(*policies as u64));

        group.bench_with_input(
            BenchmarkId::new("policies", policies),
            policies,
            |b, &policies| {
                let ledger = FlightSureData::new(owner, LedgerConfig::default());
                let insurees: Vec<_> = (0..policies)
                    .map(|i| AccountId::from_label(&format!("passenger-{i}")))
                    .collect();

                b.iter(|| {
                    for insuree in &insurees {
                        ledger
                            .add_to_insurance_policy(&owner, &delta, "DL100", insuree, 1_000)
                            .unwrap();
                    }
                    ledger
                        .credit_insurees(&owner, &delta, black_box("DL100"), black_box(15))
                        .unwrap();
                });
            },
        );
    }

    group.finish();
}

// ============ WITHDRAW BENCHMARKS ============

fn bench_withdraw(c: &mut Criterion) {
    let owner = AccountId::from_label("owner");
    let delta = AccountId::from_label("delta");
    let passenger = AccountId::from_label("passenger");

    let ledger = FlightSureData::new(owner, LedgerConfig::default())
        .with_funds_transfer(Arc::new(PayoutLog::new()));
    ledger.accept_deposit(&delta, u64::MAX).unwrap();

    c.bench_function("withdraw_credits", |b| {
        b.iter(|| {
            ledger
                .add_to_insurance_policy(&owner, &delta, "DL100", &passenger, 10)
                .unwrap();
            ledger.credit_insurees(&owner, &delta, "DL100", 10).unwrap();
            ledger
                .withdraw_credits_for_insuree(&owner, black_box(&passenger))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_key_digests, bench_credit_insurees, bench_withdraw);
criterion_main!(benches);
