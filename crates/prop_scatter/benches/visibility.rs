mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use prop_scatter::prelude::*;

const USERNAME_COUNTS: [usize; 3] = [8, 64, 512];

fn catalog(usernames: usize) -> WhitelistCatalog {
    let names = (0..usernames).map(|i| format!("user_{i}"));
    [
        WhitelistRecord::new("guests").with_usernames(names),
        WhitelistRecord::new("staff")
            .with_trust_levels([TrustLevel::KnownUser, TrustLevel::TrustedUser])
            .with_mode(WhitelistMode::ByTrustLevel),
    ]
    .into_iter()
    .collect()
}

fn visibility_rules(c: &mut Criterion) {
    let engine = VisibilityEngine::new(catalog(64));
    let ctx = ViewerContext::new("10/31")
        .with_ambient_light(0.2)
        .with_viewer("user_63", TrustLevel::KnownUser);
    let rules = [
        ("always", VisibilityRule::AlwaysVisible),
        ("date", VisibilityRule::by_date("12/25")),
        ("light", VisibilityRule::by_light_level(0.3)),
        ("date_or_light", VisibilityRule::date_or_light("12/25", 0.3)),
        (
            "trust",
            VisibilityRule::by_whitelist("staff", WhitelistMode::ByTrustLevel),
        ),
    ];

    let mut group = c.benchmark_group("visibility/evaluate");
    group.throughput(common::instances_throughput(1));
    for (name, rule) in &rules {
        group.bench_with_input(BenchmarkId::from_parameter(name), rule, |b, rule| {
            b.iter(|| black_box(engine.evaluate(rule, &ctx)));
        });
    }
    group.finish();
}

fn visibility_identity_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility/identity");
    for &count in &USERNAME_COUNTS {
        let engine = VisibilityEngine::new(catalog(count));
        let ctx = ViewerContext::new("01/01").with_viewer("nobody", TrustLevel::User);
        let rule = VisibilityRule::by_whitelist("guests", WhitelistMode::ByIdentity);
        group.throughput(common::instances_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(engine.evaluate(&rule, &ctx)));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = visibility_rules, visibility_identity_lookup
}
criterion_main!(benches);
