use glam::Vec3;
use prop_scatter::prelude::*;
use prop_scatter_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let store = WhitelistStore::open("target/demo/whitelists")?;

    let (mut vip, outcome) = store.create_if_absent("vip")?;
    tracing::info!("Whitelist 'vip': {outcome:?}");
    vip.add_username("Alice");
    vip.add_username("Bob");
    store.save(&vip)?;

    let staff = WhitelistRecord::new("staff")
        .with_trust_levels([TrustLevel::KnownUser, TrustLevel::TrustedUser])
        .with_mode(WhitelistMode::ByTrustLevel);
    store.save(&staff)?;
    tracing::info!("Available whitelists: {:?}", store.list_available()?);

    let mut planner = PlacementPlanner::try_new(PlannerConfig::collectibles())?;
    planner.create_area(Volume::from_size(Vec3::ZERO, Vec3::splat(4.0)))?;
    let mut scene = MemoryScene::new();
    let mut rng = StdRng::seed_from_u64(11);

    let gates = [
        ("VipChest", VisibilityRule::by_whitelist("vip", WhitelistMode::ByIdentity)),
        ("StaffDoor", VisibilityRule::by_whitelist_record_mode("staff")),
        ("GhostSign", VisibilityRule::by_whitelist("retired", WhitelistMode::ByIdentity)),
    ];
    for (template, rule) in gates {
        let cmd = PlaceBatchCommand::single(Template::new(template))
            .with_rules(RuleAssignment::new(rule));
        planner.place_batch(&cmd, &mut scene, Probes::none(), &mut rng)?;
    }

    // The engine sees only what is on disk; "retired" is missing and fails closed.
    let engine = VisibilityEngine::new(store.load_catalog()?);
    let viewers = [
        ("Alice", TrustLevel::User),
        ("Carol", TrustLevel::TrustedUser),
        ("Mallory", "Known User".parse::<TrustLevel>()?),
        ("Guest", TrustLevel::Visitor),
    ];
    for (name, level) in viewers {
        let ctx = ViewerContext::new(month_day(6, 1)).with_viewer(name, level);
        let states: Vec<_> = planner
            .placed()
            .iter()
            .map(|d| format!("{}={}", d.name, engine.evaluate(&d.rule, &ctx)))
            .collect();
        tracing::info!("{name} ({level}): {}", states.join(", "));
    }
    Ok(())
}
