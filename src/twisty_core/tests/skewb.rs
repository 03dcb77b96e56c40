use log::info;
use twisty_core::{
    Algorithm, CayleyExplorer, Exploration, MoveSide, Order, Permutation, SKEWB,
    StabilizerChain, facelets::SKEWB_NET, puzzles::SKEWB_ORDER,
};

fn skewb(name: &str) -> Permutation {
    SKEWB.get(name).unwrap().clone()
}

#[test_log::test]
fn test_r_then_r_inverse_is_identity() {
    let r = skewb("R");

    assert_eq!(r.apply_after(&r.invert()), Permutation::identity());
    assert_eq!(r.compose(&r.invert()), Permutation::identity());
    assert_eq!(
        SKEWB_NET.colors(&r.apply_after(&r.invert())),
        SKEWB_NET.solved
    );
}

#[test_log::test]
fn test_r_is_three_five_cycles() {
    let r = skewb("R");

    assert_eq!(r.order(), Order::from_digit(3));
    assert_eq!(r.cycle_type(), vec![3, 3, 3, 3, 3]);
    assert_eq!(r.support_len(), 15);
    assert!(r.is_even());
    assert_eq!(r.power(3), Permutation::identity());
    assert_eq!(r.power(-1), r.invert());
}

#[test_log::test]
fn test_single_move_exploration() {
    let r = skewb("R");
    let mut explorer = CayleyExplorer::new(vec![r.clone(), r.invert()]);

    assert_eq!(explorer.run(), 3);

    let mut visited = explorer.visited().cloned().collect::<Vec<_>>();
    visited.sort_by_key(Permutation::support_len);
    assert!(visited[0].is_identity());
    assert!(visited[1..].contains(&r));
    assert!(visited[1..].contains(&r.power(2)));
}

#[test_log::test]
fn test_two_moves_match_schreier_sims() {
    let generators = [skewb("R"), skewb("U")];
    let chain = StabilizerChain::new(&generators);

    let mut explorer = CayleyExplorer::new(
        generators
            .iter()
            .cloned()
            .chain(generators.iter().map(Permutation::invert))
            .collect(),
    )
    .with_expected_total(chain.cardinality())
    .with_report_interval(5_000);

    let mut reports = 0;
    let exploration = explorer.run_with(
        |progress| {
            info!("{progress}");
            reports += 1;
        },
        |_| true,
    );

    assert_eq!(
        Order::from_digit(exploration.states() as u64),
        chain.cardinality()
    );
    assert!(reports > 0);

    // Every state the exploration found is in the group, and nothing else is
    assert!(explorer.visited().all(|state| chain.is_member(state)));
    assert!(!chain.is_member(&skewb("L")));
}

#[test_log::test]
fn test_algorithms_land_in_the_explored_group() {
    let generators = vec![skewb("R"), skewb("U"), skewb("R").invert(), skewb("U").invert()];
    let mut explorer = CayleyExplorer::new(generators).with_move_side(MoveSide::Before);
    explorer.run();

    for text in ["R U R' U'", "R U2 R2 U' R", "U' R' U' R' U' R'"] {
        let alg = Algorithm::parse(&SKEWB, text).unwrap();
        assert!(explorer.contains(alg.permutation()), "{text}");
    }

    let outside = Algorithm::parse(&SKEWB, "R L").unwrap();
    assert!(!explorer.contains(outside.permutation()));
}

#[test_log::test]
fn test_cancelled_exploration_resumes() {
    let mut explorer =
        CayleyExplorer::new(SKEWB.generators_with_inverses()).with_report_interval(1_000);

    let first = explorer.run_with(|_| {}, |progress| progress.visited < 5_000);
    assert!(matches!(first, Exploration::Interrupted { states } if states >= 5_000));

    let second = explorer.run_with(|_| {}, |progress| progress.visited < 20_000);
    assert!(matches!(second, Exploration::Interrupted { states } if states >= 20_000));
    assert!(second.states() > first.states());
}

#[test_log::test]
fn test_group_order() {
    let chain = StabilizerChain::new(SKEWB.generators());

    assert_eq!(chain.cardinality(), SKEWB_ORDER);
    assert_eq!(SKEWB.expected_order(), Some(SKEWB_ORDER));

    // Leaving out B reaches a third of the states
    let three = StabilizerChain::new(SKEWB.generators().take(3));
    assert_eq!(three.cardinality(), SKEWB_ORDER / Order::from_digit(3));
    assert!(!three.is_member(SKEWB.get("B").unwrap()));
}

/// Visits every state of the skewb. Takes a while and a few gigabytes of
/// memory, so run it with `cargo test --release -- --ignored`.
#[test_log::test]
#[ignore]
fn test_full_exploration() {
    let mut explorer = CayleyExplorer::new(SKEWB.generators_with_inverses())
        .with_expected_total(SKEWB_ORDER)
        .with_report_interval(100_000);

    let exploration = explorer.run_with(|progress| info!("{progress}"), |_| true);

    let Exploration::Exhausted { states } = exploration else {
        panic!("the exploration was interrupted: {exploration:?}");
    };
    assert_eq!(Order::from_digit(states as u64), SKEWB_ORDER);
}
