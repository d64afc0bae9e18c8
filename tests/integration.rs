// Integration tests (native) for the `siven` crate.
// These drive the game through `ManualTimers` so no browser APIs are touched
// and every timer fires at a deterministic virtual time.

use rand::SeedableRng;
use rand::rngs::StdRng;
use siven::{
    BONUS_VALUE, Feedback, Game, GameConfig, KeyValueStore, ManualTimers, MemoryStore, Phase,
    Transition,
};

type TestGame = Game<MemoryStore, ManualTimers, StdRng>;

fn new_game(store: MemoryStore, seed: u64) -> TestGame {
    Game::new(GameConfig::default(), store, ManualTimers::new(), StdRng::seed_from_u64(seed))
}

fn answer(g: &TestGame) -> i32 {
    g.session().problem().unwrap().answer()
}

fn wrong(g: &TestGame) -> i32 {
    let p = g.session().problem().unwrap();
    *p.options().iter().find(|&&o| o != p.answer()).unwrap()
}

#[test]
fn three_round_scenario() {
    let mut g = new_game(MemoryStore::new(), 42);
    assert_eq!(g.start(), Transition::Started);

    // Round 1: correct
    let first = answer(&g);
    g.submit_answer(first);
    assert_eq!(g.session().score(), 1);
    assert_eq!(g.session().phase(), Phase::Feedback(Feedback::Correct));
    if first == BONUS_VALUE {
        assert_eq!(g.session().bonus_counter(), 1);
        assert!(g.overlay_visible());
    } else {
        assert_eq!(g.session().bonus_counter(), 0);
        assert!(!g.overlay_visible());
    }
    assert!(g.run_for(600).contains(&Transition::Advanced));

    // Round 2: wrong
    let w = wrong(&g);
    g.submit_answer(w);
    assert_eq!(g.session().score(), 1);
    assert_eq!(g.session().phase(), Phase::Feedback(Feedback::Wrong));
    g.run_for(600);
    assert_eq!(g.session().phase(), Phase::Playing);

    // Round 3: let the clock run out
    let fired = g.run_for(10_000);
    assert_eq!(fired.last(), Some(&Transition::TimedOut));
    assert_eq!(fired.iter().filter(|t| **t == Transition::TimedOut).count(), 1);
    assert_eq!(g.session().phase(), Phase::Playing);
    assert_eq!(g.session().score(), 1);
    assert_eq!(g.session().time_remaining(), 10.0);
    assert!(g.session().problem().is_some());
}

#[test]
fn timeout_keeps_score_and_bonus() {
    let mut g = new_game(MemoryStore::new(), 3);
    g.start();
    let first = answer(&g);
    g.submit_answer(first);
    g.run_for(600);
    let (score, bonus) = (g.session().score(), g.session().bonus_counter());
    let fired = g.run_for(10_000);
    assert!(fired.contains(&Transition::TimedOut));
    assert_eq!(g.session().score(), score);
    assert_eq!(g.session().bonus_counter(), bonus);
}

#[test]
fn answer_and_timeout_tie_goes_to_answer() {
    let mut g = new_game(MemoryStore::new(), 8);
    g.start();
    g.run_for(9_950);
    assert!((g.session().time_remaining() - 0.05).abs() < 1e-6);
    let a = answer(&g);
    g.submit_answer(a);
    // the tick that would have expired the clock never fires
    let fired = g.run_for(50);
    assert!(fired.is_empty());
    assert_eq!(g.session().score(), 1);
    assert_eq!(g.session().phase(), Phase::Feedback(Feedback::Correct));
}

#[test]
fn high_score_survives_restart() {
    let mut g = new_game(MemoryStore::new(), 5);
    g.start();
    for _ in 0..3 {
        let a = answer(&g);
        g.submit_answer(a);
        g.run_for(600);
    }
    assert_eq!(g.session().high_score(), 3);

    // Simulated reload: a new game over the same store
    let mut g = new_game(g.into_store(), 6);
    assert_eq!(g.session().high_score(), 3);
    g.start();
    let a = answer(&g);
    g.submit_answer(a);
    assert_eq!(g.session().score(), 1);
    assert_eq!(g.session().high_score(), 3);
    assert_eq!(g.store().get("math-high-score").unwrap().as_deref(), Some("3"));
}

#[test]
fn corrupt_high_score_reads_as_zero() {
    let mut store = MemoryStore::new();
    store.set("math-high-score", "lots").unwrap();
    let g = new_game(store, 1);
    assert_eq!(g.session().high_score(), 0);
}

#[test]
fn bonus_claims_drain_counter_and_show_overlay() {
    let mut g = new_game(MemoryStore::new(), 12);
    g.start();
    let mut hits = 0;
    for _ in 0..500 {
        let a = answer(&g);
        g.submit_answer(a);
        if a == BONUS_VALUE {
            hits += 1;
        }
        g.run_for(600);
    }
    assert!(hits > 0, "no bonus round in 500 problems");
    assert_eq!(g.session().bonus_counter(), hits);

    g.dismiss_overlay();
    let score = g.session().score();
    for _ in 0..hits {
        assert_eq!(g.claim_bonus(), Transition::BonusClaimed);
        assert!(g.overlay_visible());
    }
    assert_eq!(g.claim_bonus(), Transition::Ignored);
    assert_eq!(g.session().bonus_counter(), 0);
    assert_eq!(g.session().score(), score);
    g.run_for(3_000);
    assert!(!g.overlay_visible());
}

#[test]
fn same_seed_same_game() {
    let mut a = new_game(MemoryStore::new(), 99);
    let mut b = new_game(MemoryStore::new(), 99);
    a.start();
    b.start();
    for _ in 0..20 {
        assert_eq!(a.session().problem(), b.session().problem());
        let (wa, wb) = (wrong(&a), wrong(&b));
        a.submit_answer(wa);
        b.submit_answer(wb);
        a.run_for(600);
        b.run_for(600);
    }
}
