// Property checks for the problem generator over many seeded draws.

use rand::SeedableRng;
use rand::rngs::StdRng;
use siven::{BONUS_VALUE, Operation, generate};
use std::collections::HashSet;

/// Evaluate a rendered question string with plain integer arithmetic.
fn eval_question(q: &str) -> i32 {
    let parts: Vec<&str> = q.split(' ').collect();
    assert_eq!(parts.len(), 3, "unexpected question shape {q:?}");
    let a: i32 = parts[0].parse().unwrap();
    let b: i32 = parts[2].parse().unwrap();
    match parts[1] {
        "+" => a + b,
        "-" => a - b,
        "×" => a * b,
        "÷" => {
            assert_eq!(a % b, 0, "{q:?} has a remainder");
            a / b
        }
        op => panic!("unknown operator {op:?}"),
    }
}

#[test]
fn every_problem_is_well_formed() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..10_000 {
        let p = generate(&mut rng);
        assert_eq!(eval_question(p.question()), p.answer(), "{p:?}");
        let opts: HashSet<i32> = p.options().iter().copied().collect();
        assert_eq!(opts.len(), 3, "{p:?}");
        assert!(opts.contains(&p.answer()));
        assert!(opts.iter().all(|&o| o == p.answer() || o > 0), "{p:?}");
        assert!(p.answer() >= 0);
    }
}

#[test]
fn bonus_rate_is_about_one_in_five() {
    let mut rng = StdRng::seed_from_u64(77);
    let n = 20_000;
    let bonus = (0..n).filter(|_| generate(&mut rng).is_bonus()).count();
    let rate = bonus as f64 / n as f64;
    assert!((0.17..0.23).contains(&rate), "bonus rate {rate}");
}

#[test]
fn only_known_bonus_questions_yield_67() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..10_000 {
        let p = generate(&mut rng);
        if p.answer() != BONUS_VALUE {
            continue;
        }
        let (lhs, rhs) = p.operands();
        match p.operation() {
            Operation::Add => assert!((10..=60).contains(&lhs) && lhs + rhs == 67),
            Operation::Subtract => assert!((68..=100).contains(&lhs) && lhs - rhs == 67),
            Operation::Multiply => assert_eq!(p.question(), "1 × 67"),
            Operation::Divide => assert_eq!(p.question(), "134 ÷ 2"),
        }
    }
}

#[test]
fn option_order_varies() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut positions = HashSet::new();
    for _ in 0..300 {
        let p = generate(&mut rng);
        let pos = p.options().iter().position(|&o| o == p.answer()).unwrap();
        positions.insert(pos);
    }
    assert_eq!(positions.len(), 3);
}
