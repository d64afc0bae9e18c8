//! Arithmetic problem generation.
//!
//! One in five problems is a bonus round whose answer is always
//! [`BONUS_VALUE`]; standard rounds are rerolled whenever they would land on it
//! so that 67 stays a bonus-only signal. Each problem carries three answer
//! options in random order.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::BONUS_VALUE;

/// Probability that a freshly generated problem is a bonus round.
pub const BONUS_CHANCE: f64 = 0.2;
/// Number of answer buttons.
pub const OPTION_COUNT: usize = 3;

const MAX_REROLLS: usize = 16;
const MAX_OPTION_DRAWS: usize = 64;
const DISTRACTOR_SPREAD: i32 = 10;

// --- Operations ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Symbol shown to the player.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Integer evaluation. Division is exact for every generated problem.
    pub fn apply(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Subtract => lhs - rhs,
            Operation::Multiply => lhs * rhs,
            Operation::Divide => {
                if rhs == 0 {
                    0
                } else {
                    lhs / rhs
                }
            }
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Operation::ALL[rng.gen_range(0..Operation::ALL.len())]
    }
}

// --- Problem ------------------------------------------------------------------

/// One round's question. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    question: String,
    answer: i32,
    options: [i32; OPTION_COUNT],
    operation: Operation,
    lhs: i32,
    rhs: i32,
}

impl Problem {
    fn new(operation: Operation, lhs: i32, rhs: i32, options: [i32; OPTION_COUNT]) -> Self {
        Self {
            question: format!("{} {} {}", lhs, operation.symbol(), rhs),
            answer: operation.apply(lhs, rhs),
            options,
            operation,
            lhs,
            rhs,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> i32 {
        self.answer
    }

    pub fn options(&self) -> &[i32; OPTION_COUNT] {
        &self.options
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operands(&self) -> (i32, i32) {
        (self.lhs, self.rhs)
    }

    /// Re-evaluates the question from its operands.
    pub fn evaluate(&self) -> i32 {
        self.operation.apply(self.lhs, self.rhs)
    }

    pub fn is_bonus(&self) -> bool {
        self.answer == BONUS_VALUE
    }

    pub fn is_correct(&self, selected: i32) -> bool {
        selected == self.answer
    }
}

/// A drawn expression before options are attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Draw {
    operation: Operation,
    lhs: i32,
    rhs: i32,
}

impl Draw {
    fn answer(self) -> i32 {
        self.operation.apply(self.lhs, self.rhs)
    }
}

// --- Generation ---------------------------------------------------------------

/// Generate the next problem. Gameplay draws and the option shuffle both come
/// from `rng`, so a seeded rng reproduces a whole game.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Problem {
    let draw = if rng.gen_bool(BONUS_CHANCE) {
        bonus_draw(rng)
    } else {
        standard_draw(rng)
    };
    let answer = draw.answer();
    let mut options = collect_options(answer, || {
        rng.gen_range(-DISTRACTOR_SPREAD..=DISTRACTOR_SPREAD)
    });
    options.shuffle(rng);
    Problem::new(draw.operation, draw.lhs, draw.rhs, options)
}

/// An expression that evaluates to [`BONUS_VALUE`].
fn bonus_draw<R: Rng + ?Sized>(rng: &mut R) -> Draw {
    let operation = Operation::random(rng);
    let (lhs, rhs) = match operation {
        Operation::Add => {
            let a = rng.gen_range(10..=60);
            (a, BONUS_VALUE - a)
        }
        Operation::Subtract => {
            let a = rng.gen_range(BONUS_VALUE + 1..=100);
            (a, a - BONUS_VALUE)
        }
        Operation::Multiply => (1, BONUS_VALUE),
        Operation::Divide => (BONUS_VALUE * 2, 2),
    };
    Draw { operation, lhs, rhs }
}

fn standard_draw<R: Rng + ?Sized>(rng: &mut R) -> Draw {
    avoid_bonus_answer(|| random_standard(rng))
}

fn random_standard<R: Rng + ?Sized>(rng: &mut R) -> Draw {
    let operation = Operation::random(rng);
    let (lhs, rhs) = match operation {
        Operation::Add => (rng.gen_range(1..=50), rng.gen_range(1..=50)),
        Operation::Subtract => {
            let minuend = rng.gen_range(10..=100);
            (minuend, rng.gen_range(1..=minuend))
        }
        Operation::Multiply => (rng.gen_range(2..=10), rng.gen_range(2..=10)),
        Operation::Divide => {
            let divisor = rng.gen_range(2..=10);
            let quotient = rng.gen_range(1..=10);
            (divisor * quotient, divisor)
        }
    };
    Draw { operation, lhs, rhs }
}

/// Redraw until the answer is not the bonus value, then give up and nudge the
/// last draw down to 66.
fn avoid_bonus_answer(mut draw: impl FnMut() -> Draw) -> Draw {
    let mut last = draw();
    for _ in 1..MAX_REROLLS {
        if last.answer() != BONUS_VALUE {
            return last;
        }
        last = draw();
    }
    if last.answer() != BONUS_VALUE {
        return last;
    }
    log::debug!("standard round kept hitting {BONUS_VALUE}, nudging {last:?}");
    match last.operation {
        Operation::Add if last.rhs > 1 => Draw { rhs: last.rhs - 1, ..last },
        Operation::Subtract if last.rhs < last.lhs => Draw { rhs: last.rhs + 1, ..last },
        _ => Draw { operation: Operation::Add, lhs: 33, rhs: 33 },
    }
}

/// `answer` plus distinct positive distractors near it. `offset` is polled a
/// bounded number of times; any shortfall is filled with `answer + 1`,
/// `answer + 2`, ... in order.
fn collect_options(answer: i32, mut offset: impl FnMut() -> i32) -> [i32; OPTION_COUNT] {
    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(answer);
    for _ in 0..MAX_OPTION_DRAWS {
        if options.len() == OPTION_COUNT {
            break;
        }
        let candidate = answer + offset();
        if candidate > 0 && !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    let mut step = 1;
    while options.len() < OPTION_COUNT {
        let candidate = answer + step;
        if candidate > 0 && !options.contains(&candidate) {
            options.push(candidate);
        }
        step += 1;
    }
    [options[0], options[1], options[2]]
}
