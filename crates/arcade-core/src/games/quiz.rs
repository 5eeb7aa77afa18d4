use super::make_rng;
use crate::game::{Playable, Status};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => 'x',
        }
    }
}

/// Two operands in 1..=10 and an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub a: u32,
    pub b: u32,
    pub op: Operator,
}

impl Question {
    pub fn answer(&self) -> u32 {
        match self.op {
            Operator::Add => self.a + self.b,
            Operator::Subtract => self.a - self.b,
            Operator::Multiply => self.a * self.b,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.a, self.op.symbol(), self.b)
    }
}

/// Response to a submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: u32 },
    /// Input did not parse; the question stays open
    NotANumber,
}

/// Endless arithmetic drill
pub struct Quiz {
    rng: StdRng,
    question: Question,
    /// Feedback for the current question once it has been answered
    feedback: Option<Feedback>,
    score: u64,
    answered: u32,
    streak: u32,
    best_streak: u32,
}

impl Default for Quiz {
    fn default() -> Self {
        Self::new()
    }
}

impl Quiz {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let question = Self::generate(&mut rng);
        Self {
            rng,
            question,
            feedback: None,
            score: 0,
            answered: 0,
            streak: 0,
            best_streak: 0,
        }
    }

    fn generate(rng: &mut StdRng) -> Question {
        let a = rng.gen_range(1..=10);
        let b = rng.gen_range(1..=10);
        match rng.gen_range(0..3) {
            0 => Question { a, b, op: Operator::Add },
            1 => Question {
                a: a.max(b),
                b: a.min(b),
                op: Operator::Subtract,
            },
            _ => Question { a, b, op: Operator::Multiply },
        }
    }

    pub fn question(&self) -> Question {
        self.question
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// True once the current question has been graded
    pub fn awaiting_next(&self) -> bool {
        matches!(self.feedback, Some(Feedback::Correct | Feedback::Incorrect { .. }))
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Grade an answer. Graded questions ignore further submissions.
    pub fn submit(&mut self, input: &str) -> Feedback {
        if let Some(done) = self.feedback {
            if self.awaiting_next() {
                return done;
            }
        }
        let Ok(value) = input.trim().parse::<i64>() else {
            self.feedback = Some(Feedback::NotANumber);
            return Feedback::NotANumber;
        };

        let expected = self.question.answer();
        let feedback = if value == i64::from(expected) {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            Feedback::Correct
        } else {
            self.streak = 0;
            Feedback::Incorrect { expected }
        };
        self.answered += 1;
        debug!(question = %self.question, ?feedback, "quiz answer");
        self.feedback = Some(feedback);
        feedback
    }

    /// Move on after a graded answer
    pub fn next(&mut self) {
        if self.awaiting_next() {
            self.question = Self::generate(&mut self.rng);
            self.feedback = None;
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.answered = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.feedback = None;
        self.question = Self::generate(&mut self.rng);
    }
}

impl Playable for Quiz {
    fn advance(&mut self, _dt: Duration) {}

    fn status(&self) -> Status {
        Status::Playing
    }

    fn score(&self) -> u64 {
        self.score
    }
}
