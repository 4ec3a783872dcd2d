//! Short code candidate generation.
//!
//! Candidates are produced by a fixed sequence of strategies. The generator
//! never touches storage; the caller checks each candidate for collisions and
//! moves on to the next strategy when one is taken.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

const CONSONANTS: &[u8] = b"bcdfghjklmnprstvwz";
const VOWELS: &[u8] = b"aeiou";
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Strategy used to produce a short code candidate, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStrategy {
    /// 6 random mixed-case alphanumerics.
    Random6,
    /// 8 random mixed-case alphanumerics.
    Random8,
    /// 6 characters alternating consonant and vowel.
    Pronounceable,
    /// Base-36 wall-clock milliseconds followed by 4 random alphanumerics.
    Timestamp,
}

impl CodeStrategy {
    /// All strategies in the order the allocator tries them.
    pub const ALL: [CodeStrategy; 4] = [
        CodeStrategy::Random6,
        CodeStrategy::Random8,
        CodeStrategy::Pronounceable,
        CodeStrategy::Timestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeStrategy::Random6 => "random6",
            CodeStrategy::Random8 => "random8",
            CodeStrategy::Pronounceable => "pronounceable",
            CodeStrategy::Timestamp => "timestamp",
        }
    }
}

/// Stateless short code generator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produces one candidate with the given strategy. Never fails.
    pub fn generate(&self, strategy: CodeStrategy) -> String {
        match strategy {
            CodeStrategy::Random6 => random_alphanumeric(6),
            CodeStrategy::Random8 => random_alphanumeric(8),
            CodeStrategy::Pronounceable => pronounceable(6),
            CodeStrategy::Timestamp => {
                let millis = Utc::now().timestamp_millis().max(0) as u64;
                format!("{}{}", to_base36(millis), random_alphanumeric(4))
            }
        }
    }

    /// Yields one candidate per strategy, lazily, in preference order.
    pub fn candidates(&self) -> impl Iterator<Item = (CodeStrategy, String)> + '_ {
        CodeStrategy::ALL
            .into_iter()
            .map(move |strategy| (strategy, self.generate(strategy)))
    }
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn pronounceable(len: usize) -> String {
    let mut rng = rand::rng();

    (0..len)
        .map(|i| {
            let pool = if i % 2 == 0 { CONSONANTS } else { VOWELS };
            pool[rng.random_range(0..pool.len())] as char
        })
        .collect()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}
