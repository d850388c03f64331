//! The fake "computing" sequence shown after `=`

use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Progress bar step per interval
pub const PROGRESS_STEP: u8 = 5;
/// Interval between progress steps
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);
/// Pause between a full progress bar and the answer
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);
/// How long the answer stays on screen
pub const ANSWER_HOLD: Duration = Duration::from_millis(3000);
/// Delay before the result message fades in
pub const MESSAGE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound (exclusive) for numeric answers
pub const MAX_NUMBER: u32 = 999_999_999;

/// Canned answers
pub const QUIPS: [&str; 8] = [
    "42",
    "Error: Brain Not Found",
    "It's over 9000!",
    "The cake is a lie",
    "Calculating... Not really.",
    "404: Answer not found",
    "Why are you asking me?",
    "Don't do math, kids.",
];

const fn computing_time() -> Duration {
    let steps = (100 / PROGRESS_STEP) as u32;
    Duration::from_millis(PROGRESS_INTERVAL.as_millis() as u64 * steps as u64)
}

/// What the widget "computed"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrankAnswer {
    /// A random integer below [`MAX_NUMBER`]
    Number(u32),
    /// One of the [`QUIPS`]
    Quip(&'static str),
}

impl PrankAnswer {
    /// Draws an answer: a number or a quip, even odds
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let number = rng.gen_range(0..MAX_NUMBER);
        let quip = QUIPS[rng.gen_range(0..QUIPS.len())];
        if rng.gen::<f64>() > 0.5 {
            Self::Number(number)
        } else {
            Self::Quip(quip)
        }
    }
}

impl fmt::Display for PrankAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Quip(text) => f.write_str(text),
        }
    }
}

/// Stage of a running sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealPhase {
    /// Progress bar filling up, percent complete
    Computing(u8),
    /// Bar full, computing text hidden, answer not yet shown
    Pending,
    /// Answer on screen
    Revealed,
    /// Sequence over; the overlay closes
    Finished,
}

/// One run of the overlay, driven by elapsed time
///
/// Dropping the value cancels the animation.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    answer: PrankAnswer,
    elapsed: Duration,
    delivered: bool,
}

impl RevealSequence {
    /// Starts a sequence that will reveal `answer`
    #[must_use]
    pub const fn new(answer: PrankAnswer) -> Self {
        Self {
            answer,
            elapsed: Duration::ZERO,
            delivered: false,
        }
    }

    /// Advances the clock
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Time since `=`
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The answer being revealed
    #[must_use]
    pub const fn answer(&self) -> PrankAnswer {
        self.answer
    }

    /// Current stage
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        let computing = computing_time();
        if self.elapsed < computing {
            let steps = self.elapsed.as_millis() / PROGRESS_INTERVAL.as_millis();
            return RevealPhase::Computing((steps as u8).saturating_mul(PROGRESS_STEP));
        }
        let revealed_at = computing + REVEAL_DELAY;
        if self.elapsed < revealed_at {
            RevealPhase::Pending
        } else if self.elapsed < revealed_at + ANSWER_HOLD {
            RevealPhase::Revealed
        } else {
            RevealPhase::Finished
        }
    }

    /// Progress bar fill, 0-100
    #[must_use]
    pub fn progress(&self) -> u8 {
        match self.phase() {
            RevealPhase::Computing(progress) => progress,
            _ => 100,
        }
    }

    /// True once the result message has faded in
    #[must_use]
    pub fn message_visible(&self) -> bool {
        self.elapsed >= MESSAGE_DELAY
    }

    /// Hands out the answer once, as soon as it has been revealed
    pub fn take_answer(&mut self) -> Option<PrankAnswer> {
        if self.delivered || self.phase() < RevealPhase::Revealed {
            return None;
        }
        self.delivered = true;
        Some(self.answer)
    }

    /// True when the sequence has run its course
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase() == RevealPhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn at(millis: u64) -> RevealSequence {
        let mut sequence = RevealSequence::new(PrankAnswer::Number(7));
        sequence.advance(ms(millis));
        sequence
    }

    // ===== PrankAnswer tests =====

    #[test]
    fn test_answer_display() {
        assert_eq!(PrankAnswer::Number(123).to_string(), "123");
        assert_eq!(PrankAnswer::Quip(QUIPS[2]).to_string(), "It's over 9000!");
    }

    #[test]
    fn test_generate_covers_both_kinds() {
        let mut rng = StdRng::seed_from_u64(3);
        let answers: Vec<PrankAnswer> = (0..200).map(|_| PrankAnswer::generate(&mut rng)).collect();
        assert!(answers.iter().any(|a| matches!(a, PrankAnswer::Number(_))));
        assert!(answers.iter().any(|a| matches!(a, PrankAnswer::Quip(_))));
        for answer in answers {
            match answer {
                PrankAnswer::Number(n) => assert!(n < MAX_NUMBER),
                PrankAnswer::Quip(text) => assert!(QUIPS.contains(&text)),
            }
        }
    }

    // ===== Phase tests =====

    #[test]
    fn test_progress_steps() {
        assert_eq!(at(0).phase(), RevealPhase::Computing(0));
        assert_eq!(at(99).phase(), RevealPhase::Computing(0));
        assert_eq!(at(100).phase(), RevealPhase::Computing(5));
        assert_eq!(at(1999).phase(), RevealPhase::Computing(95));
        assert_eq!(at(2000).progress(), 100);
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(at(2000).phase(), RevealPhase::Pending);
        assert_eq!(at(2499).phase(), RevealPhase::Pending);
        assert_eq!(at(2500).phase(), RevealPhase::Revealed);
        assert_eq!(at(5499).phase(), RevealPhase::Revealed);
        assert_eq!(at(5500).phase(), RevealPhase::Finished);
        assert!(at(6000).is_finished());
    }

    #[test]
    fn test_message_fades_in() {
        assert!(!at(499).message_visible());
        assert!(at(500).message_visible());
    }

    #[test]
    fn test_take_answer_once() {
        let mut sequence = at(2400);
        assert_eq!(sequence.take_answer(), None);
        sequence.advance(ms(100));
        assert_eq!(sequence.take_answer(), Some(PrankAnswer::Number(7)));
        assert_eq!(sequence.take_answer(), None);
    }

    #[test]
    fn test_take_answer_after_large_jump() {
        let mut sequence = at(10_000);
        assert_eq!(sequence.take_answer(), Some(PrankAnswer::Number(7)));
    }
}
