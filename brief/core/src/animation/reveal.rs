//! Progressive Reveal
//!
//! Shows a fixed string one character per tick. While characters remain
//! hidden, a random decoy sits right after the revealed prefix.
//!
//! ```text
//! tick 0   ""
//! tick 1   "T" + decoy
//! tick 2   "Th" + decoy
//! ...
//! tick n   "The full text"      (complete, ticker dropped)
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{sample_char, AnimatorError, Ticker, DECOY_ALPHABET};

/// Reveal timing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealConfig {
    /// Time between revealed characters
    pub speed: Duration,
    /// Wait before the first character
    pub delay: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(8),
            delay: Duration::from_millis(500),
        }
    }
}

/// Where a reveal currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Waiting for the start delay, or cancelled before completing
    Idle,
    /// Revealing one character per tick
    Revealing,
    /// Everything is visible
    Complete,
}

/// Character-by-character reveal of a fixed string
#[derive(Debug)]
pub struct RevealAnimator {
    source: String,
    chars: Vec<char>,
    config: RevealConfig,

    // Progress
    revealed: usize,
    decoy: Option<char>,

    /// Tick source; `None` once complete or cancelled
    ticker: Option<Ticker>,
    rng: StdRng,
}

impl RevealAnimator {
    /// Create a reveal and start it
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::EmptySource`] for an empty `source` and
    /// [`AnimatorError::ZeroPeriod`] for a zero `config.speed`.
    pub fn new(source: impl Into<String>, config: RevealConfig) -> Result<Self, AnimatorError> {
        let source = source.into();
        validate(&source, config)?;

        let mut animator = Self {
            chars: source.chars().collect(),
            source,
            config,
            revealed: 0,
            decoy: None,
            ticker: None,
            rng: StdRng::from_entropy(),
        };
        animator.restart();
        Ok(animator)
    }

    /// Use a specific random source for decoys
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Feed elapsed time; returns true when the displayed text changed
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let Some(ticker) = self.ticker.as_mut() else {
            return false;
        };

        let due = ticker.advance(elapsed);
        let mut changed = false;
        for _ in 0..due {
            if self.ticker.is_none() {
                // Completed mid-batch; the remaining ticks are discarded
                break;
            }
            self.step();
            changed = true;
        }
        changed
    }

    fn step(&mut self) {
        self.revealed += 1;

        if self.revealed < self.chars.len() {
            self.decoy = Some(sample_char(DECOY_ALPHABET, &mut self.rng));
        } else {
            self.decoy = None;
            self.ticker = None;
            tracing::debug!(chars = self.chars.len(), "Reveal complete");
        }
    }

    /// Stop revealing and discard progress
    ///
    /// After this returns no tick can fire until [`Self::restart`].
    pub fn cancel(&mut self) {
        self.ticker = None;
        self.revealed = 0;
        self.decoy = None;
    }

    /// Start over from an empty display with a fresh ticker
    pub fn restart(&mut self) {
        self.cancel();
        // Speed was validated when it was set
        self.ticker = Ticker::new(self.config.speed, self.config.delay).ok();
    }

    /// Replace the text and restart
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::EmptySource`] and leaves the reveal untouched
    /// when `source` is empty.
    pub fn set_source(&mut self, source: impl Into<String>) -> Result<(), AnimatorError> {
        let source = source.into();
        if source == self.source {
            return Ok(());
        }
        validate(&source, self.config)?;

        self.cancel();
        self.chars = source.chars().collect();
        self.source = source;
        self.restart();
        Ok(())
    }

    /// Change the tick period and restart
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ZeroPeriod`] for a zero `speed`.
    pub fn set_speed(&mut self, speed: Duration) -> Result<(), AnimatorError> {
        if speed == self.config.speed {
            return Ok(());
        }
        let config = RevealConfig { speed, ..self.config };
        validate(&self.source, config)?;

        self.config = config;
        self.restart();
        Ok(())
    }

    /// Change the start delay and restart
    pub fn set_delay(&mut self, delay: Duration) {
        if delay == self.config.delay {
            return;
        }
        self.config.delay = delay;
        self.restart();
    }

    /// Revealed prefix followed by the decoy, if any
    #[must_use]
    pub fn displayed(&self) -> String {
        let mut out: String = self.chars[..self.revealed].iter().collect();
        if let Some(decoy) = self.decoy {
            out.push(decoy);
        }
        out
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        if self.revealed >= self.chars.len() {
            RevealPhase::Complete
        } else {
            match &self.ticker {
                Some(ticker) if !ticker.is_waiting() => RevealPhase::Revealing,
                _ => RevealPhase::Idle,
            }
        }
    }

    /// Whether the whole source is visible
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == RevealPhase::Complete
    }

    /// Characters revealed so far
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Decoy currently shown at the frontier
    #[must_use]
    pub fn decoy(&self) -> Option<char> {
        self.decoy
    }

    /// The full text being revealed
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current timing
    #[must_use]
    pub fn config(&self) -> RevealConfig {
        self.config
    }

    /// Time until the next tick, `None` when nothing is pending
    #[must_use]
    pub fn time_to_next_tick(&self) -> Option<Duration> {
        self.ticker.as_ref().map(Ticker::time_to_next_tick)
    }
}

fn validate(source: &str, config: RevealConfig) -> Result<(), AnimatorError> {
    if source.is_empty() {
        return Err(AnimatorError::EmptySource);
    }
    if config.speed.is_zero() {
        return Err(AnimatorError::ZeroPeriod {
            what: "reveal speed",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn reveal(source: &str, speed: u64, delay: u64) -> RevealAnimator {
        RevealAnimator::new(
            source,
            RevealConfig {
                speed: ms(speed),
                delay: ms(delay),
            },
        )
        .unwrap()
        .with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_rejects_empty_source() {
        let result = RevealAnimator::new("", RevealConfig::default());
        assert_eq!(result.unwrap_err(), AnimatorError::EmptySource);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let config = RevealConfig {
            speed: Duration::ZERO,
            delay: Duration::ZERO,
        };
        assert!(matches!(
            RevealAnimator::new("abc", config),
            Err(AnimatorError::ZeroPeriod { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = RevealConfig::default();
        assert_eq!(config.speed, ms(8));
        assert_eq!(config.delay, ms(500));
    }

    #[test]
    fn test_reveal_abc() {
        let mut anim = reveal("abc", 50, 0);
        assert_eq!(anim.phase(), RevealPhase::Revealing);
        assert_eq!(anim.displayed(), "");

        assert!(anim.advance(ms(50)));
        assert_eq!(anim.revealed_count(), 1);
        let shown = anim.displayed();
        assert_eq!(shown.chars().count(), 2);
        assert!(shown.starts_with('a'));
        assert!(DECOY_ALPHABET.contains(shown.chars().nth(1).unwrap()));

        anim.advance(ms(50));
        assert_eq!(anim.revealed_count(), 2);
        assert!(anim.displayed().starts_with("ab"));

        anim.advance(ms(50));
        assert_eq!(anim.phase(), RevealPhase::Complete);
        assert_eq!(anim.displayed(), "abc");
        assert_eq!(anim.decoy(), None);
    }

    #[test]
    fn test_ticks_after_completion_discarded() {
        let mut anim = reveal("abc", 10, 0);
        assert!(anim.advance(ms(1_000)));
        assert!(anim.is_complete());
        assert_eq!(anim.revealed_count(), 3);

        assert!(!anim.advance(ms(1_000)));
        assert_eq!(anim.displayed(), "abc");
        assert_eq!(anim.time_to_next_tick(), None);
    }

    #[test]
    fn test_idle_during_delay() {
        let mut anim = reveal("hello", 10, 100);
        assert_eq!(anim.phase(), RevealPhase::Idle);

        assert!(!anim.advance(ms(90)));
        assert_eq!(anim.phase(), RevealPhase::Idle);

        anim.advance(ms(10));
        assert_eq!(anim.phase(), RevealPhase::Revealing);
        assert_eq!(anim.revealed_count(), 0);

        anim.advance(ms(10));
        assert_eq!(anim.revealed_count(), 1);
    }

    #[test]
    fn test_revealed_count_monotonic_and_bounded() {
        let mut anim = reveal("monotonic", 7, 3);
        let mut last = 0;
        for step in [1, 5, 13, 2, 40, 0, 9, 100] {
            anim.advance(ms(step));
            assert!(anim.revealed_count() >= last);
            assert!(anim.revealed_count() <= "monotonic".len());
            last = anim.revealed_count();
        }
        assert!(anim.is_complete());
    }

    #[test]
    fn test_multibyte_source() {
        let mut anim = reveal("héé", 5, 0);
        anim.advance(ms(10));
        assert!(anim.displayed().starts_with("hé"));
        anim.advance(ms(5));
        assert_eq!(anim.displayed(), "héé");
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut anim = reveal("abcdef", 10, 0);
        anim.advance(ms(20));
        anim.cancel();

        assert!(!anim.advance(ms(1_000)));
        assert_eq!(anim.revealed_count(), 0);
        assert_eq!(anim.displayed(), "");
        assert_eq!(anim.phase(), RevealPhase::Idle);
    }

    #[test]
    fn test_set_source_restarts() {
        let mut anim = reveal("abc", 10, 0);
        anim.advance(ms(20));

        anim.set_source("xyz!").unwrap();
        assert_eq!(anim.revealed_count(), 0);
        anim.advance(ms(10));
        assert!(anim.displayed().starts_with('x'));

        assert_eq!(anim.set_source(""), Err(AnimatorError::EmptySource));
        assert_eq!(anim.source(), "xyz!");
        assert_eq!(anim.revealed_count(), 1);
    }

    #[test]
    fn test_set_speed_and_delay_restart() {
        let mut anim = reveal("abcd", 10, 0);
        anim.advance(ms(20));

        anim.set_speed(ms(30)).unwrap();
        assert_eq!(anim.revealed_count(), 0);
        assert!(!anim.advance(ms(20)));
        assert!(anim.advance(ms(10)));

        anim.set_delay(ms(100));
        assert_eq!(anim.phase(), RevealPhase::Idle);
        assert!(anim.set_speed(Duration::ZERO).is_err());
        assert_eq!(anim.config().speed, ms(30));
    }

    #[test]
    fn test_same_settings_do_not_restart() {
        let mut anim = reveal("abcd", 10, 0);
        anim.advance(ms(20));
        anim.set_speed(ms(10)).unwrap();
        anim.set_delay(Duration::ZERO);
        anim.set_source("abcd").unwrap();
        assert_eq!(anim.revealed_count(), 2);
    }

    #[test]
    fn test_seeded_decoys_repeat() {
        let mut a = reveal("abcdefgh", 10, 0);
        let mut b = reveal("abcdefgh", 10, 0);
        for _ in 0..7 {
            a.advance(ms(10));
            b.advance(ms(10));
            assert_eq!(a.displayed(), b.displayed());
        }
    }
}
