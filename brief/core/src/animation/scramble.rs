//! Hover Scramble
//!
//! While active, the displayed text is replaced on every tick by filler of
//! the same length. Deactivating restores the source immediately.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{sample_char, AnimatorError, Ticker, SCRAMBLE_ALPHABET};

/// Scramble timing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrambleConfig {
    /// Time between regenerations
    pub speed: Duration,
    /// Wait after activation before the first regeneration
    pub delay: Duration,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(100),
            delay: Duration::ZERO,
        }
    }
}

/// Scrambles a string while it is active
#[derive(Debug)]
pub struct ScrambleAnimator {
    source: String,
    len: usize,
    displayed: String,
    config: ScrambleConfig,
    active: bool,
    /// Present exactly while active
    ticker: Option<Ticker>,
    rng: StdRng,
}

impl ScrambleAnimator {
    /// Create an inactive scramble showing `source`
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ZeroPeriod`] for a zero `config.speed`.
    pub fn new(source: impl Into<String>, config: ScrambleConfig) -> Result<Self, AnimatorError> {
        validate(config)?;
        let source = source.into();

        Ok(Self {
            len: source.chars().count(),
            displayed: source.clone(),
            source,
            config,
            active: false,
            ticker: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Use a specific random source for filler
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Switch scrambling on or off; returns true on an edge
    pub fn set_active(&mut self, active: bool) -> bool {
        if active == self.active {
            return false;
        }

        self.active = active;
        if active {
            self.start();
            tracing::debug!(source = %self.source, "Scramble activated");
        } else {
            self.stop();
        }
        true
    }

    /// Activate when `active_index` names this item, deactivate otherwise
    pub fn follow(&mut self, own_index: usize, active_index: Option<usize>) -> bool {
        self.set_active(active_index == Some(own_index))
    }

    /// Feed elapsed time; returns true when the displayed text changed
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let due = match self.ticker.as_mut() {
            Some(ticker) => ticker.advance(elapsed),
            None => return false,
        };

        for _ in 0..due {
            self.regenerate();
        }
        due > 0
    }

    fn regenerate(&mut self) {
        let rng = &mut self.rng;
        self.displayed = (0..self.len)
            .map(|_| sample_char(SCRAMBLE_ALPHABET, rng))
            .collect();
    }

    fn start(&mut self) {
        // Speed was validated when it was set
        self.ticker = Ticker::new(self.config.speed, self.config.delay).ok();
    }

    fn stop(&mut self) {
        self.ticker = None;
        self.displayed.clone_from(&self.source);
    }

    /// Stop, restore the source, and start again if active
    fn reset(&mut self) {
        self.stop();
        if self.active {
            self.start();
        }
    }

    /// Replace the text
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source == self.source {
            return;
        }
        self.len = source.chars().count();
        self.source = source;
        self.reset();
    }

    /// Change the tick period
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ZeroPeriod`] for a zero `speed`.
    pub fn set_speed(&mut self, speed: Duration) -> Result<(), AnimatorError> {
        if speed == self.config.speed {
            return Ok(());
        }
        let config = ScrambleConfig { speed, ..self.config };
        validate(config)?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Change the activation delay
    pub fn set_delay(&mut self, delay: Duration) {
        if delay == self.config.delay {
            return;
        }
        self.config.delay = delay;
        self.reset();
    }

    /// Text to show right now
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// The unscrambled text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether scrambling is switched on
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the display currently differs from the source
    #[must_use]
    pub fn is_scrambled(&self) -> bool {
        self.displayed != self.source
    }

    /// Current timing
    #[must_use]
    pub fn config(&self) -> ScrambleConfig {
        self.config
    }
}

fn validate(config: ScrambleConfig) -> Result<(), AnimatorError> {
    if config.speed.is_zero() {
        return Err(AnimatorError::ZeroPeriod {
            what: "scramble speed",
        });
    }
    Ok(())
}
