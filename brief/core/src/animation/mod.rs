//! Animation System - Progressive Text Effects
//!
//! State machines that present text progressively instead of all at once.
//! None of them read a clock: the owner feeds elapsed time through
//! `advance(elapsed)` and a [`Ticker`] turns it into discrete, ordered ticks.
//!
//! # Effects
//!
//! - [`RevealAnimator`]: reveals a fixed string one character per tick, with a
//!   random decoy character at the frontier until the text is complete
//! - [`ScrambleAnimator`]: while active, replaces the text with same-length
//!   filler on every tick and snaps back to the source when deactivated
//!
//! # Cancellation
//!
//! Every animator keeps its tick source in an `Option<Ticker>`. Cancelling
//! takes the ticker out and drops it, so once a cancel call returns there is
//! no tick source left that could fire. A restart always builds a fresh
//! ticker after the old one is gone.

mod reveal;
mod scramble;
mod ticker;

pub use reveal::{RevealAnimator, RevealConfig, RevealPhase};
pub use scramble::{ScrambleAnimator, ScrambleConfig};
pub use ticker::Ticker;

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

/// Characters sampled for the reveal frontier decoy
pub const DECOY_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Characters used for scramble filler
pub const SCRAMBLE_ALPHABET: &str = ".:";

// =============================================================================
// Error Types
// =============================================================================

/// Invalid animator configuration, reported at construction time
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnimatorError {
    /// A reveal needs something to reveal
    #[error("Reveal source text is empty")]
    EmptySource,

    /// A periodic tick source cannot have a zero period
    #[error("{what} must be greater than zero")]
    ZeroPeriod {
        /// Which setting was zero
        what: &'static str,
    },

    /// Pointer field geometry or baseline is unusable
    #[error("Invalid pointer field: {0}")]
    InvalidField(String),
}

/// Pick one character uniformly from an ASCII alphabet
fn sample_char(alphabet: &str, rng: &mut StdRng) -> char {
    let bytes = alphabet.as_bytes();
    char::from(bytes[rng.gen_range(0..bytes.len())])
}
