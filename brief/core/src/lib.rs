//! Brief Core - Headless Report Digest and Text Effects
//!
//! This crate turns a semi-structured, AI-generated security report into
//! structured data and drives the progressive effects used to present it.
//! It is completely independent of any UI framework: a terminal surface,
//! a web surface, or a test harness can consume it the same way.
//!
//! # Architecture
//!
//! ```text
//!  raw report ──► normalize ──► parse ──► ParsedSummary
//!                                            │
//!                     ┌──────────────────────┼─────────────────────┐
//!                     ▼                      ▼                     ▼
//!               Highlighter           RevealAnimator      ScrambleAnimator (×N)
//!            (emphasis segments)     (paragraph text)     (bullet categories)
//!                     └──────────────────────┬─────────────────────┘
//!                                            ▼
//!                                    SummaryPresenter ──► surface renders
//!
//!  pointer events ──► PointerBus ──► PointerFieldAnimator (one per field)
//! ```
//!
//! # Module Overview
//!
//! - [`highlight`]: Single-pass, whole-word vocabulary emphasis
//! - [`summary`]: Report parsing into bullet items and a paragraph
//! - [`animation`]: Tick source plus reveal and scramble state machines
//! - [`pointer`]: Pointer-reactive rotation field and sample fan-out
//! - [`presenter`]: Per-report display model wiring everything together
//! - [`config`]: Layered TOML / environment configuration
//!
//! # No Surface Dependencies
//!
//! Nothing here renders, sleeps, or reads a clock. Time is injected by the
//! caller through `advance(elapsed)`, which keeps every state machine
//! deterministic under test.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod config;
pub mod highlight;
pub mod pointer;
pub mod presenter;
pub mod summary;

// Re-exports for convenience
pub use animation::{
    AnimatorError, RevealAnimator, RevealConfig, RevealPhase, ScrambleAnimator, ScrambleConfig,
    Ticker,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, BriefConfig, BriefToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
pub use highlight::{highlight, EmphasisSegment, Highlighter, Vocabulary};
pub use pointer::{
    angle_toward, grid_centers, Bounds, FieldCell, Point, PointerBus, PointerField,
    PointerFieldAnimator, PointerSubscription, SubscriptionId,
};
pub use presenter::{ItemView, SummaryPresenter};
pub use summary::{
    normalize_sub_bullets, parse, parse_normalized, BulletItem, ParagraphBlock, ParsedSummary,
    PARAGRAPH_BREAK,
};
