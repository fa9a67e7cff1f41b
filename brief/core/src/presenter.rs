//! Summary Presentation State
//!
//! Owns every animator for one parsed report and the hovered index that
//! drives the bullet scrambles. A surface only has to:
//!
//! 1. forward hover changes with [`SummaryPresenter::set_hovered`]
//! 2. call [`SummaryPresenter::advance`] with elapsed time each frame
//! 3. draw [`SummaryPresenter::item_views`] and
//!    [`SummaryPresenter::paragraph_segments`]

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{AnimatorError, RevealAnimator, ScrambleAnimator};
use crate::config::BriefConfig;
use crate::highlight::{EmphasisSegment, Highlighter};
use crate::summary::ParsedSummary;

/// What to draw for one bullet item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView {
    /// Displayed `"{category}:"`, possibly scrambled
    pub category: Vec<EmphasisSegment>,
    /// Displayed description; empty when the item has none
    pub description: Vec<EmphasisSegment>,
    /// Whether this item is the hovered one
    pub hovered: bool,
}

#[derive(Debug)]
struct ItemAnimators {
    category: ScrambleAnimator,
    description: Option<ScrambleAnimator>,
}

impl ItemAnimators {
    fn follow(&mut self, index: usize, hovered: Option<usize>) -> bool {
        let mut changed = self.category.follow(index, hovered);
        if let Some(description) = &mut self.description {
            changed |= description.follow(index, hovered);
        }
        changed
    }

    fn advance(&mut self, elapsed: Duration) -> bool {
        let mut changed = self.category.advance(elapsed);
        if let Some(description) = &mut self.description {
            changed |= description.advance(elapsed);
        }
        changed
    }

    fn is_active(&self) -> bool {
        self.category.is_active()
    }
}

/// Animated view of a parsed report
#[derive(Debug)]
pub struct SummaryPresenter {
    highlighter: Highlighter,
    paragraph: Option<RevealAnimator>,
    items: Vec<ItemAnimators>,
    hovered: Option<usize>,
}

impl SummaryPresenter {
    /// Build animators for every part of `summary`
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ZeroPeriod`] if a configured speed is zero.
    pub fn new(summary: &ParsedSummary, config: &BriefConfig) -> Result<Self, AnimatorError> {
        let paragraph = if summary.paragraph.is_empty() {
            None
        } else {
            Some(RevealAnimator::new(summary.paragraph.clone(), config.reveal)?)
        };

        let items = summary
            .bullet_items
            .iter()
            .map(|item| {
                let category =
                    ScrambleAnimator::new(format!("{}:", item.category), config.category_scramble)?;
                let description = if item.has_description() {
                    Some(ScrambleAnimator::new(
                        item.description.clone(),
                        config.description_scramble,
                    )?)
                } else {
                    None
                };
                Ok(ItemAnimators {
                    category,
                    description,
                })
            })
            .collect::<Result<Vec<_>, AnimatorError>>()?;

        tracing::debug!(
            items = items.len(),
            has_paragraph = paragraph.is_some(),
            "Presenter ready"
        );

        Ok(Self {
            highlighter: Highlighter::new(&config.vocabulary),
            paragraph,
            items,
            hovered: None,
        })
    }

    /// Make every random choice reproducible from `seed`
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        let mut master = StdRng::seed_from_u64(seed);

        self.paragraph = self
            .paragraph
            .map(|reveal| reveal.with_rng(StdRng::seed_from_u64(master.gen())));

        self.items = self
            .items
            .into_iter()
            .map(|item| ItemAnimators {
                category: item.category.with_rng(StdRng::seed_from_u64(master.gen())),
                description: item
                    .description
                    .map(|d| d.with_rng(StdRng::seed_from_u64(master.gen()))),
            })
            .collect();

        self
    }

    /// Change the hovered item; out-of-range indices clear the hover
    ///
    /// Returns true if any item changed state.
    pub fn set_hovered(&mut self, hovered: Option<usize>) -> bool {
        let hovered = hovered.filter(|&i| i < self.items.len());
        self.hovered = hovered;

        let mut changed = false;
        for (index, item) in self.items.iter_mut().enumerate() {
            changed |= item.follow(index, hovered);
        }
        changed
    }

    /// Move the hover down one item, wrapping around
    pub fn hover_next(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let next = self.hovered.map_or(0, |i| (i + 1) % self.items.len());
        self.set_hovered(Some(next))
    }

    /// Move the hover up one item, wrapping around
    pub fn hover_previous(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() - 1;
        let previous = self.hovered.map_or(last, |i| if i == 0 { last } else { i - 1 });
        self.set_hovered(Some(previous))
    }

    /// Currently hovered item
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Advance every animator; returns true when anything visible changed
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let mut changed = false;
        if let Some(reveal) = &mut self.paragraph {
            changed |= reveal.advance(elapsed);
        }
        for item in &mut self.items {
            changed |= item.advance(elapsed);
        }
        changed
    }

    /// Restart the paragraph reveal from the beginning
    pub fn replay(&mut self) {
        if let Some(reveal) = &mut self.paragraph {
            reveal.restart();
            tracing::debug!("Paragraph reveal restarted");
        }
    }

    /// Paragraph text as currently displayed
    #[must_use]
    pub fn paragraph_text(&self) -> String {
        self.paragraph
            .as_ref()
            .map(RevealAnimator::displayed)
            .unwrap_or_default()
    }

    /// Emphasis segments of the currently displayed paragraph
    #[must_use]
    pub fn paragraph_segments(&self) -> Vec<EmphasisSegment> {
        self.highlighter.highlight(&self.paragraph_text())
    }

    /// The paragraph reveal, if the report has a paragraph
    #[must_use]
    pub fn reveal(&self) -> Option<&RevealAnimator> {
        self.paragraph.as_ref()
    }

    /// Number of bullet items
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// View of one bullet item
    #[must_use]
    pub fn item_view(&self, index: usize) -> Option<ItemView> {
        let item = self.items.get(index)?;
        Some(ItemView {
            category: self.highlighter.highlight(item.category.displayed()),
            description: item
                .description
                .as_ref()
                .map(|d| self.highlighter.highlight(d.displayed()))
                .unwrap_or_default(),
            hovered: self.hovered == Some(index),
        })
    }

    /// Views of every bullet item in order
    #[must_use]
    pub fn item_views(&self) -> Vec<ItemView> {
        (0..self.items.len())
            .filter_map(|i| self.item_view(i))
            .collect()
    }

    /// True once the reveal finished and nothing is scrambling
    #[must_use]
    pub fn is_settled(&self) -> bool {
        let revealed = match &self.paragraph {
            Some(reveal) => reveal.is_complete(),
            None => true,
        };
        revealed && !self.items.iter().any(ItemAnimators::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::parse;

    const REPORT: &str = "## Bullet Point Summary\n- Risk: High severity found\n- Category2\n## Paragraph Summary\nThis host has critical vulnerabilities\n\nPlease patch now";

    fn fast_config() -> BriefConfig {
        let mut config = BriefConfig::default();
        config.reveal.speed = Duration::from_millis(1);
        config.reveal.delay = Duration::ZERO;
        config
    }

    fn presenter() -> SummaryPresenter {
        SummaryPresenter::new(&parse(REPORT), &fast_config())
            .unwrap()
            .with_seed(3)
    }

    fn text(segments: &[EmphasisSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_items_show_source_at_rest() {
        let p = presenter();
        let views = p.item_views();

        assert_eq!(views.len(), 2);
        assert_eq!(text(&views[0].category), "Risk:");
        assert_eq!(text(&views[0].description), "High severity found");
        assert_eq!(text(&views[1].category), "Category2:");
        assert!(views[1].description.is_empty());
        assert!(views.iter().all(|v| !v.hovered));
    }

    #[test]
    fn test_item_text_is_highlighted() {
        let p = presenter();
        let view = p.item_view(0).unwrap();
        assert!(view.category.iter().any(|s| s.emphasized && s.text == "Risk"));
        assert!(view.description.iter().any(|s| s.emphasized && s.text == "High"));
    }

    #[test]
    fn test_hover_is_exclusive() {
        let mut p = presenter();
        assert!(p.set_hovered(Some(0)));
        p.advance(Duration::from_millis(120));

        let views = p.item_views();
        assert!(views[0].hovered);
        assert_ne!(text(&views[0].category), "Risk:");
        assert_eq!(text(&views[1].category), "Category2:");

        p.set_hovered(Some(1));
        let views = p.item_views();
        assert_eq!(text(&views[0].category), "Risk:");
        assert!(views[1].hovered);
    }

    #[test]
    fn test_out_of_range_hover_clears() {
        let mut p = presenter();
        p.set_hovered(Some(1));
        p.set_hovered(Some(9));
        assert_eq!(p.hovered(), None);
    }

    #[test]
    fn test_keyboard_hover_wraps() {
        let mut p = presenter();
        p.hover_next();
        assert_eq!(p.hovered(), Some(0));
        p.hover_next();
        p.hover_next();
        assert_eq!(p.hovered(), Some(0));
        p.hover_previous();
        assert_eq!(p.hovered(), Some(1));
    }

    #[test]
    fn test_paragraph_reveals_then_highlights() {
        let mut p = presenter();
        assert_eq!(p.paragraph_text(), "");
        assert!(!p.is_settled());

        p.advance(Duration::from_secs(1));
        assert!(p.is_settled());

        let segments = p.paragraph_segments();
        assert_eq!(
            text(&segments),
            "This host has critical vulnerabilities\n\nPlease patch now."
        );
        let emphasized: Vec<&str> = segments
            .iter()
            .filter(|s| s.emphasized)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(emphasized, vec!["critical", "vulnerabilities", "patch"]);
    }

    #[test]
    fn test_replay_restarts_reveal() {
        let mut p = presenter();
        p.advance(Duration::from_secs(1));
        p.replay();
        assert_eq!(p.paragraph_text(), "");
        assert!(!p.is_settled());
    }

    #[test]
    fn test_hover_keeps_presenter_unsettled() {
        let mut p = presenter();
        p.advance(Duration::from_secs(1));
        p.set_hovered(Some(0));
        assert!(!p.is_settled());
        p.set_hovered(None);
        assert!(p.is_settled());
    }

    #[test]
    fn test_empty_summary() {
        let p = SummaryPresenter::new(&ParsedSummary::default(), &BriefConfig::default()).unwrap();
        assert_eq!(p.item_count(), 0);
        assert!(p.reveal().is_none());
        assert_eq!(p.paragraph_segments(), vec![EmphasisSegment::plain("")]);
        assert!(p.is_settled());
    }

    #[test]
    fn test_seed_makes_scramble_reproducible() {
        let mut a = presenter();
        let mut b = presenter();
        a.set_hovered(Some(0));
        b.set_hovered(Some(0));
        for _ in 0..5 {
            a.advance(Duration::from_millis(100));
            b.advance(Duration::from_millis(100));
            assert_eq!(a.item_views(), b.item_views());
        }
    }
}
