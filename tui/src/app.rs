//! Main Application
//!
//! The App struct manages the TUI lifecycle for one report:
//! - Event loop (keyboard, mouse, resize)
//! - SummaryPresenter for bullets and the revealed paragraph
//! - PointerBus + PointerFieldAnimator for the pointer field pane
//!
//! Mouse movement is published on the bus; the field animator pumps its
//! subscription once per frame, after the presenter advances.

use std::io;
use std::time::{Duration, Instant};

use brief_core::{
    grid_centers, BriefConfig, ParsedSummary, PointerBus, PointerField, PointerFieldAnimator,
    SummaryPresenter,
};
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, StatefulWidget, Widget};
use ratatui::Terminal;

use crate::theme::{self, DIM_GRAY};
use crate::widgets::{
    field_bounds, item_at_row, to_field_point, BulletList, FieldView, SegmentBlock,
    SegmentBlockState,
};

/// Target frame period for terminal animations
const FRAME: Duration = Duration::from_millis(60);

/// Shortest wait while the paragraph is revealing
const MIN_FRAME: Duration = Duration::from_millis(16);

/// Widest the pointer field pane gets
const FIELD_MAX_WIDTH: u16 = 36;

const HINTS: &str = " q quit · r replay · ↑/↓ select · PgUp/PgDn scroll ";

/// Screen regions, recomputed on resize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppLayout {
    /// Bullet pane including its border
    pub bullets: Rect,
    /// Paragraph pane including its border
    pub paragraph: Rect,
    /// Pointer field pane including its border
    pub field: Rect,
    /// Bottom status line
    pub status: Rect,
}

impl AppLayout {
    /// Split the terminal area for a report with `item_count` bullets
    #[must_use]
    pub fn compute(area: Rect, item_count: usize) -> Self {
        let [body, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let field_width = (body.width / 3).min(FIELD_MAX_WIDTH);
        let [main, field] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(field_width)]).areas(body);

        let bullet_rows = u16::try_from(item_count).unwrap_or(u16::MAX).saturating_add(2);
        let [bullets, paragraph] = Layout::vertical([
            Constraint::Length(bullet_rows.min(main.height / 2).max(3)),
            Constraint::Min(3),
        ])
        .areas(main);

        Self {
            bullets,
            paragraph,
            field,
            status,
        }
    }
}

/// Inner area of a bordered pane
fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Report ===
    /// Animated view of the parsed report
    presenter: SummaryPresenter,
    /// Paragraph scroll state
    paragraph_state: SegmentBlockState,

    // === Pointer Field ===
    /// Shared source of pointer samples
    bus: PointerBus,
    /// Field pane animator, subscribed to `bus`
    field: PointerFieldAnimator,
    /// Grid dimensions for relayout
    grid: (usize, usize),

    // === Misc State ===
    /// Screen regions
    layout: AppLayout,
    /// Last frame time (for animations)
    last_frame: Instant,
}

impl App {
    /// Create an App sized to the current terminal
    ///
    /// # Errors
    ///
    /// Fails if the terminal size cannot be read or the configuration
    /// cannot drive the animators.
    pub fn new(
        summary: &ParsedSummary,
        config: &BriefConfig,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Self::with_size(summary, config, seed, Rect::new(0, 0, width, height))
    }

    /// Create an App for a known screen area
    ///
    /// # Errors
    ///
    /// Fails if the configuration cannot drive the animators.
    pub fn with_size(
        summary: &ParsedSummary,
        config: &BriefConfig,
        seed: Option<u64>,
        area: Rect,
    ) -> anyhow::Result<Self> {
        let mut presenter = SummaryPresenter::new(summary, config)?;
        if let Some(seed) = seed {
            presenter = presenter.with_seed(seed);
        }

        let layout = AppLayout::compute(area, presenter.item_count());
        let bounds = field_bounds(inner(layout.field));
        let field = PointerField::grid(
            config.field_rows,
            config.field_columns,
            bounds,
            config.field_base_angle,
        )?;

        let bus = PointerBus::new();
        let mut field = PointerFieldAnimator::new(field);
        field.attach(&bus);

        tracing::info!(
            items = presenter.item_count(),
            width = area.width,
            height = area.height,
            "App ready"
        );

        Ok(Self {
            running: true,
            presenter,
            paragraph_state: SegmentBlockState::default(),
            bus,
            field,
            grid: (config.field_rows, config.field_columns),
            layout,
            last_frame: Instant::now(),
        })
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Fails if drawing to the terminal fails.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;
        self.last_frame = Instant::now();

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                // Frame tick
                () = tokio::time::sleep(self.frame_wait()) => {}
            }

            self.update();
            self.render(terminal)?;
        }

        Ok(())
    }

    /// How long to wait for input before the next frame
    ///
    /// Wakes for the next reveal tick when one is due sooner than a
    /// regular frame.
    #[must_use]
    pub fn frame_wait(&self) -> Duration {
        self.presenter
            .reveal()
            .and_then(|reveal| reveal.time_to_next_tick())
            .map_or(FRAME, |due| due.clamp(MIN_FRAME, FRAME))
    }

    /// Whether the event loop should keep going
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Presentation state, for inspection
    #[must_use]
    pub fn presenter(&self) -> &SummaryPresenter {
        &self.presenter
    }

    /// Pointer field animator, for inspection
    #[must_use]
    pub fn field(&self) -> &PointerFieldAnimator {
        &self.field
    }

    /// Dispatch one terminal event
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Resize(w, h) => self.handle_resize(*w, *h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('r') => {
                self.presenter.replay();
                self.paragraph_state.scroll_to_top();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.presenter.hover_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.presenter.hover_previous();
            }
            KeyCode::PageDown => self.paragraph_state.scroll(3),
            KeyCode::PageUp => self.paragraph_state.scroll(-3),
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.bus.publish(to_field_point(mouse.column, mouse.row));
                let hovered = item_at_row(
                    inner(self.layout.bullets),
                    self.presenter.item_count(),
                    mouse.column,
                    mouse.row,
                );
                self.presenter.set_hovered(hovered);
            }
            MouseEventKind::ScrollDown => self.paragraph_state.scroll(1),
            MouseEventKind::ScrollUp => self.paragraph_state.scroll(-1),
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.layout = AppLayout::compute(area, self.presenter.item_count());

        let bounds = field_bounds(inner(self.layout.field));
        let (rows, columns) = self.grid;
        if let Err(e) = self
            .field
            .field_mut()
            .relayout(grid_centers(rows, columns, bounds), bounds)
        {
            tracing::warn!(error = %e, "Pointer field relayout rejected");
        }
    }

    /// Update animations and state
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.advance(delta);
    }

    /// Advance everything by `elapsed`
    pub fn advance(&mut self, elapsed: Duration) {
        self.presenter.advance(elapsed);
        self.field.pump();
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            self.render_into(area, frame.buffer_mut());
        })?;
        Ok(())
    }

    /// Draw every pane into `buf`
    pub fn render_into(&mut self, area: Rect, buf: &mut Buffer) {
        if AppLayout::compute(area, self.presenter.item_count()) != self.layout {
            self.handle_resize(area.width, area.height);
        }
        let layout = self.layout;

        // Bullets
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(" Bullet Point Summary ");
        let items_area = block.inner(layout.bullets);
        block.render(layout.bullets, buf);
        let views = self.presenter.item_views();
        BulletList::new(&views).render(items_area, buf);

        // Paragraph
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(" Paragraph Summary ");
        let text_area = block.inner(layout.paragraph);
        block.render(layout.paragraph, buf);
        let segments = self.presenter.paragraph_segments();
        SegmentBlock::new(&segments)
            .style(theme::text_style())
            .emphasis(theme::emphasis_style())
            .render(text_area, buf, &mut self.paragraph_state);

        // Pointer field
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style());
        let field_area = block.inner(layout.field);
        block.render(layout.field, buf);
        FieldView::new(self.field.field()).render(field_area, buf);

        // Status
        buf.set_stringn(
            layout.status.x,
            layout.status.y,
            HINTS,
            usize::from(layout.status.width),
            Style::default().fg(DIM_GRAY),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::parse;
    use crossterm::event::{KeyEventState, MouseButton};

    const REPORT: &str = "## Bullet Point Summary\n- Risk: High severity found\n- Category2\n## Paragraph Summary\nThis host has critical vulnerabilities\n\nPlease patch now";

    fn app() -> App {
        let mut config = BriefConfig::default();
        config.reveal.delay = Duration::ZERO;
        App::with_size(&parse(REPORT), &config, Some(5), Rect::new(0, 0, 100, 30)).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| {
                (area.x..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_frame_wait_follows_reveal() {
        let mut app = app();
        assert_eq!(app.frame_wait(), MIN_FRAME);

        app.advance(Duration::from_secs(10));
        assert!(app.presenter().is_settled());
        assert_eq!(app.frame_wait(), FRAME);
    }

    #[test]
    fn test_frame_wait_during_start_delay() {
        let app = App::with_size(
            &parse(REPORT),
            &BriefConfig::default(),
            Some(5),
            Rect::new(0, 0, 100, 30),
        )
        .unwrap();
        assert_eq!(app.frame_wait(), FRAME);
    }

    #[test]
    fn test_layout_fits_area() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::compute(area, 2);

        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.bullets.height, 4);
        assert!(layout.field.width <= FIELD_MAX_WIDTH);
        assert_eq!(layout.bullets.width + layout.field.width, 100);
        assert_eq!(layout.paragraph.bottom(), layout.status.y);
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = app();
            app.handle_event(&event);
            assert!(!app.is_running());
        }
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        release.state = KeyEventState::NONE;
        app.handle_event(&Event::Key(release));
        assert!(app.is_running());
    }

    #[test]
    fn test_arrow_keys_move_hover() {
        let mut app = app();
        app.handle_event(&key(KeyCode::Down));
        assert_eq!(app.presenter().hovered(), Some(0));
        app.handle_event(&key(KeyCode::Up));
        assert_eq!(app.presenter().hovered(), Some(1));
    }

    #[test]
    fn test_mouse_row_hovers_item() {
        let mut app = app();
        let items = inner(app.layout.bullets);

        app.handle_event(&mouse(MouseEventKind::Moved, items.x + 2, items.y + 1));
        assert_eq!(app.presenter().hovered(), Some(1));

        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), items.x, items.y + 20));
        assert_eq!(app.presenter().hovered(), None);
    }

    #[test]
    fn test_mouse_moves_reach_field() {
        let mut app = app();
        let field = inner(app.layout.field);
        let (column, row) = (field.x + 1, field.y + 1);

        app.handle_event(&mouse(MouseEventKind::Moved, column, row));
        app.advance(Duration::ZERO);

        assert_eq!(
            app.field().field().last_sample(),
            Some(to_field_point(column, row))
        );
    }

    #[test]
    fn test_replay_restarts_paragraph() {
        let mut app = app();
        app.advance(Duration::from_secs(2));
        assert!(app.presenter().is_settled());

        app.handle_event(&key(KeyCode::Char('r')));
        assert_eq!(app.presenter().paragraph_text(), "");
    }

    #[test]
    fn test_render_shows_report() {
        let mut app = app();
        app.advance(Duration::from_secs(2));

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render_into(area, &mut buf);
        let text = screen_text(&buf);

        assert!(text.contains("Bullet Point Summary"));
        assert!(text.contains("Risk: High severity found"));
        assert!(text.contains("Category2:"));
        assert!(text.contains("critical vulnerabilities"));
        assert!(text.contains("Please patch now."));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_render_follows_resize() {
        let mut app = app();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        app.render_into(area, &mut buf);

        assert_eq!(app.layout, AppLayout::compute(area, 2));
        let bounds = field_bounds(inner(app.layout.field));
        assert_eq!(app.field().field().bounds(), bounds);
    }
}
