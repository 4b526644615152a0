use crate::calc::{header_date_text, render_grid, Grid};
use crate::data::AppSettings;
use crate::state::{Clock, FocusTimer, Interval, NavigationState, Step, TimerEvent, ViewMode};
use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, info, trace};

use super::Tui;

// Focus button colors
const FOCUS_RUNNING: Color = Color::Rgb(0x60, 0xa5, 0xfa);
const FOCUS_IDLE: Color = Color::Rgb(0x88, 0x88, 0x88);

const TODAY_BG: Color = Color::Blue;

const MONTH_CELL_WIDTH: u16 = 4;
const WIDE_CELL_WIDTH: u16 = 7;
const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const ALERT_TEXT: &str = "Time's up!";
const MAX_POLL: StdDuration = StdDuration::from_millis(250);

/// Something on screen that reacts to a click or its key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Header,
    Title,
    Prev,
    Next,
    Cell(usize),
    FocusToggle,
    Decrease,
    Increase,
    Chevron,
    DismissAlert,
}

pub struct App {
    nav: NavigationState,
    timer: FocusTimer,
    clock: Box<dyn Clock>,
    /// Refreshes `now` once a second, independent of the focus timer's tick.
    clock_tick: Interval,
    now: NaiveDateTime,
    grid: Grid,
    /// Keyboard cursor into `grid.cells`.
    focus_index: usize,
    content_hidden: bool,
    nav_hidden: bool,
    /// Pending completion alert; swallows input until dismissed.
    alert: Option<String>,
    step_minutes: u32,
    /// Click targets recorded by the last render.
    hits: Vec<(Rect, Action)>,
}

impl App {
    pub fn new(settings: &AppSettings, clock: Box<dyn Clock>) -> Self {
        let now = clock.now();
        let nav = NavigationState::new(now.date());
        let grid = render_grid(&nav);
        let mut app = App {
            nav,
            timer: FocusTimer::new(settings.focus_minutes),
            clock,
            clock_tick: Interval::every_second(),
            now,
            grid,
            focus_index: 0,
            content_hidden: settings.start_collapsed,
            nav_hidden: settings.start_collapsed,
            alert: None,
            step_minutes: settings.step_minutes,
            hits: Vec::new(),
        };
        app.refocus();
        app
    }

    /// Arms the clock tick. The focus timer only runs once the user starts it.
    pub fn start(&mut self, now: Instant) {
        self.refresh_clock();
        self.clock_tick.start(now);
        info!(
            today = %self.nav.today(),
            focus_minutes = self.timer.configured_minutes(),
            "calendar started"
        );
    }

    /// Cancels both repeating ticks. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.timer.is_running() {
            debug!(remaining = self.timer.remaining_seconds(), "cancelling focus session");
        }
        self.clock_tick.cancel();
        self.timer.stop();
        info!("calendar stopped");
    }

    /// How long the event loop may wait for input before a tick is due.
    pub fn poll_timeout(&self, now: Instant) -> StdDuration {
        [
            self.clock_tick.time_until_due(now),
            self.timer.time_until_tick(now),
        ]
        .into_iter()
        .flatten()
        .fold(MAX_POLL, StdDuration::min)
    }

    pub fn header_text(&self) -> String {
        header_date_text(self.now.date())
    }

    pub fn title_text(&self) -> &str {
        &self.grid.title
    }

    pub fn time_indicator(&self) -> String {
        self.timer.display()
    }

    /// Chevron glyph; follows the content pane only.
    pub fn chevron(&self) -> &'static str {
        if self.content_hidden { "▲" } else { "▼" }
    }

    /// Flips the content pane and the nav bar together. The chevron is derived
    /// from the content pane alone.
    pub fn toggle_calendar_body(&mut self) {
        self.content_hidden = !self.content_hidden;
        self.nav_hidden = !self.nav_hidden;
        debug!(
            content_hidden = self.content_hidden,
            nav_hidden = self.nav_hidden,
            "calendar body toggled"
        );
    }

    fn refresh_clock(&mut self) {
        self.now = self.clock.now();
        let today = self.now.date();
        if today != self.nav.today() {
            debug!(%today, "date rolled over");
        }
        self.nav.refresh_today(today);
    }

    /// Recomputes the grid from navigation state, keeping the keyboard cursor
    /// in range.
    fn rerender(&mut self) {
        self.grid = render_grid(&self.nav);
        if self.focus_index >= self.grid.cells.len() {
            self.focus_index = self.grid.cells.len().saturating_sub(1);
        }
    }

    /// Puts the keyboard cursor on the selected cell, or the first in-period
    /// cell when nothing on this page is selected.
    fn refocus(&mut self) {
        self.focus_index = self
            .grid
            .selected_index()
            .or_else(|| self.grid.cells.iter().position(|c| !c.is_other_period))
            .unwrap_or(0);
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.grid.cells.len() as isize;
        let next = self.focus_index as isize + delta;
        if (0..len).contains(&next) {
            self.focus_index = next as usize;
        }
    }

    /// Runs one action, then re-renders header, title and grid.
    pub fn dispatch(&mut self, action: Action, now: Instant) {
        debug!(?action, "dispatch");
        match action {
            Action::Header => {
                self.refresh_clock();
                self.nav.activate_header(self.now.date());
            }
            Action::Title => self.nav.activate_title(),
            Action::Prev => self.nav.navigate(Step::Prev),
            Action::Next => self.nav.navigate(Step::Next),
            Action::Cell(index) => match self.grid.cells.get(index) {
                Some(cell) => {
                    let target = cell.target;
                    self.focus_index = index;
                    self.nav.activate(target);
                }
                None => return,
            },
            Action::FocusToggle => {
                self.timer.toggle(now);
                return;
            }
            Action::Decrease => {
                self.timer.adjust(-(self.step_minutes as i32));
                return;
            }
            Action::Increase => {
                self.timer.adjust(self.step_minutes as i32);
                return;
            }
            Action::Chevron => {
                self.toggle_calendar_body();
                return;
            }
            Action::DismissAlert => {
                self.alert = None;
                return;
            }
        }
        self.rerender();
        self.refocus();
    }

    /// Fires whatever ticks are due at `now`.
    pub fn on_tick(&mut self, now: Instant) {
        if self.clock_tick.poll(now) > 0 {
            self.refresh_clock();
            self.rerender();
        }
        for event in self.timer.poll(now) {
            match event {
                TimerEvent::Tick { remaining } => trace!(remaining, "focus tick"),
                TimerEvent::Completed => self.alert = Some(ALERT_TEXT.to_string()),
            }
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        if self.alert.is_some() {
            self.dispatch(Action::DismissAlert, now);
            return false;
        }
        let columns = self.grid.columns() as isize;
        match code {
            KeyCode::Left => self.move_focus(-1),
            KeyCode::Right => self.move_focus(1),
            KeyCode::Up => self.move_focus(-columns),
            KeyCode::Down => self.move_focus(columns),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if !self.content_hidden {
                    self.dispatch(Action::Cell(self.focus_index), now);
                }
            }
            KeyCode::Char('[') | KeyCode::Char('p') | KeyCode::PageUp => {
                self.dispatch(Action::Prev, now)
            }
            KeyCode::Char(']') | KeyCode::Char('n') | KeyCode::PageDown => {
                self.dispatch(Action::Next, now)
            }
            KeyCode::Char('v') => self.dispatch(Action::Title, now),
            KeyCode::Char('t') => self.dispatch(Action::Header, now),
            KeyCode::Char('f') => self.dispatch(Action::FocusToggle, now),
            KeyCode::Char('+') | KeyCode::Char('=') => self.dispatch(Action::Increase, now),
            KeyCode::Char('-') => self.dispatch(Action::Decrease, now),
            KeyCode::Char('c') => self.dispatch(Action::Chevron, now),
            KeyCode::Char('q') | KeyCode::Esc => return true,
            _ => {}
        }
        false
    }

    /// Left click at a terminal cell. Uses the hit regions of the last render.
    pub fn handle_click(&mut self, column: u16, row: u16, now: Instant) {
        if self.alert.is_some() {
            self.dispatch(Action::DismissAlert, now);
            return;
        }
        let hit = self
            .hits
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, action)| *action);
        if let Some(action) = hit {
            self.dispatch(action, now);
        }
    }

    fn hit(&mut self, x: u16, y: u16, width: u16, action: Action) {
        self.hits.push((Rect::new(x, y, width, 1), action));
    }

    pub fn render(&mut self, f: &mut Frame) {
        self.hits.clear();
        let area = f.area();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" focuscal ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let is_month = self.grid.view_mode == ViewMode::Month;
        let nav_height = if self.nav_hidden { 0 } else { 1 };
        let grid_height = if self.content_hidden {
            0
        } else {
            self.grid.rows() as u16 + u16::from(is_month)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // header date + chevron
                Constraint::Length(nav_height),  // title + arrows
                Constraint::Length(grid_height), // weekday header + cells
                Constraint::Length(1),           // spacer
                Constraint::Length(1),           // focus row
                Constraint::Length(1),           // spacer
                Constraint::Min(0),              // help
            ])
            .split(inner);

        self.render_header(f, chunks[0]);
        if !self.nav_hidden {
            self.render_nav(f, chunks[1]);
        }
        if !self.content_hidden {
            self.render_grid(f, chunks[2]);
        }
        self.render_focus_row(f, chunks[4]);
        render_help(f, chunks[6]);

        if let Some(msg) = self.alert.clone() {
            self.render_alert(f, area, &msg);
        }
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let text = self.header_text();
        let width = Line::from(text.as_str()).width() as u16;
        f.render_widget(
            Paragraph::new(Span::styled(
                text,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            area,
        );
        self.hit(area.x, area.y, width.min(area.width), Action::Header);

        if area.width >= 2 {
            let x = area.x + area.width - 2;
            f.render_widget(Paragraph::new(self.chevron()), Rect::new(x, area.y, 2, 1));
            self.hit(x, area.y, 2, Action::Chevron);
        }
    }

    fn render_nav(&mut self, f: &mut Frame, area: Rect) {
        let title = self.title_text().to_string();
        let width = Line::from(title.as_str()).width() as u16;
        f.render_widget(
            Paragraph::new(Span::styled(
                title,
                Style::default().add_modifier(Modifier::UNDERLINED),
            )),
            area,
        );
        self.hit(area.x, area.y, width.min(area.width), Action::Title);

        if area.width >= 6 {
            let prev_x = area.x + area.width - 6;
            let next_x = area.x + area.width - 3;
            f.render_widget(Paragraph::new(" ◀ "), Rect::new(prev_x, area.y, 3, 1));
            f.render_widget(Paragraph::new(" ▶ "), Rect::new(next_x, area.y, 3, 1));
            self.hit(prev_x, area.y, 3, Action::Prev);
            self.hit(next_x, area.y, 3, Action::Next);
        }
    }

    fn render_grid(&mut self, f: &mut Frame, area: Rect) {
        let is_month = self.grid.view_mode == ViewMode::Month;
        let cell_width = if is_month {
            MONTH_CELL_WIDTH
        } else {
            WIDE_CELL_WIDTH
        };
        let columns = self.grid.columns();

        let mut lines: Vec<Line> = Vec::new();
        if is_month {
            let header: String = WEEKDAY_HEADER
                .iter()
                .map(|d| format!("{:>3} ", d))
                .collect();
            lines.push(Line::from(Span::styled(
                header,
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        let first_row_y = area.y + u16::from(is_month);

        let mut hits = Vec::with_capacity(self.grid.cells.len());
        for (row, chunk) in self.grid.cells.chunks(columns).enumerate() {
            let mut spans = Vec::with_capacity(columns * 2);
            for (col, cell) in chunk.iter().enumerate() {
                let index = row * columns + col;
                let text = if is_month {
                    format!("{:>3}", cell.label)
                } else {
                    format!("{:^6}", cell.label)
                };
                let style = cell_style(
                    cell.is_selected,
                    cell.is_today,
                    cell.is_other_period,
                    index == self.focus_index,
                );
                spans.push(Span::styled(text, style));
                spans.push(Span::raw(" "));
                hits.push((
                    area.x + col as u16 * cell_width,
                    first_row_y + row as u16,
                    Action::Cell(index),
                ));
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), area);
        for (x, y, action) in hits {
            if y < area.y + area.height {
                self.hit(x, y, cell_width - 1, action);
            }
        }
    }

    fn render_focus_row(&mut self, f: &mut Frame, area: Rect) {
        let running = self.timer.is_running();
        let indicator = format!(" {:^9} ", self.time_indicator());
        let indicator_width = Line::from(indicator.as_str()).width() as u16;
        let button = self.timer.button_label();
        let button_color = if running { FOCUS_RUNNING } else { FOCUS_IDLE };
        let adjust_style = if running {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        let line = Line::from(vec![
            Span::styled("[-]", adjust_style),
            Span::raw(indicator),
            Span::styled("[+]", adjust_style),
            Span::raw("   "),
            Span::styled(
                button,
                Style::default()
                    .fg(button_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);

        let plus_x = area.x + 3 + indicator_width;
        let button_x = plus_x + 3 + 3;
        let button_width = Line::from(button).width() as u16;
        self.hit(area.x, area.y, 3, Action::Decrease);
        self.hit(plus_x, area.y, 3, Action::Increase);
        self.hit(button_x, area.y, button_width, Action::FocusToggle);
    }

    fn render_alert(&mut self, f: &mut Frame, area: Rect, msg: &str) {
        let popup = centered_rect(30, 5, area);
        f.render_widget(Clear, popup);
        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                msg.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "press any key",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Focus ")
                .border_style(Style::default().fg(FOCUS_RUNNING)),
        );
        f.render_widget(body, popup);
        self.hits.clear();
        self.hits.push((area, Action::DismissAlert));
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let key_rows: Vec<Row> = vec![
        Row::new(vec!["← → ↑ ↓", "Move", "Enter", "Pick cell"]),
        Row::new(vec!["[ / ]", "Prev / next", "v", "Zoom out"]),
        Row::new(vec!["t", "Today", "c", "Collapse"]),
        Row::new(vec!["f", "Focus / stop", "- / +", "Duration"]),
        Row::new(vec!["q / Esc", "Quit", "Ctrl+C", "Quit"]),
    ];
    let help_table = Table::new(
        key_rows,
        [
            Constraint::Length(9),
            Constraint::Length(13),
            Constraint::Length(6),
            Constraint::Length(10),
        ],
    )
    .style(Style::default().fg(Color::DarkGray))
    .column_spacing(1);
    f.render_widget(help_table, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Style for a grid cell. Selection wins over today; the keyboard cursor is
/// layered on top as an underline.
pub(crate) fn cell_style(
    is_selected: bool,
    is_today: bool,
    is_other_period: bool,
    is_focused: bool,
) -> Style {
    let style = if is_selected {
        let bg = if is_today { TODAY_BG } else { Color::White };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else if is_today {
        Style::default()
            .fg(TODAY_BG)
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if is_other_period {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };
    if is_focused {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    app.start(Instant::now());
    let result = event_loop(terminal, app);
    app.stop();
    result
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers, Instant::now()) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    app.handle_click(mouse.column, mouse.row, Instant::now());
                }
                _ => {}
            }
        }
        app.on_tick(Instant::now());
    }
    Ok(())
}
