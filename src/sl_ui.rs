// Terminal front end
// Renders the session with ratatui and maps keys and mouse buttons to commands

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::sl_board::Coord;
use crate::sl_color::Palette;
use crate::sl_config::Config;
use crate::sl_error::AppError;
use crate::sl_lang::{Lang, fill};
use crate::sl_session::{CellView, GameSession, GameStatus, Update};

const TICK_RATE: Duration = Duration::from_millis(200);

/// Runtime UI state around one game session
struct App<'a> {
    session: GameSession,
    lang: &'a Lang,
    palette: Palette,
    ascii: bool,
    cursor: Coord,
    showing_help: bool,
    // Result modal, set on the transition and cleared by Esc or a new game
    outcome: Option<GameStatus>,
    started: Option<Instant>,
    elapsed: Duration,
    board_rect: Option<Rect>,
}

/// Take over the terminal and play until the player exits
pub fn run(cfg: &Config, lang: &Lang) -> Result<(), AppError> {
    let session = GameSession::new(cfg.size, cfg.mines)?;
    let mut app = App::new(session, cfg, lang);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.event_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

impl<'a> App<'a> {
    fn new(session: GameSession, cfg: &Config, lang: &'a Lang) -> Self {
        App {
            session,
            lang,
            palette: Palette::detect(),
            ascii: cfg.ascii_icons,
            cursor: Coord::new(0, 0),
            showing_help: false,
            outcome: None,
            started: None,
            elapsed: Duration::ZERO,
            board_rect: None,
        }
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        loop {
            let views = self.views()?;
            terminal.draw(|f| self.draw(f, &views))?;

            if !event::poll(TICK_RATE)? {
                continue;
            }
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    if !self.on_key(code)? {
                        info!("Player exited");
                        return Ok(());
                    }
                }
                Event::Mouse(me) => self.on_mouse(me)?,
                _ => {}
            }
        }
    }

    /// Cell views in row-major order
    fn views(&self) -> Result<Vec<CellView>, AppError> {
        let board = self.session.board();
        let views = board
            .coords()
            .map(|coord| self.session.cell_view(coord))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    fn new_game(&mut self) {
        self.session.reset();
        self.outcome = None;
        self.started = None;
        self.elapsed = Duration::ZERO;
    }

    /// Start the clock on the first effective command, stop it on game over
    fn apply(&mut self, update: Update) {
        if update.is_empty() {
            return;
        }
        let now = Instant::now();
        let started = *self.started.get_or_insert(now);
        if update.transition.is_some() {
            self.elapsed = now.duration_since(started);
            self.outcome = Some(self.session.status());
            debug!("Game over after {}s: {:?}", self.elapsed.as_secs(), self.outcome);
        }
    }

    fn elapsed_secs(&self) -> u64 {
        match (self.session.status().is_over(), self.started) {
            (false, Some(t0)) => t0.elapsed().as_secs(),
            _ => self.elapsed.as_secs(),
        }
    }

    fn step_cursor(&mut self, drow: isize, dcol: isize) {
        let max = (self.session.board().size() - 1) as isize;
        let row = (self.cursor.row as isize + drow).clamp(0, max) as usize;
        let col = (self.cursor.col as isize + dcol).clamp(0, max) as usize;
        self.cursor = Coord::new(row, col);
    }

    /// Returns false when the player asked to exit
    fn on_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.showing_help {
            self.showing_help = false;
            return Ok(true);
        }
        if self.outcome.is_some() {
            match code {
                // keep looking at the finished board
                KeyCode::Esc => self.outcome = None,
                _ => self.new_game(),
            }
            return Ok(true);
        }

        match code {
            KeyCode::Esc => return Ok(false),
            KeyCode::F(1) => self.showing_help = true,
            KeyCode::F(2) => self.new_game(),
            KeyCode::Left => self.step_cursor(0, -1),
            KeyCode::Right => self.step_cursor(0, 1),
            KeyCode::Up => self.step_cursor(-1, 0),
            KeyCode::Down => self.step_cursor(1, 0),
            KeyCode::Char(' ') => {
                let update = self.session.reveal(self.cursor)?;
                self.apply(update);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                let update = self.session.toggle_flag(self.cursor)?;
                self.apply(update);
            }
            KeyCode::Enter => {
                let update = self.session.chord(self.cursor)?;
                self.apply(update);
            }
            _ => {}
        }
        Ok(true)
    }

    fn on_mouse(&mut self, me: MouseEvent) -> Result<(), AppError> {
        let button = match me.kind {
            MouseEventKind::Down(button) => button,
            MouseEventKind::Moved => {
                if let Some(coord) = self.cell_at(me.column, me.row) {
                    self.cursor = coord;
                }
                return Ok(());
            }
            _ => return Ok(()),
        };
        if self.showing_help || self.outcome.is_some() {
            self.on_key(KeyCode::Null)?;
            return Ok(());
        }
        let Some(coord) = self.cell_at(me.column, me.row) else {
            return Ok(());
        };
        self.cursor = coord;
        let update = match button {
            MouseButton::Left => self.session.reveal(coord)?,
            MouseButton::Right => self.session.toggle_flag(coord)?,
            MouseButton::Middle => self.session.chord(coord)?,
        };
        self.apply(update);
        Ok(())
    }

    /// Map a terminal position to a board cell; each cell is two columns wide
    fn cell_at(&self, column: u16, row: u16) -> Option<Coord> {
        let rect = self.board_rect?;
        let (x0, y0) = (rect.x + 1, rect.y + 1);
        if column < x0 || row < y0 {
            return None;
        }
        let coord = Coord::new((row - y0) as usize, ((column - x0) / 2) as usize);
        let size = self.session.board().size();
        (coord.row < size && coord.col < size).then_some(coord)
    }

    fn glyph(&self, view: CellView) -> (String, Style) {
        let p = self.palette;
        let base = Style::default().bg(p.board_bg());
        let icon = |ascii: &'static str, fancy: &'static str| {
            (if self.ascii { ascii } else { fancy }).to_string()
        };
        match view {
            CellView::Hidden => (icon("#", "■"), base.fg(p.hidden())),
            CellView::Flagged => (icon("F", "⚑"), base.fg(p.flag())),
            CellView::Open(0) => (" ".to_string(), base),
            CellView::Open(n) => (n.to_string(), base.fg(p.number(n)).add_modifier(Modifier::BOLD)),
            CellView::Mine if self.session.status() == GameStatus::Lost => {
                (icon("*", "☼"), base.fg(p.mine()).bg(p.exploded_bg()))
            }
            CellView::Mine => (icon("*", "☼"), base.fg(p.mine())),
            CellView::Detonated => (
                icon("*", "☼"),
                base.fg(p.mine())
                    .bg(p.exploded_bg())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            CellView::WrongFlag => (icon("X", "✗"), base.fg(p.mine()).bg(p.wrong_flag_bg())),
        }
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<'_, B>, views: &[CellView]) {
        let lang = self.lang;
        let a = &lang.assets;
        let area = f.size();
        let n = self.session.board().size();
        let board_w = (n * 2) as u16 + 3;
        let board_h = n as u16 + 2;
        let min_w = board_w.max(48);
        let min_h = board_h + 6;

        if area.width < min_w || area.height < min_h {
            let lines = vec![
                Spans::from(Span::raw(a.tsmsg_line1)),
                Spans::from(Span::raw(fill(a.tsmsg_line2, &[&min_w, &min_h]))),
            ];
            let warn = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
                .alignment(Alignment::Center);
            f.render_widget(Clear, area);
            let w = 40u16.min(area.width);
            let h = 4u16.min(area.height);
            f.render_widget(warn, center_rect(w, h, area));
            self.board_rect = None;
            return;
        }

        // layout: top menu row, center board, bottom status
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)].as_ref())
            .split(area);

        let key_style = Style::default()
            .fg(self.palette.menu_key())
            .add_modifier(Modifier::BOLD);
        let menu = Paragraph::new(Spans::from(vec![
            Span::raw(" "),
            Span::styled("F1", key_style),
            Span::raw(format!(": {}   ", a.menu_help)),
            Span::styled("F2", key_style),
            Span::raw(format!(": {}", a.menu_new)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(menu, chunks[0]);

        // status row: counters left, Esc: Exit right-aligned
        let left = fill(
            a.status_mines_fmt,
            &[&self.session.board().remaining_mines(), &self.elapsed_secs()],
        );
        let right = format!(": {} ", a.menu_exit);
        let inner_w = chunks[2].width.saturating_sub(2) as usize;
        let used = left.as_str().width() + "Esc".width() + right.as_str().width();
        let gap = inner_w.saturating_sub(used).max(1);
        let status = Paragraph::new(Spans::from(vec![
            Span::raw(left),
            Span::raw(" ".repeat(gap)),
            Span::styled("Esc", key_style),
            Span::raw(right),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, chunks[2]);

        // board
        let board_area = center_rect(board_w, board_h, chunks[1]);
        self.board_rect = Some(board_area);
        let cursor_bg = self.palette.cursor_bg();
        let lines: Vec<Spans> = views
            .chunks(n)
            .enumerate()
            .map(|(row, cells)| {
                let mut spans: Vec<Span> = cells
                    .iter()
                    .enumerate()
                    .map(|(col, &view)| {
                        let (s, mut style) = self.glyph(view);
                        if self.cursor == Coord::new(row, col) {
                            style = style.bg(cursor_bg);
                        }
                        Span::styled(format!(" {}", s), style)
                    })
                    .collect();
                spans.push(Span::styled(" ", Style::default().bg(self.palette.board_bg())));
                Spans::from(spans)
            })
            .collect();
        let title = fill(a.board_title_fmt, &[&n, &n, &self.session.board().mine_count()]);
        let board = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
        f.render_widget(board, board_area);

        if self.showing_help {
            let lines = [a.help_controls, a.help_move, a.help_reveal, a.help_flag, a.help_chord];
            modal(f, area, a.help_title, &lines, Alignment::Left);
        }
        match self.outcome {
            Some(GameStatus::Won) => {
                let time = fill(a.time_fmt, &[&self.elapsed.as_secs()]);
                let lines = ["", a.win_message, time.as_str(), "", a.any_key_new];
                modal(f, area, a.win_title, &lines, Alignment::Center);
            }
            Some(GameStatus::Lost) => {
                let lines = ["", a.loss_message, a.loss_better_luck, "", a.any_key_new];
                modal(f, area, a.loss_title, &lines, Alignment::Center);
            }
            _ => {}
        }
    }
}

/// Render a bordered dialog near the bottom of `area`
fn modal<B: Backend>(f: &mut Frame<'_, B>, area: Rect, title: &str, lines: &[&str], align: Alignment) {
    let width = lines
        .iter()
        .map(|l| l.width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or(0) as u16
        + 6;
    let height = lines.len() as u16 + 2;
    let rect = bottom_centered_block(width.min(area.width), height.min(area.height), area);
    let text: Vec<Spans> = lines.iter().map(|l| Spans::from(Span::raw(*l))).collect();
    let p = Paragraph::new(Text::from(text))
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(align);
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width, height)
}
