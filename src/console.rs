use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, error, info};

use crate::session::{OutputKind, OutputLine, Session};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// runs `restore` when dropped, so the terminal is put back on every exit
/// path, including `?` returns and panics
struct RestoreGuard<F: FnMut() -> io::Result<()>> {
    restore: F,
}

impl<F: FnMut() -> io::Result<()>> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            error!(error = %e, "failed to restore terminal");
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    // both steps always run; the first failure is reported
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    raw.and(screen)
}

/// column of the text cursor inside a bordered box `box_width` cells wide
fn cursor_column(typed: usize, box_width: u16) -> u16 {
    let last = box_width.saturating_sub(2).saturating_sub(1);
    u16::try_from(typed).unwrap_or(u16::MAX).min(last)
}

/// what a key press asks the console loop to do next
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ConsoleApp {
    session: Session,
}

impl ConsoleApp {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let _guard = RestoreGuard {
            restore: restore_terminal,
        };

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.run_loop(&mut terminal)
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if self.handle_key(key) == Flow::Quit {
                    info!("console closed");
                    return Ok(());
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return Flow::Quit,
            KeyCode::Enter => {
                self.session.submit();
            }
            KeyCode::Up => {
                if !self.session.history_prev() {
                    debug!("no older history entry");
                }
            }
            KeyCode::Down => {
                if !self.session.history_next() {
                    debug!("already at the input buffer");
                }
            }
            KeyCode::Tab => self.session.indent(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(c) if !ctrl => self.session.insert_char(c),
            _ => {}
        }
        Flow::Continue
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(f.area());

        let lines: Vec<Line> = self.session.output().map(output_line).collect();
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let scroll = u16::try_from(lines.len().saturating_sub(visible)).unwrap_or(u16::MAX);
        let output = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title("Console"))
            .scroll((scroll, 0));
        f.render_widget(output, chunks[0]);

        let history = self.session.history();
        let title = format!("History {}/{}", history.cursor(), history.len() - 1);
        let prompt = self.session.prompt();
        let input = Paragraph::new(Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Cyan)),
            Span::raw(self.session.input()),
        ]))
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, chunks[1]);

        let typed = prompt.chars().count() + self.session.input().chars().count();
        let column = cursor_column(typed, chunks[1].width);
        f.set_cursor_position((chunks[1].x + 1 + column, chunks[1].y + 1));
    }
}

fn output_line(line: &OutputLine) -> Line<'_> {
    let style = match line.kind {
        OutputKind::Echo => Style::default().fg(Color::Gray),
        OutputKind::Value => Style::default().fg(Color::Green),
        OutputKind::Info => Style::default().fg(Color::Yellow),
        OutputKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    Line::from(Span::styled(line.text.as_str(), style))
}

/// headless console: every input line goes through the session as if typed
/// and submitted, results are written without the echo
pub fn run_batch<R: BufRead, W: Write>(
    session: &mut Session,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        session.insert_str(&line);
        for out in session.submit() {
            if out.kind != OutputKind::Echo {
                writeln!(writer, "{}", out.text)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
