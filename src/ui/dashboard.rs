//! Analytics dashboard
//!
//! Full-screen view of points, level, streak and badges, with bar charts of
//! weak topics and time spent per problem. Press `q` or `Esc` to leave.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

use crate::config::progress::ProgressDocument;
use crate::theme::Theme;

/// Draw the dashboard into a frame
pub fn draw(frame: &mut Frame, progress: &ProgressDocument, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    draw_summary(frame, rows[0], progress, theme);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    draw_weak_topics(frame, charts[0], progress, theme);
    draw_time_spent(frame, charts[1], progress, theme);

    let footer = Paragraph::new(Span::styled("q: quit", Style::default().fg(theme.fg_muted)));
    frame.render_widget(footer, rows[2]);
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary))
}

fn draw_summary(frame: &mut Frame, area: Rect, progress: &ProgressDocument, theme: &Theme) {
    let label = Style::default().fg(theme.fg_muted);
    let value = Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD);

    let badges =
        if progress.badges.is_empty() { "None".to_string() } else { progress.badges.join(", ") };

    let lines = vec![
        Line::from(vec![
            Span::styled("Points: ", label),
            Span::styled(progress.points.to_string(), value),
            Span::styled("   XP Level: ", label),
            Span::styled(progress.xp_level.to_string(), value),
            Span::styled("   Streak: ", label),
            Span::styled(format!("{} days", progress.streak), value),
        ]),
        Line::from(vec![
            Span::styled("Badges: ", label),
            Span::styled(badges, Style::default().fg(theme.success)),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", label),
            Span::styled(
                progress.completed_problems.len().to_string(),
                Style::default().fg(theme.fg_primary),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel(" Progress Overview ", theme)), area);
}

fn draw_weak_topics(frame: &mut Frame, area: Rect, progress: &ProgressDocument, theme: &Theme) {
    let block = panel(" Weak Topics ", theme);
    if progress.weak_topics.is_empty() {
        draw_empty(frame, area, block, "No weak topics yet", theme);
        return;
    }

    let bars: Vec<Bar> = progress
        .weakest_topics()
        .into_iter()
        .map(|(topic, count)| {
            Bar::default()
                .label(Line::from(topic.to_string()))
                .value(u64::from(count))
                .style(Style::default().fg(theme.warning))
        })
        .collect();

    draw_bars(frame, area, block, bars, theme);
}

fn draw_time_spent(frame: &mut Frame, area: Rect, progress: &ProgressDocument, theme: &Theme) {
    let block = panel(" Time Spent per Problem (minutes) ", theme);
    if progress.time_spent.is_empty() {
        draw_empty(frame, area, block, "No time recorded yet", theme);
        return;
    }

    // Bars are integral, so minutes are charted in hundredths
    let bars: Vec<Bar> = progress
        .time_spent
        .iter()
        .map(|(problem, minutes)| {
            Bar::default()
                .label(Line::from(problem.clone()))
                .value((minutes.max(0.0) * 100.0).round() as u64)
                .text_value(format!("{:.2}", minutes))
                .style(Style::default().fg(theme.accent_secondary))
        })
        .collect();

    draw_bars(frame, area, block, bars, theme);
}

fn draw_bars(frame: &mut Frame, area: Rect, block: Block, bars: Vec<Bar>, theme: &Theme) {
    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(theme.bg_primary).bg(theme.fg_primary))
        .label_style(Style::default().fg(theme.fg_primary))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_empty(frame: &mut Frame, area: Rect, block: Block, message: &str, theme: &Theme) {
    let para = Paragraph::new(message).style(Style::default().fg(theme.fg_muted)).block(block);
    frame.render_widget(para, area);
}

/// Run the dashboard until the user quits
pub fn run(progress: &ProgressDocument, theme: &Theme) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Set up panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, progress, theme);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    progress: &ProgressDocument,
    theme: &Theme,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, progress, theme))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
