use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use pc_chart::{ChartStyle, Rgb};
use pc_core::{Chart, ChartData, RankedEntry};

/// Show `chart` full-screen until the user presses `q` or `Esc`.
pub fn run(chart: &Chart, style: &ChartStyle) -> Result<(), String> {
    let groups = bar_groups(chart, style);
    let bars = groups.iter().map(|(_, bars)| bars.len()).sum::<usize>();

    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut terminal = match open_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            restore(&mut io::stdout());
            return Err(format!("terminal error: {e}"));
        }
    };

    let result = run_loop(&mut terminal, chart, &groups, bars);

    restore(terminal.backend_mut());
    terminal.show_cursor().ok();

    result
}

/// Leave raw mode and the alternate screen, ignoring failures.
fn restore<W: io::Write>(out: &mut W) {
    disable_raw_mode().ok();
    execute!(out, LeaveAlternateScreen).ok();
}

/// Enter the alternate screen and wrap stdout. Raw mode is already on.
fn open_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

type Group = (Option<String>, Vec<Bar<'static>>);

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    chart: &Chart,
    groups: &[Group],
    bars: usize,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| draw(frame, chart, groups, bars))
            .map_err(|e| format!("draw error: {e}"))?;

        if let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(());
            }
        }
    }
}

fn draw(frame: &mut Frame, chart: &Chart, groups: &[Group], bars: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let title = chart
        .title
        .clone()
        .unwrap_or_else(|| format!("{} chart", chart.kind()));

    let gaps = groups.len().saturating_sub(1) * 3 + bars;
    let inner = usize::from(chunks[0].width.saturating_sub(2));
    let bar_width = (inner.saturating_sub(gaps) / bars.max(1)).clamp(1, 12);

    let mut widget = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .bar_width(u16::try_from(bar_width).unwrap_or(1))
        .bar_gap(1)
        .group_gap(3)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));

    for (label, bars) in groups {
        let mut group = BarGroup::default().bars(bars);
        if let Some(label) = label {
            group = group.label(Line::from(label.clone()));
        }
        widget = widget.data(group);
    }

    frame.render_widget(widget, chunks[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            " q/Esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
        chunks[1],
    );
}

/// Bars to draw: one group for pie and bar charts, one per chapter for
/// stacked charts (series side by side).
fn bar_groups(chart: &Chart, style: &ChartStyle) -> Vec<Group> {
    match &chart.data {
        ChartData::Pie(ranking) => vec![(None, entry_bars(&ranking.entries(), style))],
        ChartData::Bar(entries) => vec![(None, entry_bars(entries, style))],
        ChartData::StackedBar(data) => {
            let colors = style.colors(data.series.len());
            data.columns
                .iter()
                .map(|column| {
                    let bars = data
                        .series
                        .iter()
                        .zip(&colors)
                        .map(|(series, color)| {
                            bar(series, column.ranking.get(series).unwrap_or(0), *color)
                        })
                        .collect();
                    (Some(format!("Ch {}", column.label)), bars)
                })
                .collect()
        }
    }
}

fn entry_bars(entries: &[RankedEntry], style: &ChartStyle) -> Vec<Bar<'static>> {
    let colors = style.colors(entries.len());
    entries
        .iter()
        .zip(&colors)
        .map(|(entry, color)| bar(&entry.name, entry.count, *color))
        .collect()
}

fn bar(name: &str, value: u64, color: Rgb) -> Bar<'static> {
    Bar::default()
        .value(value)
        .label(Line::from(name.to_string()))
        .style(Style::default().fg(Color::Rgb(color.0, color.1, color.2)))
}
