use std::fmt::{self, Write as _};

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use pc_core::{Chart, ChartData, RankedEntry, Ranking, StackedData};

use crate::style::{ChartStyle, Rgb};
use crate::{ChartRenderer, ChartResult};

const BLOCK: char = '█';

/// Renders charts as coloured text for a terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    style: ChartStyle,
}

impl TerminalRenderer {
    /// Create a renderer with the given style.
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }
}

impl ChartRenderer for TerminalRenderer {
    fn render(&self, chart: &Chart) -> ChartResult<String> {
        let mut out = String::new();
        if let Some(title) = &chart.title {
            writeln!(out, "  {}\n", title.bold())?;
        }
        match &chart.data {
            ChartData::Pie(ranking) => self.pie(&mut out, ranking)?,
            ChartData::Bar(entries) => self.bars(&mut out, entries)?,
            ChartData::StackedBar(data) => self.stacked(&mut out, data)?,
        }
        Ok(out)
    }
}

impl TerminalRenderer {
    fn pie(&self, out: &mut String, ranking: &Ranking) -> fmt::Result {
        let entries = ranking.entries();
        let total = ranking.total();
        if total == 0 {
            return writeln!(out, "  {}", "(no words in selection)".dimmed());
        }

        let colors = self.style.colors(entries.len());
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Character", "Words", "Share", ""]);

        for (entry, color) in entries.iter().zip(&colors) {
            let share = entry.count as f64 / total as f64;
            let cells = scaled(entry.count, total, self.style.terminal_width);
            table.add_row(vec![
                Cell::new(&entry.name),
                Cell::new(entry.count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", share * 100.0)).set_alignment(CellAlignment::Right),
                Cell::new(block(cells)).fg(table_color(*color)),
            ]);
        }

        writeln!(out, "{table}")?;
        writeln!(out, "\n  {total} words")
    }

    fn bars(&self, out: &mut String, entries: &[RankedEntry]) -> fmt::Result {
        if entries.is_empty() {
            return writeln!(out, "  {}", "(no characters to show)".dimmed());
        }

        let max = entries.iter().map(|e| e.count).max().unwrap_or(0);
        let label_width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
        let colors = self.style.colors(1);

        writeln!(out, "  {:>label_width$}  {}", "", self.style.y_label.dimmed())?;
        for entry in entries {
            let cells = scaled(entry.count, max, self.style.terminal_width);
            writeln!(
                out,
                "  {:>label_width$}  {} {}",
                entry.name,
                paint(&block(cells), colors[0]),
                entry.count
            )?;
        }
        Ok(())
    }

    fn stacked(&self, out: &mut String, data: &StackedData) -> fmt::Result {
        if data.columns.is_empty() {
            return writeln!(out, "  {}", "(no chapters to show)".dimmed());
        }

        let totals = data.column_totals();
        let max = totals.iter().copied().max().unwrap_or(0);
        let colors = self.style.colors(data.series.len());
        let label_width = data
            .columns
            .iter()
            .map(|c| c.label.chars().count())
            .max()
            .unwrap_or(0)
            .max("Chapter".len());

        writeln!(out, "  {:>label_width$}  {}", "Chapter", self.style.y_label.dimmed())?;
        for (idx, column) in data.columns.iter().enumerate() {
            let mut line = String::new();
            let mut running = 0u64;
            let mut drawn = 0usize;
            for (series, color) in data.series.iter().zip(&colors) {
                running = running.saturating_add(column.ranking.get(series).unwrap_or(0));
                let end = scaled(running, max, self.style.terminal_width);
                line.push_str(&paint(&block(end - drawn), *color).to_string());
                drawn = end;
            }
            writeln!(out, "  {:>label_width$}  {line} {}", column.label, totals[idx])?;
        }

        writeln!(out)?;
        for (series, color) in data.series.iter().zip(&colors) {
            writeln!(out, "  {} {series}", paint("■", *color))?;
        }
        Ok(())
    }
}

/// `value / max` of `width` cells, rounded.
fn scaled(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * width as f64).round() as usize
}

fn block(cells: usize) -> String {
    std::iter::repeat_n(BLOCK, cells).collect()
}

fn paint(text: &str, color: Rgb) -> colored::ColoredString {
    text.truecolor(color.0, color.1, color.2)
}

fn table_color(color: Rgb) -> Color {
    Color::Rgb {
        r: color.0,
        g: color.1,
        b: color.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::{ChartKind, ChartRequest, Corpus};

    fn corpus() -> Corpus {
        Corpus::parse(
            "A;Alice\nB;Bob\nC;Carol\nO;Other\n",
            "1;A;;100\n1;B;A;50\n2;C;B;40\n",
        )
        .unwrap()
    }

    fn render(request: ChartRequest) -> String {
        colored::control::set_override(false);
        let chart = corpus().chart(&request).unwrap();
        TerminalRenderer::default().render(&chart).unwrap()
    }

    #[test]
    fn pie_lists_shares() {
        let out = render(ChartRequest::new(ChartKind::Pie).with_count(2));
        assert!(out.contains("Alice"));
        assert!(out.contains("Bob"));
        assert!(out.contains("Other"));
        // Alice 150 / 280
        assert!(out.contains("53.6%"));
        assert!(out.contains("280 words"));
    }

    #[test]
    fn title_is_optional() {
        let out = render(
            ChartRequest::new(ChartKind::Bar).with_title(Some("Point of View".into())),
        );
        assert!(out.starts_with("  Point of View"));
        let out = render(ChartRequest::new(ChartKind::Bar));
        assert!(!out.contains("Point of View"));
    }

    #[test]
    fn bar_scales_to_width() {
        let out = render(ChartRequest::new(ChartKind::Bar));
        let alice = out.lines().find(|l| l.contains("Alice")).unwrap();
        assert_eq!(alice.matches(BLOCK).count(), 40);
        assert!(alice.ends_with(" 150"));
        assert!(!out.contains("Other"));
    }

    #[test]
    fn stacked_has_legend_and_totals() {
        let out = render(
            ChartRequest::new(ChartKind::StackedBar)
                .with_chapters("1,2".parse().unwrap())
                .with_count(2),
        );
        assert!(out.contains("■ Alice"));
        assert!(out.contains("■ Other"));
        let first = out.lines().find(|l| l.trim_start().starts_with("1 ")).unwrap();
        assert!(first.ends_with(" 200"));
        assert_eq!(first.matches(BLOCK).count(), 40);
    }

    #[test]
    fn empty_pie() {
        let out = render(ChartRequest::new(ChartKind::Pie).with_chapters("9".parse().unwrap()));
        assert!(out.contains("no words in selection"));
    }

    #[test]
    fn scaled_rounds() {
        assert_eq!(scaled(1, 3, 40), 13);
        assert_eq!(scaled(2, 3, 40), 27);
        assert_eq!(scaled(5, 0, 40), 0);
    }
}
