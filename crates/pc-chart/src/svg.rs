use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::{self, Write as _};

use pc_core::{Chart, ChartData, RankedEntry, Ranking, StackedData};

use crate::style::{ChartStyle, Rgb};
use crate::{ChartRenderer, ChartResult};

const FONT: &str = "DejaVu Sans, Arial, sans-serif";

/// Renders charts as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    style: ChartStyle,
}

impl SvgRenderer {
    /// Create a renderer with the given style.
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, chart: &Chart) -> ChartResult<String> {
        let (w, h) = (self.style.width, self.style.height);
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#
        )?;
        writeln!(svg, r#"<rect width="{w}" height="{h}" fill="white"/>"#)?;

        let top = match &chart.title {
            Some(title) => {
                let size = self.style.title_size;
                writeln!(
                    svg,
                    r#"<text class="title" x="{}" y="{}" font-size="{size}" text-anchor="middle">{}</text>"#,
                    f64::from(w) / 2.0,
                    f64::from(size) + 10.0,
                    escape(title)
                )?;
                f64::from(size) + 20.0
            }
            None => 0.0,
        };

        match &chart.data {
            ChartData::Pie(ranking) => self.pie(&mut svg, ranking, top)?,
            ChartData::Bar(entries) => self.bars(&mut svg, entries, top)?,
            ChartData::StackedBar(data) => self.stacked(&mut svg, data, top)?,
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

/// Plot area of an axis chart.
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    max: f64,
}

impl Plot {
    fn new(style: &ChartStyle, top: f64, bottom_margin: f64, right_margin: f64, max: u64) -> Self {
        let left = 80.0;
        let top = top + 20.0;
        Self {
            left,
            top,
            width: (f64::from(style.width) - left - right_margin).max(1.0),
            height: (f64::from(style.height) - top - bottom_margin).max(1.0),
            max: nice_max(max),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn y(&self, value: f64) -> f64 {
        self.bottom() - value / self.max * self.height
    }

    fn slot(&self, n: usize) -> f64 {
        self.width / n.max(1) as f64
    }

    fn axes(&self, svg: &mut String, y_label: &str) -> fmt::Result {
        let step = self.max / 5.0;
        for i in 0..=5 {
            let value = step * f64::from(i);
            let y = self.y(value);
            writeln!(
                svg,
                r##"<line x1="{}" y1="{y:.1}" x2="{}" y2="{y:.1}" stroke="#dddddd"/>"##,
                self.left,
                self.left + self.width
            )?;
            writeln!(
                svg,
                r#"<text x="{}" y="{:.1}" font-size="12" text-anchor="end">{}</text>"#,
                self.left - 6.0,
                y + 4.0,
                value.round()
            )?;
        }
        writeln!(
            svg,
            r#"<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="black"/><line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
            l = self.left,
            t = self.top,
            b = self.bottom(),
            r = self.left + self.width
        )?;
        let cy = self.top + self.height / 2.0;
        writeln!(
            svg,
            r#"<text class="y-label" x="20" y="{cy:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {cy:.1})">{}</text>"#,
            escape(y_label)
        )
    }
}

impl SvgRenderer {
    fn pie(&self, svg: &mut String, ranking: &Ranking, top: f64) -> fmt::Result {
        let entries: Vec<RankedEntry> = ranking
            .entries()
            .into_iter()
            .filter(|e| e.count > 0)
            .collect();
        let total = ranking.total() as f64;
        let (w, h) = (f64::from(self.style.width), f64::from(self.style.height));
        let cx = w / 2.0;
        let cy = top + (h - top) / 2.0;

        if entries.is_empty() {
            writeln!(
                svg,
                r#"<text x="{cx}" y="{cy}" font-size="16" text-anchor="middle">No data</text>"#
            )?;
            return Ok(());
        }

        let r = 0.35 * w.min(h - top);
        let colors = self.style.colors(entries.len());
        let point = |angle: f64, radius: f64| (cx + radius * angle.cos(), cy - radius * angle.sin());

        let mut start = FRAC_PI_2;
        for (entry, color) in entries.iter().zip(&colors) {
            let share = entry.count as f64 / total;
            let sweep = share * TAU;
            let end = start + sweep;

            if entries.len() == 1 {
                writeln!(
                    svg,
                    r#"<circle class="slice" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#
                )?;
            } else {
                let (x1, y1) = point(start, r);
                let (x2, y2) = point(end, r);
                let large = u8::from(sweep > std::f64::consts::PI);
                writeln!(
                    svg,
                    r#"<path class="slice" d="M {cx:.1} {cy:.1} L {x1:.2} {y1:.2} A {r:.1} {r:.1} 0 {large} 0 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
                )?;
            }

            let mid = start + sweep / 2.0;
            let (lx, ly) = point(mid, r * 1.1);
            let anchor = if mid.cos() >= 0.0 { "start" } else { "end" };
            writeln!(
                svg,
                r#"<text x="{lx:.1}" y="{ly:.1}" font-size="14" text-anchor="{anchor}">{}</text>"#,
                escape(&entry.name)
            )?;
            let (px, py) = point(mid, r * 0.6);
            writeln!(
                svg,
                r#"<text x="{px:.1}" y="{py:.1}" font-size="12" text-anchor="middle">{:.1}%</text>"#,
                share * 100.0
            )?;

            start = end;
        }
        Ok(())
    }

    fn bars(&self, svg: &mut String, entries: &[RankedEntry], top: f64) -> fmt::Result {
        let max = entries.iter().map(|e| e.count).max().unwrap_or(0);
        let plot = Plot::new(&self.style, top, 110.0, 20.0, max);
        plot.axes(svg, &self.style.y_label)?;

        let slot = plot.slot(entries.len());
        let bar = slot * self.style.bar_width;
        let color = self.style.colors(1)[0];
        for (i, entry) in entries.iter().enumerate() {
            let center = plot.left + slot * (i as f64 + 0.5);
            let y = plot.y(entry.count as f64);
            writeln!(
                svg,
                r#"<rect class="bar" x="{:.1}" y="{y:.1}" width="{bar:.1}" height="{:.1}" fill="{color}"><title>{}: {}</title></rect>"#,
                center - bar / 2.0,
                plot.bottom() - y,
                escape(&entry.name),
                entry.count
            )?;
            let ly = plot.bottom() + 16.0;
            writeln!(
                svg,
                r#"<text x="{center:.1}" y="{ly:.1}" font-size="12" text-anchor="end" transform="rotate(-{rot} {center:.1} {ly:.1})">{}</text>"#,
                escape(&entry.name),
                rot = self.style.label_rotation
            )?;
        }
        Ok(())
    }

    fn stacked(&self, svg: &mut String, data: &StackedData, top: f64) -> fmt::Result {
        let totals = data.column_totals();
        let max = totals.iter().copied().max().unwrap_or(0);
        let plot = Plot::new(&self.style, top, 50.0, 170.0, max);
        plot.axes(svg, &self.style.y_label)?;

        let colors = self.style.colors(data.series.len());
        let slot = plot.slot(data.columns.len());
        let bar = slot * self.style.bar_width;

        for (i, column) in data.columns.iter().enumerate() {
            let center = plot.left + slot * (i as f64 + 0.5);
            let mut base = 0u64;
            for (series, color) in data.series.iter().zip(&colors) {
                let value = column.ranking.get(series).unwrap_or(0);
                if value > 0 {
                    let y_top = plot.y(base.saturating_add(value) as f64);
                    let y_bottom = plot.y(base as f64);
                    writeln!(
                        svg,
                        r#"<rect class="bar" x="{:.1}" y="{y_top:.1}" width="{bar:.1}" height="{:.1}" fill="{color}"><title>{}: {value}</title></rect>"#,
                        center - bar / 2.0,
                        y_bottom - y_top,
                        escape(series)
                    )?;
                }
                base = base.saturating_add(value);
            }
            writeln!(
                svg,
                r#"<text x="{center:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
                plot.bottom() + 18.0,
                escape(&column.label)
            )?;
        }

        let lx = plot.left + plot.width + 15.0;
        for (i, (series, color)) in data.series.iter().zip(&colors).enumerate() {
            let ly = plot.top + 20.0 * i as f64;
            legend_entry(svg, lx, ly, series, *color)?;
        }
        Ok(())
    }
}

fn legend_entry(svg: &mut String, x: f64, y: f64, name: &str, color: Rgb) -> fmt::Result {
    writeln!(
        svg,
        r#"<rect class="legend" x="{x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/><text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
        x + 18.0,
        y + 10.0,
        escape(name)
    )
}

/// Round `max` up to a value that divides evenly into five axis ticks.
fn nice_max(max: u64) -> f64 {
    if max == 0 {
        return 1.0;
    }
    let raw = max as f64 / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let step = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude * 5.0
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
