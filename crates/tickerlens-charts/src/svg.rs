//! SVG building blocks shared by the report charts.
//!
//! A [`Figure`] is a title strip over a vertical stack of fixed-size panels.
//! Every panel maps its own value extent onto the same plot box, so panels
//! sharing a date axis line up horizontally.

use std::fmt::Write as _;

use tickerlens_core::Date;

pub(crate) const WIDTH: f64 = 576.0;
pub(crate) const PANEL_HEIGHT: f64 = 288.0;
const PADDING: f64 = 36.0;
const LEFT_MARGIN: f64 = 52.0;
const TITLE_HEIGHT: f64 = 28.0;
const MAX_AXIS_LABELS: usize = 8;

pub(crate) const PALETTE: [&str; 6] = ["#348dc1", "#ff9933", "#af4b64", "#4fa487", "#6a51a3", "#8c8c8c"];
pub(crate) const ACCENT_COLOR: &str = "#8c8c8c";
const UP_COLOR: &str = "#4fa487";
const DOWN_COLOR: &str = "#af4b64";

/// Palette color for the `i`-th series, cycling.
pub(crate) fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// How axis and bar values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueFormat {
    Number,
    Percent,
}

impl ValueFormat {
    fn format(self, value: f64) -> String {
        match self {
            ValueFormat::Number if value.abs() >= 1000.0 => format!("{value:.0}"),
            ValueFormat::Number => format!("{value:.2}"),
            ValueFormat::Percent => format!("{:.1}%", value * 100.0),
        }
    }
}

/// A polyline over date indices.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub label: String,
    pub color: &'static str,
    pub width: f64,
    pub dash: bool,
    /// `(date index, value)`; indices need not start at zero.
    pub points: Vec<(usize, f64)>,
}

impl Line {
    pub(crate) fn new(label: impl Into<String>, color: &'static str, points: Vec<(usize, f64)>) -> Self {
        Self {
            label: label.into(),
            color,
            width: 1.5,
            dash: false,
            points,
        }
    }

    /// Values aligned to the end of the date axis, as indicator outputs are.
    pub(crate) fn trailing(label: impl Into<String>, color: &'static str, values: &[f64], axis_len: usize) -> Self {
        let offset = axis_len.saturating_sub(values.len());
        let points = values.iter().enumerate().map(|(i, v)| (offset + i, *v)).collect();
        Self::new(label, color, points)
    }

    pub(crate) fn dashed(mut self) -> Self {
        self.dash = true;
        self
    }

    pub(crate) fn bold(mut self) -> Self {
        self.width = 2.2;
        self
    }
}

/// Horizontal reference line.
#[derive(Debug, Clone)]
pub(crate) struct Guide {
    pub value: f64,
    pub color: &'static str,
    pub label: Option<String>,
}

impl Guide {
    pub(crate) fn new(value: f64, color: &'static str, label: Option<String>) -> Self {
        Self { value, color, label }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Panel {
    Lines {
        title: String,
        dates: Vec<Date>,
        lines: Vec<Line>,
        guides: Vec<Guide>,
        format: ValueFormat,
    },
    Bars {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
        guides: Vec<Guide>,
        format: ValueFormat,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Figure {
    title: String,
    panels: Vec<Panel>,
}

impl Figure {
    pub(crate) fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            panels: Vec::new(),
        }
    }

    pub(crate) fn panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub(crate) fn render(&self) -> String {
        let height = TITLE_HEIGHT + PANEL_HEIGHT * self.panels.len() as f64;
        let mut svg = String::new();
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style><rect width="100%" height="100%" fill="#ffffff" /><text x="{x:.2}" y="18" text-anchor="middle" font-size="14" fill="#333">{title}</text>"##,
            x = WIDTH / 2.0,
            title = escape(&self.title),
        );
        for (i, panel) in self.panels.iter().enumerate() {
            let offset = TITLE_HEIGHT + PANEL_HEIGHT * i as f64;
            let _ = write!(svg, r#"<g transform="translate(0,{offset:.2})">"#);
            match panel {
                Panel::Lines {
                    title,
                    dates,
                    lines,
                    guides,
                    format,
                } => render_lines(&mut svg, title, dates, lines, guides, *format),
                Panel::Bars {
                    title,
                    labels,
                    values,
                    guides,
                    format,
                } => render_bars(&mut svg, title, labels, values, guides, *format),
            }
            svg.push_str("</g>");
        }
        svg.push_str("</svg>");
        svg
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn panel_title(svg: &mut String, title: &str) {
    let _ = write!(
        svg,
        r##"<text x="{LEFT_MARGIN}" y="16" text-anchor="start" font-size="12" fill="#333">{}</text>"##,
        escape(title)
    );
}

/// Min/max over finite values, widened when flat and optionally forced to
/// include zero.
fn extent(values: impl Iterator<Item = f64>, include_zero: bool) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if lo == hi {
        let adjust = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        lo -= adjust;
        hi += adjust;
    }
    Some((lo, hi))
}

fn scale_y(value: f64, lo: f64, hi: f64) -> f64 {
    let inner = PANEL_HEIGHT - 2.0 * PADDING;
    PADDING + (1.0 - (value - lo) / (hi - lo)) * inner
}

fn x_positions(len: usize) -> Vec<f64> {
    let inner = WIDTH - LEFT_MARGIN - PADDING;
    match len {
        0 => Vec::new(),
        1 => vec![LEFT_MARGIN + inner / 2.0],
        _ => (0..len)
            .map(|i| LEFT_MARGIN + inner * i as f64 / (len - 1) as f64)
            .collect(),
    }
}

fn no_data(svg: &mut String) {
    let _ = write!(
        svg,
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">no data</text>"#,
        x = WIDTH / 2.0,
        y = PANEL_HEIGHT / 2.0
    );
}

fn y_grid(svg: &mut String, lo: f64, hi: f64, format: ValueFormat) {
    for i in 0..=4 {
        let value = lo + (hi - lo) * i as f64 / 4.0;
        let y = scale_y(value, lo, hi);
        let _ = write!(
            svg,
            r##"<line x1="{LEFT_MARGIN}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#eeeeee" stroke-width="1" /><text x="{tx:.2}" y="{y:.2}" text-anchor="end" dy="3">{label}</text>"##,
            x2 = WIDTH - PADDING,
            tx = LEFT_MARGIN - 6.0,
            label = format.format(value)
        );
    }
}

fn draw_guides(svg: &mut String, guides: &[Guide], lo: f64, hi: f64) {
    for guide in guides {
        let y = scale_y(guide.value, lo, hi);
        let _ = write!(
            svg,
            r#"<line x1="{LEFT_MARGIN}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1" stroke-dasharray="4 3" />"#,
            x2 = WIDTH - PADDING,
            color = guide.color
        );
        if let Some(label) = &guide.label {
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" fill="{color}" font-size="9">{label}</text>"#,
                x = WIDTH - PADDING,
                y = y - 4.0,
                color = guide.color,
                label = escape(label)
            );
        }
    }
}

/// Indices of the dates that get an axis label: month boundaries, thinned
/// to at most [`MAX_AXIS_LABELS`]. Short ranges label the first and last
/// date instead; the flag tells which case applied.
fn axis_label_indices(dates: &[Date]) -> (Vec<usize>, bool) {
    let mut boundaries: Vec<usize> = dates
        .iter()
        .enumerate()
        .filter(|(i, d)| *i == 0 || (d.year(), d.month()) != (dates[i - 1].year(), dates[i - 1].month()))
        .map(|(i, _)| i)
        .collect();
    if boundaries.len() < 3 {
        boundaries = vec![0];
        if dates.len() > 1 {
            boundaries.push(dates.len() - 1);
        }
        return (boundaries, false);
    }
    let step = boundaries.len().div_ceil(MAX_AXIS_LABELS);
    (boundaries.into_iter().step_by(step).collect(), true)
}

fn time_axis(svg: &mut String, dates: &[Date], xs: &[f64]) {
    let axis_y = PANEL_HEIGHT - PADDING + 5.0;
    let _ = write!(
        svg,
        r##"<line x1="{LEFT_MARGIN}" y1="{axis_y:.2}" x2="{x2:.2}" y2="{axis_y:.2}" stroke="#000" stroke-width="1" />"##,
        x2 = WIDTH - PADDING
    );
    let (indices, monthly) = axis_label_indices(dates);
    for idx in indices {
        let (Some(date), Some(x)) = (dates.get(idx), xs.get(idx)) else {
            continue;
        };
        let label = if monthly {
            format!("{:04}-{:02}", date.year(), date.month())
        } else {
            date.to_string()
        };
        let _ = write!(
            svg,
            r##"<line x1="{x:.2}" y1="{axis_y:.2}" x2="{x:.2}" y2="{tick:.2}" stroke="#ccc" stroke-width="1" /><text x="{x:.2}" y="{ty:.2}" text-anchor="middle">{label}</text>"##,
            tick = axis_y + 4.0,
            ty = axis_y + 16.0
        );
    }
}

fn legend(svg: &mut String, lines: &[Line]) {
    let x = LEFT_MARGIN + 10.0;
    let mut y = PADDING + 10.0;
    for line in lines.iter().filter(|l| !l.label.is_empty()) {
        let _ = write!(
            svg,
            r##"<line x1="{x:.2}" y1="{ly:.2}" x2="{x2:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="1.5" stroke-dasharray="{dash}" /><text x="{tx:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            ly = y - 4.0,
            x2 = x + 20.0,
            tx = x + 26.0,
            color = line.color,
            dash = if line.dash { "4 3" } else { "0" },
            label = escape(&line.label)
        );
        y += 14.0;
    }
}

fn render_lines(
    svg: &mut String,
    title: &str,
    dates: &[Date],
    lines: &[Line],
    guides: &[Guide],
    format: ValueFormat,
) {
    panel_title(svg, title);
    let values = lines
        .iter()
        .flat_map(|l| l.points.iter().map(|(_, v)| *v))
        .chain(guides.iter().map(|g| g.value));
    let Some((lo, hi)) = extent(values, false) else {
        no_data(svg);
        return;
    };

    let xs = x_positions(dates.len());
    y_grid(svg, lo, hi, format);
    draw_guides(svg, guides, lo, hi);

    for line in lines {
        let coords: Vec<String> = line
            .points
            .iter()
            .filter(|(i, v)| *i < xs.len() && v.is_finite())
            .map(|(i, v)| format!("{:.2},{:.2}", xs[*i], scale_y(*v, lo, hi)))
            .collect();
        if coords.is_empty() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="{width}" stroke-dasharray="{dash}" points="{points}" />"#,
            color = line.color,
            width = line.width,
            dash = if line.dash { "4 3" } else { "0" },
            points = coords.join(" ")
        );
    }

    time_axis(svg, dates, &xs);
    legend(svg, lines);
}

fn render_bars(
    svg: &mut String,
    title: &str,
    labels: &[String],
    values: &[f64],
    guides: &[Guide],
    format: ValueFormat,
) {
    panel_title(svg, title);
    let all = values.iter().copied().chain(guides.iter().map(|g| g.value));
    let Some((lo, hi)) = extent(all, true) else {
        no_data(svg);
        return;
    };

    y_grid(svg, lo, hi, format);
    draw_guides(svg, guides, lo, hi);

    let inner = WIDTH - LEFT_MARGIN - PADDING;
    let slot = inner / values.len().max(1) as f64;
    let bar_width = slot * 0.6;
    let zero = scale_y(0.0, lo, hi);
    for (i, (label, value)) in labels.iter().zip(values).enumerate() {
        if !value.is_finite() {
            continue;
        }
        let center = LEFT_MARGIN + slot * (i as f64 + 0.5);
        let y = scale_y(*value, lo, hi);
        let (top, bottom) = if y < zero { (y, zero) } else { (zero, y) };
        let fill = if *value >= 0.0 { UP_COLOR } else { DOWN_COLOR };
        let _ = write!(
            svg,
            r##"<rect x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{h:.2}" fill="{fill}" /><text x="{center:.2}" y="{vy:.2}" text-anchor="middle" fill="#333">{value_label}</text><text x="{center:.2}" y="{ly:.2}" text-anchor="middle">{label}</text>"##,
            x = center - bar_width / 2.0,
            h = bottom - top,
            vy = top - 4.0,
            value_label = format.format(*value),
            ly = PANEL_HEIGHT - PADDING + 16.0,
            label = escape(label)
        );
    }
    let _ = write!(
        svg,
        r##"<line x1="{LEFT_MARGIN}" y1="{zero:.2}" x2="{x2:.2}" y2="{zero:.2}" stroke="#000" stroke-width="1" />"##,
        x2 = WIDTH - PADDING
    );
}
