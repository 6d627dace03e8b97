//! Minimal SVG drawing primitives for the static figures.
//!
//! Coordinates are printed with two decimals so identical inputs produce identical markup.

use crate::Result;
use core::fmt::Write;

pub const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";
pub const GRID_COLOR: &str = "#d0d0d0";
pub const AXIS_COLOR: &str = "#000000";

/// A rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Linear mapping from data values to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    /// A degenerate domain is widened by one unit on each side.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let domain = if (domain.1 - domain.0).abs() < f64::EPSILON {
            (domain.0 - 1.0, domain.1 + 1.0)
        } else {
            domain
        };
        Self { domain, range }
    }

    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// A plotting area with its two scales. The y axis grows upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plot {
    pub area: Rect,
    pub x: Scale,
    pub y: Scale,
}

impl Plot {
    #[must_use]
    pub fn new(area: Rect, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            area,
            x: Scale::new(x_domain, (area.left, area.right())),
            y: Scale::new(y_domain, (area.bottom(), area.top)),
        }
    }

    #[must_use]
    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x.map(x), self.y.map(y))
    }
}

/// Evenly spaced tick values at a 1, 2 or 5 step covering `[min, max]`.
#[must_use]
pub fn ticks(min: f64, max: f64, target: u32) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return vec![min];
    }

    let raw = span / f64::from(target);
    let magnitude = 10_f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n < 1.5 => magnitude,
        n if n < 3.0 => 2.0 * magnitude,
        n if n < 7.0 => 5.0 * magnitude,
        _ => 10.0 * magnitude,
    };

    let first = (min / step).ceil();
    let mut result = Vec::new();
    let mut k = first;
    while k * step <= max + step * 1e-9 {
        let value = k * step;
        // avoid printing "-0"
        result.push(if value == 0.0 { 0.0 } else { value });
        k += 1.0;
    }

    result
}

/// Format a tick value without trailing zeros.
#[must_use]
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

pub fn open<W: Write>(writer: &mut W, width: f64, height: f64) -> Result<()> {
    writeln!(
        writer,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"{FONT_FAMILY}\">"
    )?;
    writeln!(writer, "  <rect x=\"0\" y=\"0\" width=\"{width:.0}\" height=\"{height:.0}\" fill=\"#ffffff\"/>")?;
    Ok(())
}

pub fn close<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

pub fn text<W: Write>(writer: &mut W, x: f64, y: f64, anchor: Anchor, size: u32, content: &str) -> Result<()> {
    writeln!(
        writer,
        "  <text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{}\" font-size=\"{size}\">{}</text>",
        anchor.as_str(),
        escape(content)
    )?;
    Ok(())
}

pub fn title<W: Write>(writer: &mut W, x: f64, y: f64, content: &str) -> Result<()> {
    writeln!(
        writer,
        "  <text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\">{}</text>",
        escape(content)
    )?;
    Ok(())
}

pub fn line<W: Write>(writer: &mut W, from: (f64, f64), to: (f64, f64), color: &str, width: f64) -> Result<()> {
    writeln!(
        writer,
        "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"{width:.1}\"/>",
        from.0, from.1, to.0, to.1
    )?;
    Ok(())
}

pub fn polyline<W: Write>(writer: &mut W, points: &[(f64, f64)], color: &str, width: f64) -> Result<()> {
    if points.is_empty() {
        return Ok(());
    }

    write!(writer, "  <polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"{width:.1}\" points=\"")?;
    write_points(writer, points)?;
    writeln!(writer, "\"/>")?;
    Ok(())
}

pub fn polygon<W: Write>(writer: &mut W, points: &[(f64, f64)], fill: &str, opacity: f64) -> Result<()> {
    if points.is_empty() {
        return Ok(());
    }

    write!(writer, "  <polygon fill=\"{fill}\" fill-opacity=\"{opacity:.2}\" stroke=\"none\" points=\"")?;
    write_points(writer, points)?;
    writeln!(writer, "\"/>")?;
    Ok(())
}

/// Axis-aligned rectangle spanning two corners given in any order.
pub fn rect<W: Write>(writer: &mut W, a: (f64, f64), b: (f64, f64), fill: &str, stroke: Option<&str>) -> Result<()> {
    let (x, y) = (a.0.min(b.0), a.1.min(b.1));
    let (width, height) = ((a.0 - b.0).abs(), (a.1 - b.1).abs());

    write!(writer, "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{fill}\"")?;
    if let Some(stroke) = stroke {
        write!(writer, " stroke=\"{stroke}\" stroke-width=\"1\"")?;
    }
    writeln!(writer, "/>")?;
    Ok(())
}

fn write_points<W: Write>(writer: &mut W, points: &[(f64, f64)]) -> Result<()> {
    for (index, (x, y)) in points.iter().enumerate() {
        if index > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{x:.2},{y:.2}")?;
    }
    Ok(())
}

/// Horizontal grid lines with y tick labels, plus the axis labels.
pub fn y_axis<W: Write>(writer: &mut W, plot: &Plot, ticks: &[f64], label: &str) -> Result<()> {
    for &tick in ticks {
        let y = plot.y.map(tick);
        line(writer, (plot.area.left, y), (plot.area.right(), y), GRID_COLOR, 0.5)?;
        text(writer, plot.area.left - 8.0, y + 4.0, Anchor::End, 11, &format_tick(tick))?;
    }

    let x = plot.area.left - 58.0;
    let y = plot.area.top + plot.area.height / 2.0;
    writeln!(
        writer,
        "  <text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-size=\"12\" transform=\"rotate(-90 {x:.2} {y:.2})\">{}</text>",
        escape(label)
    )?;
    Ok(())
}

/// Tick marks and labels along the bottom edge, positioned by `plot.x`.
pub fn x_axis<W: Write>(writer: &mut W, plot: &Plot, ticks: &[f64], label: &str) -> Result<()> {
    let bottom = plot.area.bottom();
    line(writer, (plot.area.left, bottom), (plot.area.right(), bottom), AXIS_COLOR, 1.0)?;

    for &tick in ticks {
        let x = plot.x.map(tick);
        line(writer, (x, bottom), (x, bottom + 5.0), AXIS_COLOR, 1.0)?;
        text(writer, x, bottom + 18.0, Anchor::Middle, 11, &format_tick(tick))?;
    }

    if !label.is_empty() {
        text(writer, plot.area.left + plot.area.width / 2.0, bottom + 40.0, Anchor::Middle, 12, label)?;
    }
    Ok(())
}

/// Colour swatches with labels, stacked vertically from `origin`.
pub fn legend<W: Write>(writer: &mut W, origin: (f64, f64), entries: &[(&str, &str)]) -> Result<()> {
    let mut y = origin.1;
    for (label, color) in entries {
        rect(writer, (origin.0, y - 10.0), (origin.0 + 14.0, y + 2.0), color, None)?;
        text(writer, origin.0 + 20.0, y, Anchor::Start, 12, label)?;
        y += 18.0;
    }
    Ok(())
}
