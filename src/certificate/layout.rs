//! Certificate layout planning — pure functions, no rasterization.
//!
//! [`plan`] turns `(name, score, branding, date)` into a [`Layout`]: the
//! canvas size, the header band and logo geometry, and every text line with
//! its size, weight, vertical position, and alignment. Vertical positions are
//! a running offset proportional to canvas height; font sizes are
//! proportional to canvas width.
//!
//! Horizontal centering cannot be decided here — it needs the measured pixel
//! width of the rendered text, which depends on the font actually loaded.
//! The plan records the *intent* ([`Align::Center`]); the renderer computes
//! `x = (canvas_width - text_width) / 2` at draw time.
//!
//! Keeping the plan pure makes the whole layout unit-testable without fonts,
//! canvases, or PNG encoding.

use chrono::NaiveDate;

/// A4 portrait at 200 DPI.
pub const CANVAS_WIDTH: u32 = 1654;
pub const CANVAS_HEIGHT: u32 = 2339;

/// Fallback display name for a blank learner name.
pub const NAME_FALLBACK: &str = "Learner";

/// RGBA color.
pub type Color = [u8; 4];

pub const PAPER: Color = [250, 249, 246, 255];
pub const BAND: Color = [58, 46, 140, 255];
pub const BAND_TEXT: Color = [255, 255, 255, 255];
pub const INK: Color = [34, 34, 48, 255];
pub const ACCENT: Color = [58, 46, 140, 255];
pub const MUTED: Color = [110, 110, 125, 255];

/// Font weight of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Horizontal placement of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x = (canvas_width - text_width) / 2`, measured at render time.
    Center,
    /// Left edge at the given x.
    Left(u32),
    /// Right edge at `canvas_width - margin`.
    Right(u32),
}

/// One line of text to draw.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: String,
    /// Requested pixel height; the renderer may override it when degraded
    /// to the built-in fixed-size font.
    pub size: f32,
    pub weight: Weight,
    /// Top of the line, in canvas pixels.
    pub y: u32,
    pub align: Align,
    pub color: Color,
}

/// The complete drawing plan.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Colored band across the full width, from y = 0.
    pub band_height: u32,
    pub band_color: Color,
    /// Filled circle holding the logo glyph, centered at this point.
    pub logo_center: (i32, i32),
    pub logo_radius: i32,
    pub logo_color: Color,
    /// Brand initials drawn centered inside the circle.
    pub logo_glyph: TextLine,
    /// Every other text line, in draw order.
    pub lines: Vec<TextLine>,
    /// Footer separator: horizontal rule from `rule_x0` to `rule_x1` at `rule_y`.
    pub rule_y: u32,
    pub rule_x0: u32,
    pub rule_x1: u32,
    pub rule_color: Color,
}

/// Branding inputs for the certificate, taken from the lesson config.
#[derive(Debug, Clone)]
pub struct Branding {
    pub brand: String,
    pub tagline: String,
    pub course_title: String,
    pub issuer: String,
}

/// Initials of the brand name, at most two characters ("Neuro Niche" → "NN").
fn brand_initials(brand: &str) -> String {
    brand
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Resolve the display name: blank or whitespace-only falls back to
/// [`NAME_FALLBACK`].
pub fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() { NAME_FALLBACK } else { trimmed }
}

/// Build the drawing plan for a certificate.
pub fn plan(name: &str, score: u32, max_score: u32, branding: &Branding, date: NaiveDate) -> Layout {
    let w = CANVAS_WIDTH;
    let h = CANVAS_HEIGHT;
    let wf = w as f32;
    let hf = h as f32;

    let band_height = (hf * 0.17) as u32;
    let logo_center = ((wf * 0.14) as i32, (band_height as f32 * 0.5) as i32);
    let logo_radius = (band_height as f32 * 0.28) as i32;

    let brand_x = (wf * 0.24) as u32;
    let margin = (wf * 0.08) as u32;

    let logo_glyph = TextLine {
        text: brand_initials(&branding.brand),
        size: wf * 0.035,
        weight: Weight::Bold,
        // y is unused for the glyph — it is centered in the circle at render
        // time — but recorded for completeness.
        y: logo_center.1 as u32,
        align: Align::Center,
        color: ACCENT,
    };

    let mut lines = vec![
        TextLine {
            text: branding.brand.clone(),
            size: wf * 0.045,
            weight: Weight::Bold,
            y: (band_height as f32 * 0.30) as u32,
            align: Align::Left(brand_x),
            color: BAND_TEXT,
        },
        TextLine {
            text: branding.tagline.clone(),
            size: wf * 0.020,
            weight: Weight::Regular,
            y: (band_height as f32 * 0.58) as u32,
            align: Align::Left(brand_x),
            color: BAND_TEXT,
        },
    ];

    // Centered body stack: running offset down the canvas.
    let body = [
        ("Congratulations", wf * 0.050, Weight::Bold, 0.32, ACCENT),
        (display_name(name), wf * 0.062, Weight::Bold, 0.40, INK),
        (
            "has successfully completed the course",
            wf * 0.024,
            Weight::Regular,
            0.475,
            INK,
        ),
        (
            branding.course_title.as_str(),
            wf * 0.032,
            Weight::Bold,
            0.525,
            INK,
        ),
    ];
    for (text, size, weight, frac, color) in body {
        lines.push(TextLine {
            text: text.to_string(),
            size,
            weight,
            y: (hf * frac) as u32,
            align: Align::Center,
            color,
        });
    }
    lines.push(TextLine {
        text: format!("Score: {score}/{max_score}"),
        size: wf * 0.030,
        weight: Weight::Bold,
        y: (hf * 0.60) as u32,
        align: Align::Center,
        color: ACCENT,
    });

    // Footer: rule plus two small blocks, generation date left, issuer right.
    let rule_y = (hf * 0.88) as u32;
    lines.push(TextLine {
        text: format!("Issued on {}", date.format("%Y-%m-%d")),
        size: wf * 0.016,
        weight: Weight::Regular,
        y: (hf * 0.90) as u32,
        align: Align::Left(margin),
        color: MUTED,
    });
    lines.push(TextLine {
        text: branding.issuer.clone(),
        size: wf * 0.016,
        weight: Weight::Regular,
        y: (hf * 0.90) as u32,
        align: Align::Right(margin),
        color: MUTED,
    });

    Layout {
        width: w,
        height: h,
        background: PAPER,
        band_height,
        band_color: BAND,
        logo_center,
        logo_radius,
        logo_color: BAND_TEXT,
        logo_glyph,
        lines,
        rule_y,
        rule_x0: margin,
        rule_x1: w - margin,
        rule_color: MUTED,
    }
}
