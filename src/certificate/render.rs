//! Certificate rasterization and issue.
//!
//! Takes a [`Layout`] plan plus a [`FontSet`] and produces an encoded PNG.
//! Drawing is plain `image`/`imageproc` canvas work:
//!
//! | Element | Function |
//! |---|---|
//! | Header band, footer rule | `draw_filled_rect_mut` |
//! | Logo circle | `draw_filled_circle_mut` |
//! | Text lines | `draw_text_mut` + `text_size` for centering |
//! | Encode | `image` PNG codec, in-memory |
//!
//! [`issue`] is the full operation: render, name the file from the issue
//! timestamp, and archive a copy under the certificates directory. The
//! archive copy is best-effort — a failed write is noted on stderr and the
//! caller still gets the PNG bytes, because the learner's download must not
//! depend on local disk state.

use super::fonts::FontSet;
use super::layout::{self, Align, Branding, Layout, TextLine};
use ab_glyph::FontArc;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered certificate: encoded PNG plus its timestamped filename.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub png: Vec<u8>,
    pub filename: String,
}

/// Timestamp-suffixed certificate filename, e.g.
/// `neuro_niche_certificate_20260823_140211.png`.
pub fn filename(prefix: &str, issued_at: DateTime<Utc>) -> String {
    format!("{prefix}_{}.png", issued_at.format("%Y%m%d_%H%M%S"))
}

/// Rasterize a layout plan into PNG bytes.
pub fn render(plan: &Layout, fonts: &FontSet) -> Result<Vec<u8>, RenderError> {
    let mut canvas = RgbaImage::from_pixel(plan.width, plan.height, Rgba(plan.background));

    // Header band
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(0, 0).of_size(plan.width, plan.band_height),
        Rgba(plan.band_color),
    );

    // Logo: filled circle with the brand initials centered inside
    draw_filled_circle_mut(
        &mut canvas,
        plan.logo_center,
        plan.logo_radius,
        Rgba(plan.logo_color),
    );
    let glyph = &plan.logo_glyph;
    let glyph_font = fonts.font(glyph.weight);
    let glyph_scale = fonts.scale(glyph.size);
    let (glyph_w, glyph_h) = text_size(glyph_scale, glyph_font, &glyph.text);
    draw_text_mut(
        &mut canvas,
        Rgba(glyph.color),
        plan.logo_center.0 - glyph_w as i32 / 2,
        plan.logo_center.1 - glyph_h as i32 / 2,
        glyph_scale,
        glyph_font,
        &glyph.text,
    );

    for line in &plan.lines {
        draw_line(&mut canvas, line, fonts, plan.width);
    }

    // Footer separator rule
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(plan.rule_x0 as i32, plan.rule_y as i32)
            .of_size(plan.rule_x1 - plan.rule_x0, 3),
        Rgba(plan.rule_color),
    );

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn draw_line(canvas: &mut RgbaImage, line: &TextLine, fonts: &FontSet, canvas_width: u32) {
    let font: &FontArc = fonts.font(line.weight);
    let scale = fonts.scale(line.size);
    let (text_width, _) = text_size(scale, font, &line.text);
    let x = match line.align {
        Align::Center => (canvas_width.saturating_sub(text_width)) as i32 / 2,
        Align::Left(x) => x as i32,
        Align::Right(margin) => (canvas_width.saturating_sub(margin + text_width)) as i32,
    };
    draw_text_mut(canvas, Rgba(line.color), x, line.y as i32, scale, font, &line.text);
}

/// Render a certificate for `(name, score)` and archive a copy.
///
/// The copy goes to `certificates_dir/<prefix>_<YYYYMMDD_HHMMSS>.png`; the
/// directory is created on first use. A failed archive write is reported on
/// stderr only — the returned bytes are unaffected.
pub fn issue(
    name: &str,
    score: u32,
    max_score: u32,
    branding: &Branding,
    fonts: &FontSet,
    prefix: &str,
    certificates_dir: &Path,
    issued_at: DateTime<Utc>,
) -> Result<Certificate, RenderError> {
    let plan = layout::plan(name, score, max_score, branding, issued_at.date_naive());
    let png = render(&plan, fonts)?;
    let filename = filename(prefix, issued_at);

    if let Err(e) = archive_copy(certificates_dir, &filename, &png) {
        eprintln!(
            "warning: could not archive certificate to {}: {e}",
            certificates_dir.join(&filename).display()
        );
    }

    Ok(Certificate { png, filename })
}

fn archive_copy(dir: &Path, filename: &str, png: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(filename), png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::layout::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use chrono::TimeZone;

    fn branding() -> Branding {
        Branding {
            brand: "Neuro Niche".into(),
            tagline: "Practical neuroinclusion training".into(),
            course_title: "The Neuro Niche: Understanding Neurodiversity at Work".into(),
            issuer: "Neuro Niche Learning".into(),
        }
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 23, 14, 2, 11).unwrap()
    }

    #[test]
    fn filename_is_timestamp_suffixed() {
        assert_eq!(
            filename("neuro_niche_certificate", issued_at()),
            "neuro_niche_certificate_20260823_140211.png"
        );
    }

    #[test]
    fn rendered_png_decodes_at_fixed_dimensions() {
        for score in [0, 3, 5] {
            let plan = layout::plan("Ada", score, 5, &branding(), issued_at().date_naive());
            let png = render(&plan, &FontSet::builtin()).unwrap();

            let decoded = image::load_from_memory(&png).unwrap();
            assert_eq!(decoded.width(), CANVAS_WIDTH);
            assert_eq!(decoded.height(), CANVAS_HEIGHT);
        }
    }

    #[test]
    fn degraded_fonts_still_render() {
        let fonts = FontSet::load(
            Some(Path::new("/nonexistent/a.ttf")),
            Some(Path::new("/nonexistent/b.ttf")),
        );
        assert!(fonts.degraded());

        let plan = layout::plan("Ada", 5, 5, &branding(), issued_at().date_naive());
        let png = render(&plan, &fonts).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), CANVAS_WIDTH);
    }

    #[test]
    fn issue_writes_archive_copy() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("certificates");

        let certificate = issue(
            "Ada",
            5,
            5,
            &branding(),
            &FontSet::builtin(),
            "neuro_niche_certificate",
            &dir,
            issued_at(),
        )
        .unwrap();

        assert_eq!(
            certificate.filename,
            "neuro_niche_certificate_20260823_140211.png"
        );
        let archived = dir.join(&certificate.filename);
        assert!(archived.exists());
        assert_eq!(fs::read(&archived).unwrap(), certificate.png);
    }

    #[test]
    fn issue_survives_unwritable_archive_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        // A file where the directory should be makes create_dir_all fail
        let blocked = tmp.path().join("certificates");
        fs::write(&blocked, b"in the way").unwrap();

        let certificate = issue(
            "Ada",
            4,
            5,
            &branding(),
            &FontSet::builtin(),
            "neuro_niche_certificate",
            &blocked,
            issued_at(),
        )
        .unwrap();

        // Bytes are still returned and decodable
        let decoded = image::load_from_memory(&certificate.png).unwrap();
        assert_eq!(decoded.height(), CANVAS_HEIGHT);
    }

    #[test]
    fn blank_name_renders_without_error() {
        let plan = layout::plan("   ", 2, 5, &branding(), issued_at().date_naive());
        let png = render(&plan, &FontSet::builtin()).unwrap();
        assert!(image::load_from_memory(&png).is_ok());
    }
}
