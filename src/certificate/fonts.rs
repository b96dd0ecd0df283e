//! Certificate font loading with silent fallback.
//!
//! Resolution, per weight, first available wins:
//!
//! 1. The preferred regular/bold file named in `[certificate]` config —
//!    rendered at the sizes the layout asks for.
//! 2. The built-in DejaVu Sans pair embedded in the binary. An unconfigured
//!    weight simply uses this at full layout sizes; only when a *configured*
//!    file fails to load is the whole set degraded to one fixed text size —
//!    degraded but still functional.
//!
//! A failed load never surfaces as an error: the certificate always renders.

use crate::certificate::layout::Weight;
use ab_glyph::{FontArc, PxScale};
use std::fs;
use std::path::Path;

static BUILTIN_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUILTIN_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// The single size used for everything when degraded to the built-in font.
pub const DEGRADED_SIZE: f32 = 48.0;

/// The loaded font pair plus the degradation flag.
pub struct FontSet {
    regular: FontArc,
    bold: FontArc,
    degraded: bool,
}

impl FontSet {
    /// The embedded DejaVu pair, full layout sizes. Cannot fail.
    pub fn builtin() -> Self {
        Self {
            // The embedded assets are known-valid TTFs; a parse failure here
            // is a broken build, not a runtime condition.
            regular: FontArc::try_from_slice(BUILTIN_REGULAR)
                .unwrap_or_else(|e| panic!("embedded regular font is invalid: {e}")),
            bold: FontArc::try_from_slice(BUILTIN_BOLD)
                .unwrap_or_else(|e| panic!("embedded bold font is invalid: {e}")),
            degraded: false,
        }
    }

    /// Load the preferred fonts, resolving each weight independently.
    ///
    /// A `None` slot is "no preference" and takes the built-in font at full
    /// layout sizes. Only a *configured* file that is missing or invalid
    /// degrades the set to the single fixed size.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Self {
        let builtin = Self::builtin();
        let mut degraded = false;
        let mut resolve = |preferred: Option<&Path>, builtin: FontArc| match preferred {
            None => builtin,
            Some(path) => load_font(path).unwrap_or_else(|| {
                degraded = true;
                builtin
            }),
        };
        let regular = resolve(regular, builtin.regular);
        let bold = resolve(bold, builtin.bold);
        Self {
            regular,
            bold,
            degraded,
        }
    }

    pub fn degraded(&self) -> bool {
        self.degraded
    }

    /// Font for a layout weight.
    pub fn font(&self, weight: Weight) -> &FontArc {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    /// Effective pixel scale: the requested layout size, or the fixed
    /// degraded size when the preferred fonts were unavailable.
    pub fn scale(&self, requested: f32) -> PxScale {
        if self.degraded {
            PxScale::from(DEGRADED_SIZE)
        } else {
            PxScale::from(requested)
        }
    }
}

fn load_font(path: &Path) -> Option<FontArc> {
    let bytes = fs::read(path).ok()?;
    FontArc::try_from_vec(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fonts_parse() {
        let fonts = FontSet::builtin();
        assert!(!fonts.degraded());
        assert_eq!(fonts.scale(90.0), PxScale::from(90.0));
    }

    #[test]
    fn no_preference_is_not_degraded() {
        let fonts = FontSet::load(None, None);
        assert!(!fonts.degraded());
    }

    #[test]
    fn missing_preferred_font_degrades_to_fixed_size() {
        let fonts = FontSet::load(
            Some(Path::new("/nonexistent/font.ttf")),
            Some(Path::new("/nonexistent/font-bold.ttf")),
        );
        assert!(fonts.degraded());
        assert_eq!(fonts.scale(90.0), PxScale::from(DEGRADED_SIZE));
        assert_eq!(fonts.scale(24.0), PxScale::from(DEGRADED_SIZE));
    }

    #[test]
    fn single_configured_font_does_not_degrade_the_pair() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bold = tmp.path().join("bold.ttf");
        std::fs::write(&bold, BUILTIN_BOLD).unwrap();

        // Regular unconfigured, bold configured and valid
        let fonts = FontSet::load(None, Some(&bold));
        assert!(!fonts.degraded());
        assert_eq!(fonts.scale(90.0), PxScale::from(90.0));
    }

    #[test]
    fn single_configured_font_that_fails_degrades() {
        let fonts = FontSet::load(Some(Path::new("/nonexistent/font.ttf")), None);
        assert!(fonts.degraded());
        assert_eq!(fonts.scale(90.0), PxScale::from(DEGRADED_SIZE));
    }

    #[test]
    fn invalid_font_file_degrades() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let fonts = FontSet::load(Some(&bogus), Some(&bogus));
        assert!(fonts.degraded());
    }

    #[test]
    fn valid_preferred_pair_loads_undegraded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let regular = tmp.path().join("regular.ttf");
        let bold = tmp.path().join("bold.ttf");
        std::fs::write(&regular, BUILTIN_REGULAR).unwrap();
        std::fs::write(&bold, BUILTIN_BOLD).unwrap();

        let fonts = FontSet::load(Some(&regular), Some(&bold));
        assert!(!fonts.degraded());
    }
}
