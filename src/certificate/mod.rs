//! Certificate generation — a fixed-layout PNG awarded at completion.
//!
//! | Concern | Module |
//! |---|---|
//! | **Layout plan** (pure geometry + text) | [`layout`] |
//! | **Font loading + fallback** | [`fonts`] |
//! | **Rasterize + encode + archive** | [`render`] |
//!
//! The certificate is derived, not authoritative: it can be regenerated at
//! will from `(name, score)` — see the `certificate` CLI command.

pub mod fonts;
pub mod layout;
pub mod render;

pub use fonts::FontSet;
pub use layout::{Branding, display_name};
pub use render::{Certificate, RenderError, issue};
