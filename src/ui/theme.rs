//! Shared class names so pages and components stay visually consistent.
//! The rules themselves live in `assets/main.css`.

use crate::domain::{BoxStyle, RateOutcome};

// ============================================
// LAYOUT
// ============================================

pub const PAGE: &str = "page";
pub const PANEL: &str = "panel";
pub const PANEL_TITLE: &str = "panel-title";
pub const GRID_2: &str = "grid grid-2";
pub const GRID_3: &str = "grid grid-3";
pub const MUTED: &str = "text-muted";

// ============================================
// CONTROLS
// ============================================

pub const INPUT: &str = "input";
pub const SELECT: &str = "input select";
pub const BTN_PRIMARY: &str = "btn btn-primary";
pub const BTN_SECONDARY: &str = "btn btn-secondary";
pub const BTN_DANGER: &str = "btn btn-small btn-danger";
pub const BTN_SMALL: &str = "btn btn-small";

pub fn toggle(active: bool) -> &'static str {
    if active {
        "toggle toggle-active"
    } else {
        "toggle"
    }
}

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn nav-btn-active"
    } else {
        "nav-btn"
    }
}

// ============================================
// STATUS
// ============================================

pub fn rate_badge(outcome: &RateOutcome) -> (&'static str, &'static str) {
    match outcome {
        RateOutcome::Quoted(_) => ("Priced", "badge badge-ok"),
        RateOutcome::Unsupported { .. } => ("Not priced", "badge badge-warn"),
        RateOutcome::Failed(_) => ("Rate error", "badge badge-error"),
    }
}

// ============================================
// PREVIEW
// ============================================

/// (face, edge) colours per carton style.
pub fn carton_colors(style: BoxStyle) -> (&'static str, &'static str) {
    match style {
        BoxStyle::Mailer => ("#d9a066", "#8a5a2b"),
        BoxStyle::Shipper => ("#c49a6c", "#6f4a25"),
        BoxStyle::Tuck => ("#e8e1d4", "#8c8372"),
    }
}
