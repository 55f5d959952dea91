use dioxus::prelude::*;

use crate::domain::RateOutcome;
use crate::ui::theme;

/// Shows whether the current route was priced, with the reason as a tooltip.
#[component]
pub fn RateBadge(outcome: RateOutcome) -> Element {
    let (label, class) = theme::rate_badge(&outcome);
    let detail = outcome.describe();
    rsx! {
        span { class: "{class}", title: "{detail}", "{label}" }
    }
}
