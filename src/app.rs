use dioxus::{prelude::*, signals::Signal};
use tracing::{debug, warn};

use crate::{
    domain::AppState,
    infra::storage::JsonSetupRepository,
    ui::{
        components::{
            box_preview::probe_preview_mode,
            toast::{ToastMessage, Toasts},
        },
        pages::{CalculatorPage, SetupsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Calculator {},
    #[route("/setups")]
    Setups {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(|| AppState::new(assets::load_catalog()));
    use_hook({
        let mut state = state;
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state);

    let repository = use_signal(JsonSetupRepository::open_default);
    use_context_provider(|| repository);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    use_hook({
        let mut state = state;
        move || {
            spawn(async move {
                let mode = probe_preview_mode().await;
                debug!(target: "boxrate::ui", ?mode, "preview mode selected");
                state.with_mut(|st| st.preview = mode);
            });
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toasts {}
    }
}

/// Applies `apply` to the shared state and writes the form back to disk.
pub fn update_state(mut state: Signal<AppState>, apply: impl FnOnce(&mut AppState)) {
    state.with_mut(apply);
    persist_user_state(&state);
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(target: "boxrate::storage", "failed to persist user state: {err}");
    }
}

#[component]
pub fn Calculator() -> Element {
    rsx! { Shell { CalculatorPage {} } }
}

#[component]
pub fn Setups() -> Element {
    rsx! { Shell { SetupsPage {} } }
}
