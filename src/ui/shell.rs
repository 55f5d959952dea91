use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::SetupRepository;
use crate::infra::storage::JsonSetupRepository;
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let repository = use_context::<Signal<JsonSetupRepository>>();
    let saved = repository.with(|repo| repo.load_all().len());
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div { class: "app",
            header { class: "app-header",
                div { class: "app-header-inner",
                    div {
                        h1 { class: "app-title", "{APP_NAME}" }
                        p { class: theme::MUTED, "Mailer box dimensional weight and shipping cost" }
                    }
                    nav { class: "app-nav",
                        NavButton {
                            active: matches!(current_route, Route::Calculator {}),
                            onclick: move |_| { nav.push(Route::Calculator {}); },
                            label: "Calculator".to_string(),
                        }
                        NavButton {
                            active: matches!(current_route, Route::Setups {}),
                            onclick: move |_| { nav.push(Route::Setups {}); },
                            label: format!("Setups ({saved})"),
                        }
                    }
                }
            }
            main { class: theme::PAGE, {children} }
            footer { class: "app-footer {theme::MUTED}", "{APP_NAME} {version_label()}" }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: String) -> Element {
    rsx! {
        button {
            class: theme::nav_button(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
