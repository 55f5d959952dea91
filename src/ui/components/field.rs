use dioxus::prelude::*;

use crate::ui::theme;

/// Labelled text input for a numeric form value. The raw string is passed
/// through untouched; clamping happens in the engine.
#[component]
pub fn NumberField(
    label: String,
    value: String,
    unit: Option<String>,
    placeholder: Option<String>,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label { class: "field",
            span { class: "field-label", "{label}" }
            span { class: "field-control",
                input {
                    class: theme::INPUT,
                    r#type: "text",
                    inputmode: "decimal",
                    value: "{value}",
                    placeholder: placeholder.unwrap_or_default(),
                    oninput: move |evt| on_input.call(evt.value()),
                }
                if let Some(unit) = unit {
                    span { class: "field-unit", "{unit}" }
                }
            }
        }
    }
}

/// Mutually exclusive options rendered as toggle buttons.
#[component]
pub fn ToggleGroup(options: Vec<(String, String)>, selected: String, on_select: EventHandler<String>) -> Element {
    rsx! {
        div { class: "toggle-group",
            for (code, label) in options {
                button {
                    key: "{code}",
                    class: theme::toggle(code == selected),
                    onclick: {
                        let code = code.clone();
                        move |_| on_select.call(code.clone())
                    },
                    "{label}"
                }
            }
        }
    }
}
