use dioxus::prelude::*;

use crate::ui::theme;

#[derive(Clone, PartialEq)]
pub struct SetupRow {
    pub id: String,
    pub name: String,
    pub created: String,
    pub summary: String,
    pub stored_total: f64,
    pub current_total: f64,
}

impl SetupRow {
    /// True when repricing under the current catalog moves the total by a cent or more.
    pub fn drifted(&self) -> bool {
        (self.current_total - self.stored_total).abs() >= 0.005
    }
}

#[component]
pub fn SetupTable(
    rows: Vec<SetupRow>,
    on_load: EventHandler<String>,
    on_rename: EventHandler<(String, String)>,
    on_delete: EventHandler<String>,
) -> Element {
    let editing = use_signal(|| None::<(String, String)>);
    let is_empty = rows.is_empty();

    rsx! {
        div { class: "table-wrap",
            table { class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Saved" }
                        th { "Carton" }
                        th { class: "num", "Total (saved)" }
                        th { class: "num", "Total (now)" }
                        th {}
                    }
                }
                tbody {
                    for row in rows {
                        SetupRowView {
                            key: "{row.id}",
                            row: row.clone(),
                            editing,
                            on_load,
                            on_rename,
                            on_delete,
                        }
                    }
                    if is_empty {
                        tr {
                            td { class: "table-empty {theme::MUTED}", colspan: "6",
                                "No saved setups yet. Save one from the calculator."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SetupRowView(
    row: SetupRow,
    editing: Signal<Option<(String, String)>>,
    on_load: EventHandler<String>,
    on_rename: EventHandler<(String, String)>,
    on_delete: EventHandler<String>,
) -> Element {
    let mut editing = editing;
    let draft = editing().filter(|(id, _)| id == &row.id).map(|(_, draft)| draft);
    let drift_class = if row.drifted() { "num drift" } else { "num" };

    let load_id = row.id.clone();
    let delete_id = row.id.clone();
    let rename_id = row.id.clone();
    let start_name = row.name.clone();
    let start_id = row.id.clone();

    rsx! {
        tr {
            td {
                if let Some(draft) = draft {
                    input {
                        class: theme::INPUT,
                        value: "{draft}",
                        autofocus: true,
                        oninput: move |evt| {
                            let id = rename_id.clone();
                            editing.set(Some((id, evt.value())));
                        },
                        onkeydown: move |evt| {
                            if evt.key() == Key::Escape {
                                editing.set(None);
                            }
                        },
                    }
                } else {
                    span { class: "setup-name", "{row.name}" }
                }
            }
            td { class: theme::MUTED, "{row.created}" }
            td { "{row.summary}" }
            td { class: "num", {format!("{:.2}", row.stored_total)} }
            td { class: drift_class, {format!("{:.2}", row.current_total)} }
            td { class: "row-actions",
                if editing().is_some_and(|(id, _)| id == row.id) {
                    button {
                        class: theme::BTN_SMALL,
                        onclick: move |_| {
                            if let Some(pending) = editing() {
                                on_rename.call(pending);
                            }
                            editing.set(None);
                        },
                        "Save name"
                    }
                } else {
                    button {
                        class: theme::BTN_SMALL,
                        onclick: move |_| on_load.call(load_id.clone()),
                        "Load"
                    }
                    button {
                        class: theme::BTN_SMALL,
                        onclick: move |_| editing.set(Some((start_id.clone(), start_name.clone()))),
                        "Rename"
                    }
                }
                button {
                    class: theme::BTN_DANGER,
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}
