use std::time::Duration;

use dioxus::prelude::*;
use tracing::warn;

use crate::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);
const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Success => "toast toast-success",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Error => "toast toast-error",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ",
            ToastKind::Success => "✓",
            ToastKind::Warning => "!",
            ToastKind::Error => "✕",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

/// Appends `message`, dropping the oldest entries beyond the visible cap.
fn enqueue(entries: &mut Vec<ToastMessage>, message: ToastMessage) {
    entries.push(message);
    let overflow = entries.len().saturating_sub(MAX_VISIBLE);
    entries.drain(..overflow);
}

pub fn push_toast(mut toasts: Signal<Vec<ToastMessage>>, kind: ToastKind, message: impl Into<String>) {
    let message = ToastMessage::new(kind, message);
    if kind == ToastKind::Error {
        warn!(target: "boxrate::ui", "{}", message.text);
    }
    toasts.with_mut(|entries| enqueue(entries, message));
}

#[component]
pub fn Toasts() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! {};
    }

    rsx! {
        ul { class: "toast-stack",
            for message in messages {
                ToastCard { key: "{message.id}", message: message.clone(), toasts }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let id = message.id.clone();
    use_future(move || {
        let id = id.clone();
        async move {
            tokio::time::sleep(TOAST_AUTO_DISMISS).await;
            let mut toasts = toasts;
            toasts.with_mut(|items| items.retain(|toast| toast.id != id));
        }
    });

    let dismiss_id = message.id.clone();
    rsx! {
        li { class: message.kind.class(),
            span { class: "toast-icon", "{message.kind.icon()}" }
            p { class: "toast-text", "{message.text}" }
            button {
                class: "toast-dismiss",
                onclick: move |_| {
                    let mut toasts = toasts;
                    toasts.with_mut(|items| items.retain(|toast| toast.id != dismiss_id));
                },
                "Dismiss"
            }
        }
    }
}
