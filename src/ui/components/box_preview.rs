use std::sync::OnceLock;

use dioxus::prelude::*;
use tracing::{debug, warn};

use crate::domain::{
    preview::{cuboid_faces, isometric_outline, svg_points},
    BoxStyle, PreviewMode,
};
use crate::ui::theme;

const CUBOID_LONGEST_PX: f64 = 150.0;
const ISO_VIEW_BOX: f64 = 220.0;
const ISO_PADDING: f64 = 12.0;

const PROBE_JS: &str = r#"return typeof CSS !== "undefined"
    && typeof CSS.supports === "function"
    && CSS.supports("transform-style", "preserve-3d");"#;

static PROBE_RESULT: OnceLock<bool> = OnceLock::new();

/// Asks the webview once whether 3D transforms render; later calls reuse the
/// first answer. A failed evaluation counts as "unsupported".
pub async fn probe_preview_mode() -> PreviewMode {
    if let Some(supported) = PROBE_RESULT.get() {
        return PreviewMode::from_probe(*supported);
    }
    let supported = match document::eval(PROBE_JS).join::<bool>().await {
        Ok(supported) => supported,
        Err(err) => {
            warn!(target: "boxrate::ui", "preview capability probe failed: {err}");
            false
        }
    };
    let supported = *PROBE_RESULT.get_or_init(|| supported);
    debug!(target: "boxrate::ui", supported, "preview capability probed");
    PreviewMode::from_probe(supported)
}

#[component]
pub fn BoxPreview(mode: PreviewMode, style: BoxStyle, length: f64, width: f64, height: f64) -> Element {
    let (face, edge) = theme::carton_colors(style);
    rsx! {
        div { class: "preview",
            match mode {
                PreviewMode::Css3d => rsx! {
                    Cuboid { length, width, height, face, edge }
                },
                // The flat drawing doubles as the placeholder until the probe answers.
                PreviewMode::Pending | PreviewMode::Isometric => rsx! {
                    IsometricBox { length, width, height, face, edge }
                },
            }
            p { class: "preview-caption", "{style.label()}" }
        }
    }
}

fn face_style(width: f64, height: f64, transform: &str, face: &str, edge: &str) -> String {
    format!(
        "width:{width:.1}px;height:{height:.1}px;margin-left:{:.1}px;margin-top:{:.1}px;\
         transform:{transform};background:{face};border-color:{edge};",
        -width / 2.0,
        -height / 2.0,
    )
}

#[component]
fn Cuboid(length: f64, width: f64, height: f64, face: &'static str, edge: &'static str) -> Element {
    let faces = cuboid_faces(length, width, height, CUBOID_LONGEST_PX);
    let (w, h, d) = (faces.width, faces.height, faces.depth);
    let sides = [
        ("front", w, h, format!("translateZ({:.1}px)", d / 2.0)),
        ("back", w, h, format!("rotateY(180deg) translateZ({:.1}px)", d / 2.0)),
        ("right", d, h, format!("rotateY(90deg) translateZ({:.1}px)", w / 2.0)),
        ("left", d, h, format!("rotateY(-90deg) translateZ({:.1}px)", w / 2.0)),
        ("top", w, d, format!("rotateX(90deg) translateZ({:.1}px)", h / 2.0)),
        ("bottom", w, d, format!("rotateX(-90deg) translateZ({:.1}px)", h / 2.0)),
    ];

    rsx! {
        div { class: "cuboid-scene",
            div { class: "cuboid",
                for (name, fw, fh, transform) in sides {
                    div {
                        key: "{name}",
                        class: "cuboid-face cuboid-{name}",
                        style: face_style(fw, fh, &transform, face, edge),
                    }
                }
            }
        }
    }
}

#[component]
fn IsometricBox(length: f64, width: f64, height: f64, face: &'static str, edge: &'static str) -> Element {
    let outline = isometric_outline(length, width, height, ISO_VIEW_BOX, ISO_PADDING);
    let view_box = format!("0 0 {0} {0}", outline.view_box);
    rsx! {
        svg {
            class: "isometric",
            view_box: "{view_box}",
            xmlns: "http://www.w3.org/2000/svg",
            polygon { points: svg_points(&outline.left), fill: "{face}", stroke: "{edge}", opacity: "0.85" }
            polygon { points: svg_points(&outline.right), fill: "{face}", stroke: "{edge}", opacity: "0.7" }
            polygon { points: svg_points(&outline.top), fill: "{face}", stroke: "{edge}" }
        }
    }
}
