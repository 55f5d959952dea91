use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;
use tracing::{info, warn};

use crate::domain::{Catalog, CatalogError};

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

const RATE_SHEET_ASSET: &str = "rate_sheet_us.json";

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();

/// Returns the contents of `assets/main.css`.
pub fn main_css() -> &'static str {
    MAIN_CSS
        .get_or_init(|| load_text("main.css").unwrap_or_default())
        .as_str()
}

/// Returns an inline data URI for the SVG favicon.
pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| {
            let svg = load_text("favicon.svg").unwrap_or_default();
            svg_data_uri(&svg)
        })
        .as_str()
}

/// Builds the catalog from the embedded rate sheet, falling back to the
/// compiled-in table when the asset is missing or invalid.
pub fn load_catalog() -> Catalog {
    match embedded_catalog() {
        Ok(catalog) => {
            info!(
                target: "boxrate::catalog",
                jurisdiction = %catalog.rate_sheet.jurisdiction,
                brackets = catalog.rate_sheet.general.len(),
                "loaded rate sheet"
            );
            catalog
        }
        Err(err) => {
            warn!(target: "boxrate::catalog", "using built-in rate sheet: {err}");
            Catalog::default()
        }
    }
}

fn embedded_catalog() -> Result<Catalog, CatalogError> {
    let raw = load_text(RATE_SHEET_ASSET)
        .ok_or_else(|| CatalogError::MissingAsset(RATE_SHEET_ASSET.to_string()))?;
    Catalog::from_sheet_json(&raw)
}

fn load_text(path: &str) -> Option<String> {
    let asset = load_asset(path)?;
    match String::from_utf8(asset.into_owned()) {
        Ok(text) => Some(text),
        Err(_) => {
            warn!(target: "boxrate::assets", "embedded asset {path} is not valid UTF-8");
            None
        }
    }
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    let asset = EmbeddedAssets::get(&canonical).map(|file| file.data);
    if asset.is_none() {
        warn!(target: "boxrate::assets", "embedded asset {path} not found");
    }
    asset
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    trimmed.strip_prefix("assets/").unwrap_or(trimmed).to_string()
}

fn svg_data_uri(svg: &str) -> String {
    let escaped = svg
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('"', "'")
        .replace('\n', " ");
    format!("data:image/svg+xml;utf8,{escaped}")
}
