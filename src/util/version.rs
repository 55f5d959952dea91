pub const APP_NAME: &str = "BoxRate";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Latest git tag at build time, captured by `build.rs`.
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// `v0.3.0`, or the release tag when built from one, plus the short commit.
pub fn version_label() -> String {
    label_for(GIT_TAG, GIT_COMMIT, APP_VERSION)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn label_for(tag: Option<&str>, commit: Option<&str>, version: &str) -> String {
    let base = match non_blank(tag) {
        Some(tag) => tag.to_string(),
        None => format!("v{version}"),
    };
    match non_blank(commit) {
        Some(commit) => format!("{base} ({commit})"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_git_tag_over_package_version() {
        assert_eq!(label_for(Some("v0.3.1"), None, "0.3.0"), "v0.3.1");
        assert_eq!(label_for(None, None, "0.3.0"), "v0.3.0");
        assert_eq!(label_for(Some("  "), None, "0.3.0"), "v0.3.0");
    }

    #[test]
    fn commit_is_appended_when_known() {
        assert_eq!(label_for(None, Some("a1b2c3d"), "0.3.0"), "v0.3.0 (a1b2c3d)");
        assert_eq!(label_for(Some("v0.3.1"), Some(""), "0.3.0"), "v0.3.1");
    }
}
