//! Archive path helpers.

/// Convert a raw archive member name to a forward-slash path without a leading `./` or `/`.
pub fn normalize_path(raw: &str) -> String {
    let replaced = raw.replace('\\', "/");
    let trimmed = replaced.trim_start_matches("./").trim_start_matches('/');
    trimmed.to_string()
}

/// Drop the first path segment (the `<repo>-<ref>/` directory archives wrap everything in).
///
/// Returns `None` for the root directory itself.
pub fn strip_archive_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(root)?.strip_prefix('/')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Extension of the final segment, case preserved, with its leading dot (`""` if none).
pub fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize_path("repo\\src\\main.py"), "repo/src/main.py");
        assert_eq!(normalize_path("./repo/a.py"), "repo/a.py");
    }

    #[test]
    fn strip_root_requires_separator() {
        assert_eq!(strip_archive_root("repo-main/lib/a.py", "repo-main"), Some("lib/a.py"));
        assert_eq!(strip_archive_root("repo-main/", "repo-main"), None);
        assert_eq!(strip_archive_root("repo-mainx/a.py", "repo-main"), None);
    }

    #[test]
    fn extension_ignores_dotfiles_and_directories() {
        assert_eq!(extension_of("lib/module.PY"), ".PY");
        assert_eq!(extension_of("src.d/Makefile"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("types/index.d.ts"), ".ts");
    }
}
