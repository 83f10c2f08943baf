//! In-memory ZIP archive reading

use std::collections::HashSet;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;
use crate::utils::{normalize_path, strip_archive_root};

/// One file inside the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Read every file entry of a ZIP held in memory, in archive order.
///
/// Host snapshots wrap the tree in a single `<repo>-<ref>/` directory entry.
/// That directory is stripped from the paths when every file sits under it
/// and the archive lists it as an explicit directory entry.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut raw = Vec::with_capacity(archive.len());
    let mut directories = HashSet::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            directories.insert(normalize_path(file.name()).trim_end_matches('/').to_string());
            continue;
        }
        let path = normalize_path(file.name());
        if path.is_empty() || path.ends_with('/') {
            continue;
        }
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;
        raw.push(ArchiveEntry { path, bytes: content });
    }

    let entries = match common_root(&raw).filter(|root| directories.contains(root)) {
        Some(root) => {
            debug!(%root, "stripping archive root directory");
            raw.into_iter()
                .filter_map(|entry| {
                    let path = strip_archive_root(&entry.path, &root)?.to_string();
                    Some(ArchiveEntry { path, bytes: entry.bytes })
                })
                .collect()
        }
        None => raw,
    };

    debug!(entries = entries.len(), "read archive");
    Ok(entries)
}

fn common_root(entries: &[ArchiveEntry]) -> Option<String> {
    let first = entries.first()?;
    let (root, _) = first.path.split_once('/')?;
    let prefix = format!("{root}/");
    if entries.iter().all(|e| e.path.starts_with(&prefix)) {
        Some(root.to_string())
    } else {
        None
    }
}

/// Locate the repository README at the archive root.
///
/// `README.md` wins over other README variants; lookup is case-insensitive.
pub fn find_readme(entries: &[ArchiveEntry]) -> Option<&ArchiveEntry> {
    let candidates = entries.iter().filter(|e| {
        !e.path.contains('/') && e.path.to_ascii_lowercase().starts_with("readme")
    });
    let mut fallback = None;
    for entry in candidates {
        if entry.path.eq_ignore_ascii_case("readme.md") {
            return Some(entry);
        }
        fallback.get_or_insert(entry);
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            if name.ends_with('/') {
                writer.add_directory(name.trim_end_matches('/'), options).expect("add dir");
            } else {
                writer.start_file(*name, options).expect("start file");
                writer.write_all(content.as_bytes()).expect("write file");
            }
        }
        writer.finish().expect("finish zip").into_inner()
    }

    #[test]
    fn strips_single_root_directory() {
        let zip = build_zip(&[
            ("project-main/", ""),
            ("project-main/README.md", "# hi"),
            ("project-main/lib/a.py", "x = 1"),
        ]);
        let entries = read_archive(&zip).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "lib/a.py"]);
        assert_eq!(entries[1].bytes, b"x = 1");
    }

    #[test]
    fn keeps_paths_without_common_root() {
        let zip = build_zip(&[("a/one.py", "1"), ("b/two.py", "2")]);
        let entries = read_archive(&zip).unwrap();
        assert_eq!(entries[0].path, "a/one.py");
        assert_eq!(entries[1].path, "b/two.py");
    }

    #[test]
    fn implicit_single_directory_is_kept() {
        let zip = build_zip(&[("tests/one.py", "1"), ("tests/two.py", "2")]);
        let entries = read_archive(&zip).unwrap();
        assert_eq!(entries[0].path, "tests/one.py");
        assert_eq!(entries[1].path, "tests/two.py");
    }

    #[test]
    fn garbage_is_not_an_archive() {
        let err = read_archive(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, crate::error::Error::Archive(_)));
    }

    #[test]
    fn readme_prefers_markdown() {
        let entries = vec![
            ArchiveEntry { path: "README.rst".into(), bytes: Vec::new() },
            ArchiveEntry { path: "docs/README.md".into(), bytes: Vec::new() },
            ArchiveEntry { path: "Readme.md".into(), bytes: Vec::new() },
        ];
        assert_eq!(find_readme(&entries).map(|e| e.path.as_str()), Some("Readme.md"));
        assert_eq!(find_readme(&entries[..2]).map(|e| e.path.as_str()), Some("README.rst"));
        assert!(find_readme(&entries[1..2]).is_none());
    }
}
