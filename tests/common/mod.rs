//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const README: &str = "# Demo\n\nA demo repository.\n";

/// Fifteen substantive lines with docstrings and comments to strip.
pub const REAL_MODULE: &str = r#""""Module docstring."""
import os


def add(a, b):
    """Add two numbers."""
    # sum them
    return a + b


class Greeter:
    """Says hello."""

    def __init__(self, name):
        self.name = name

    def greet(self):
        return "hello " + self.name


VALUE = add(1, 2)
NAME = os.path.basename("x")
GREETER = Greeter(NAME)
DEBUG = False
"#;

/// Zip `files` under a single `root/` directory, the way hosting providers do.
pub fn build_zip(root: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory(root, options).expect("add root");
    for (path, content) in files {
        writer.start_file(format!("{root}/{path}"), options).expect("start file");
        writer.write_all(content).expect("write file");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// README, one real module, one test module and one cache file.
pub fn mock_repository() -> Vec<u8> {
    build_zip(
        "demo-master",
        &[
            ("README.md", README.as_bytes()),
            ("lib/real_module.py", REAL_MODULE.as_bytes()),
            ("lib/test/test_module.py", REAL_MODULE.as_bytes()),
            ("lib/__pycache__/cache.py", REAL_MODULE.as_bytes()),
        ],
    )
}
