#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway directory of Python sources
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A virtualenv-shaped directory: `bin/python`, `pyvenv.cfg` and a
/// `lib/python3.11/site-packages` holding the given packages.
pub struct FakeVenv {
    pub dir: TempDir,
}

impl FakeVenv {
    pub fn new(packages: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join("bin/python"), "").unwrap();
        fs::write(root.join("pyvenv.cfg"), "version = 3.11.7\n").unwrap();

        let site = root.join("lib/python3.11/site-packages");
        fs::create_dir_all(&site).unwrap();
        for (path, content) in packages {
            let file = site.join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        Self { dir }
    }

    pub fn python(&self) -> PathBuf {
        self.dir.path().join("bin/python")
    }

    pub fn site_packages(&self) -> PathBuf {
        self.dir.path().join("lib/python3.11/site-packages")
    }
}

/// 1-indexed (line, column) of the `nth` occurrence of `needle` in `code`
pub fn position_of(code: &str, needle: &str, nth: usize) -> (u32, u32) {
    let offset = code
        .match_indices(needle)
        .nth(nth)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("'{needle}' occurrence {nth} not found"));
    let before = &code[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = code[line_start..offset].chars().count() + 1;
    (line as u32, column as u32)
}
