//! Filesystem-based interpreter discovery

use super::PythonEnvironment;
use crate::error::{EnvironmentError, EnvironmentResult};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const VENV_CONFIG: &str = "pyvenv.cfg";

/// The parts of `pyvenv.cfg` that affect the search path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyvenvConfig {
    /// Directory of the base interpreter the venv was created from
    pub home: Option<PathBuf>,
    pub version: Option<String>,
    pub include_system_site_packages: bool,
}

impl PyvenvConfig {
    /// Parse `key = value` lines; unknown keys are ignored.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "home" => config.home = Some(PathBuf::from(value)),
                // virtualenv writes version_info = 3.11.4.final.0, venv writes version = 3.11.4
                "version" | "version_info" => {
                    if config.version.is_none() {
                        config.version = major_minor(value);
                    }
                }
                "include-system-site-packages" => {
                    config.include_system_site_packages = value.eq_ignore_ascii_case("true");
                }
                _ => {}
            }
        }

        config
    }
}

/// Discover the environment of the interpreter at `executable`.
pub fn discover(executable: &Path, extra_paths: &[PathBuf]) -> EnvironmentResult<PythonEnvironment> {
    if !executable.is_file() {
        return Err(EnvironmentError::InterpreterNotFound {
            path: executable.to_path_buf(),
        });
    }

    let prefix = install_prefix(executable);
    let venv = read_pyvenv_config(&prefix)?;

    let mut version = venv.as_ref().and_then(|cfg| cfg.version.clone());
    if version.is_none() {
        version = executable
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_prefix("python"))
            .and_then(major_minor);
    }

    let mut search_path = Vec::new();
    match &venv {
        Some(cfg) => {
            // A venv's base interpreter provides the stdlib; the venv itself
            // only contributes site-packages
            if let Some(home) = &cfg.home {
                let base_prefix = install_prefix_from_dir(home);
                let base = library_dirs(&base_prefix, version.as_deref())?;
                if version.is_none() {
                    version = base.version.clone();
                }
                search_path.extend(base.stdlib);
                if cfg.include_system_site_packages {
                    search_path.extend(base.site_packages);
                }
            }
            let own = library_dirs(&prefix, version.as_deref())?;
            if version.is_none() {
                version = own.version.clone();
            }
            search_path.extend(own.site_packages);
        }
        None => {
            let own = library_dirs(&prefix, version.as_deref())?;
            if version.is_none() {
                version = own.version.clone();
            }
            search_path.extend(own.stdlib);
            search_path.extend(own.site_packages);
        }
    }

    dedup_in_order(&mut search_path);
    if search_path.is_empty() {
        return Err(EnvironmentError::NoLibraryPaths {
            executable: executable.to_path_buf(),
            prefix,
        });
    }

    search_path.extend(extra_paths.iter().cloned());
    tracing::debug!(
        executable = %executable.display(),
        prefix = %prefix.display(),
        version = version.as_deref().unwrap_or("unknown"),
        roots = search_path.len(),
        "discovered python environment"
    );

    Ok(PythonEnvironment {
        executable: Some(executable.to_path_buf()),
        prefix: Some(prefix),
        version,
        search_path,
    })
}

/// Environment for queries without `pythonExecutable`.
///
/// Uses `configured` when given (and fails if it is unusable), otherwise the
/// first usable interpreter on `PATH`, otherwise the bare environment.
pub fn discover_default(
    configured: Option<&Path>,
    extra_paths: &[PathBuf],
) -> EnvironmentResult<PythonEnvironment> {
    if let Some(executable) = configured {
        return discover(executable, extra_paths);
    }

    let candidates = std::env::var_os("PATH")
        .map(|path_var| interpreters_on_path(&path_var))
        .unwrap_or_default();
    Ok(discover_first(candidates, extra_paths))
}

/// Every `python3` and `python` executable on a `PATH`-style list, in search order.
pub fn interpreters_on_path(path_var: &OsStr) -> Vec<PathBuf> {
    let names: &[&str] = if cfg!(windows) {
        &["python3.exe", "python.exe"]
    } else {
        &["python3", "python"]
    };

    std::env::split_paths(path_var)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .filter(|candidate| candidate.is_file())
        .collect()
}

/// The first candidate that yields an environment; shims and stubs without a
/// standard library are skipped.
fn discover_first(candidates: Vec<PathBuf>, extra_paths: &[PathBuf]) -> PythonEnvironment {
    for executable in &candidates {
        match discover(executable, extra_paths) {
            Ok(env) => return env,
            Err(e) => tracing::debug!("ignoring interpreter on PATH: {e}"),
        }
    }

    tracing::warn!(
        candidates = candidates.len(),
        "no usable Python interpreter on PATH; resolving against builtins only"
    );
    PythonEnvironment::bare(extra_paths)
}

struct LibraryDirs {
    stdlib: Vec<PathBuf>,
    site_packages: Vec<PathBuf>,
    version: Option<String>,
}

/// `<prefix>/bin/python` and `<prefix>/Scripts/python.exe` live one level
/// below the prefix; a Windows base install keeps `python.exe` in the prefix.
fn install_prefix(executable: &Path) -> PathBuf {
    let dir = executable.parent().unwrap_or_else(|| Path::new("."));
    install_prefix_from_dir(dir)
}

fn install_prefix_from_dir(dir: &Path) -> PathBuf {
    let is_script_dir = dir
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "bin" || name.eq_ignore_ascii_case("scripts"));

    match dir.parent() {
        Some(parent) if is_script_dir => parent.to_path_buf(),
        _ => dir.to_path_buf(),
    }
}

fn read_pyvenv_config(prefix: &Path) -> EnvironmentResult<Option<PyvenvConfig>> {
    let path = prefix.join(VENV_CONFIG);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|source| EnvironmentError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Some(PyvenvConfig::parse(&content)))
}

/// Locate stdlib and site-packages under a prefix, for both the POSIX
/// (`lib/pythonX.Y`) and Windows (`Lib`) layouts.
fn library_dirs(prefix: &Path, wanted_version: Option<&str>) -> EnvironmentResult<LibraryDirs> {
    let mut dirs = LibraryDirs {
        stdlib: Vec::new(),
        site_packages: Vec::new(),
        version: None,
    };

    for lib in ["lib", "lib64"] {
        let lib_dir = prefix.join(lib);
        if !lib_dir.is_dir() {
            continue;
        }
        let Some((version, versioned)) = pick_versioned_lib(&lib_dir, wanted_version)? else {
            continue;
        };
        dirs.version.get_or_insert(version);
        dirs.stdlib.push(versioned.clone());
        let dynload = versioned.join("lib-dynload");
        if dynload.is_dir() {
            dirs.stdlib.push(dynload);
        }
        for site in ["site-packages", "dist-packages"] {
            let site_dir = versioned.join(site);
            if site_dir.is_dir() {
                dirs.site_packages.push(site_dir);
            }
        }
    }

    // Only when no POSIX layout matched: case-insensitive filesystems report
    // `Lib` for `lib` as well
    let windows_lib = prefix.join("Lib");
    if dirs.stdlib.is_empty() && windows_lib.is_dir() {
        dirs.stdlib.push(windows_lib.clone());
        let dlls = prefix.join("DLLs");
        if dlls.is_dir() {
            dirs.stdlib.push(dlls);
        }
        let site_dir = windows_lib.join("site-packages");
        if site_dir.is_dir() {
            dirs.site_packages.push(site_dir);
        }
    }

    Ok(dirs)
}

/// Choose `pythonX.Y` inside a lib dir: the wanted version if present,
/// otherwise the highest one.
fn pick_versioned_lib(
    lib_dir: &Path,
    wanted_version: Option<&str>,
) -> EnvironmentResult<Option<(String, PathBuf)>> {
    let entries = std::fs::read_dir(lib_dir).map_err(|source| EnvironmentError::Io {
        path: lib_dir.to_path_buf(),
        source,
    })?;

    let mut found: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let version = major_minor(name.strip_prefix("python")?)?;
            Some((version, entry.path()))
        })
        .collect();

    if let Some(wanted) = wanted_version {
        if let Some(pos) = found.iter().position(|(v, _)| v == wanted) {
            return Ok(Some(found.swap_remove(pos)));
        }
    }

    found.sort_by_key(|(version, _)| version_key(version));
    Ok(found.pop())
}

/// `3.11.4.final.0` / `3.11` / `3.11t` → `3.11`
fn major_minor(raw: &str) -> Option<String> {
    let mut parts = raw.trim().split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor_raw = parts.next()?;
    let minor_digits: String = minor_raw.chars().take_while(char::is_ascii_digit).collect();
    let minor: u32 = minor_digits.parse().ok()?;
    Some(format!("{major}.{minor}"))
}

fn version_key(version: &str) -> (u32, u32) {
    let mut parts = version.split('.').map(|p| p.parse().unwrap_or(0));
    (parts.next().unwrap_or(0), parts.next().unwrap_or(0))
}

fn dedup_in_order(paths: &mut Vec<PathBuf>) {
    let mut seen = std::collections::HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
}
