//! Locating the repository root and the package directories under it

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A package directory: an immediate child of the root holding the manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub dir: PathBuf,
    pub name: String,
}

impl Candidate {
    fn from_manifest(manifest: &Path) -> Option<Self> {
        let dir = manifest.parent()?.to_path_buf();
        let name = dir.file_name()?.to_string_lossy().into_owned();
        Some(Self { dir, name })
    }
}

/// Default root: the parent of the directory holding the running executable.
pub fn default_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    root_from_executable(&exe)
}

pub fn root_from_executable(exe: &Path) -> Result<PathBuf> {
    let exe = exe
        .canonicalize()
        .with_context(|| format!("Failed to resolve executable path {}", exe.display()))?;
    match exe.parent().and_then(Path::parent) {
        Some(root) => Ok(root.to_path_buf()),
        None => bail!(
            "Executable {} has no parent directory to use as root",
            exe.display()
        ),
    }
}

/// Canonicalize an explicit `--root` argument.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Root directory not found: {}", path.display()))?;
    if !root.is_dir() {
        bail!("Root is not a directory: {}", root.display());
    }
    Ok(root)
}

/// Immediate subdirectories of `root` containing a file named `manifest`,
/// sorted by path. An empty result is not an error.
pub fn find_candidates(root: &Path, manifest: &str) -> Result<Vec<Candidate>> {
    // glob patterns are strings; a lossy root would silently match nothing.
    let Some(root_str) = root.to_str() else {
        bail!("Root path is not valid UTF-8: {}", root.display());
    };
    let pattern = format!(
        "{}/*/{}",
        glob::Pattern::escape(root_str),
        glob::Pattern::escape(manifest)
    );
    debug!("Scanning for candidates with pattern {}", pattern);

    // Hidden directories are skipped, as a shell `*` would skip them.
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let mut candidates = Vec::new();
    for entry in glob::glob_with(&pattern, options).context("Invalid candidate pattern")? {
        let manifest_path =
            entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !manifest_path.is_file() {
            trace!("Skipping non-file {}", manifest_path.display());
            continue;
        }
        if let Some(candidate) = Candidate::from_manifest(&manifest_path) {
            candidates.push(candidate);
        }
    }

    candidates.sort();
    candidates.dedup();
    debug!("Found {} candidate(s)", candidates.len());
    Ok(candidates)
}
