use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::cli::Workspace;
use crate::discover;

pub fn run(root: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(root, config_path)?;
    let stdout = std::io::stdout();
    write_candidates(&ws.root, &ws.config.discovery.manifest, &mut stdout.lock())
}

/// One candidate directory per line, relative to `root`.
pub fn write_candidates(root: &Path, manifest: &str, out: &mut impl Write) -> Result<()> {
    for candidate in discover::find_candidates(root, manifest)? {
        let relative = candidate.dir.strip_prefix(root).unwrap_or(&candidate.dir);
        writeln!(out, "{}", relative.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_candidates() {
        let tmp = TempDir::new().unwrap();
        for name in ["tor-proto", "tor-bytes"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
            fs::write(tmp.path().join(name).join("Cargo.toml"), "").unwrap();
        }
        fs::create_dir(tmp.path().join("doc")).unwrap();

        let mut out = Vec::new();
        write_candidates(tmp.path(), "Cargo.toml", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "tor-bytes\ntor-proto\n");
    }

    #[test]
    fn test_write_candidates_empty() {
        let tmp = TempDir::new().unwrap();
        let mut out = Vec::new();
        write_candidates(tmp.path(), "Cargo.toml", &mut out).unwrap();
        assert!(out.is_empty());
    }
}
