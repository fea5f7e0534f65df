use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::Workspace;
use crate::discover;
use crate::tool::CommandRenderer;

struct CheckResult {
    passed: Vec<String>,
    errors: Vec<String>,
}

impl CheckResult {
    fn new() -> Self {
        Self {
            passed: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn pass(&mut self, msg: impl Into<String>) {
        self.passed.push(msg.into());
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
}

pub fn run(root: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(root, config_path)?;
    let results = check(&ws);
    print_results(&results);

    if !results.errors.is_empty() {
        bail!("{} configuration problem(s) found", results.errors.len());
    }
    Ok(())
}

fn check(ws: &Workspace) -> CheckResult {
    let mut results = CheckResult::new();
    let config = &ws.config;

    results.pass(format!("Root: {}", ws.root.display()));
    match &ws.config_source {
        Some(path) => results.pass(format!("Config loaded from {}", path.display())),
        None => results.pass("No config file found, using defaults"),
    }
    results.pass(format!(
        "Discovery: manifest = {}, output = {}",
        config.discovery.manifest, config.discovery.output
    ));

    match discover::find_candidates(&ws.root, &config.discovery.manifest) {
        Ok(found) => results.pass(format!("{} candidate director(ies)", found.len())),
        Err(e) => results.error(format!("Candidate scan failed: {:#}", e)),
    }

    let command = config.tool.display_command();
    if CommandRenderer::new(config.tool.clone()).is_available() {
        results.pass(format!("Tool found: {}", command));
    } else {
        results.error(format!(
            "Tool `{}` could not be started; is it installed and on PATH?",
            config.tool.program
        ));
    }

    match config.tool.timeout_secs {
        Some(secs) => results.pass(format!("Timeout: {}s", secs)),
        None => results.pass("Timeout: none"),
    }

    results
}

fn print_results(results: &CheckResult) {
    for msg in &results.passed {
        println!("  ok    {}", msg);
    }
    for msg in &results.errors {
        println!("  error {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_missing_program() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::load(Some(tmp.path()), None).unwrap();
        ws.config.tool.program = "readmes-no-such-program-xyz".to_string();

        let results = check(&ws);
        assert_eq!(results.errors.len(), 1);
        assert!(results.errors[0].contains("readmes-no-such-program-xyz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_reports_explicit_config() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("custom.toml");
        std::fs::write(&custom, "[tool]\nprogram = \"sh\"\n").unwrap();
        let ws = Workspace::load(Some(tmp.path()), Some(&custom)).unwrap();

        let results = check(&ws);
        let expected = format!("Config loaded from {}", custom.display());
        assert!(results.passed.contains(&expected));
        assert!(!results.passed.iter().any(|m| m.contains("using defaults")));
        assert!(results.passed.iter().any(|m| m == "Tool found: sh readme"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_available_program() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::load(Some(tmp.path()), None).unwrap();
        ws.config.tool.program = "sh".to_string();

        let results = check(&ws);
        assert!(results.errors.is_empty());
        assert!(results.passed.iter().any(|m| m.contains("0 candidate")));
    }
}
