use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use crate::cli::Workspace;
use crate::delegate::{Delegator, Mode};
use crate::tool::CommandRenderer;

pub fn run(root: Option<&Path>, config_path: Option<&Path>, timeout: Option<u64>) -> Result<()> {
    let mut ws = Workspace::load(root, config_path)?;
    ws.apply_timeout(timeout)?;

    let renderer = CommandRenderer::new(ws.config.tool.clone());
    let report = Delegator::new(&ws.root, &ws.config.discovery, &renderer).run(Mode::Check)?;

    if !report.is_up_to_date() {
        let stale: Vec<String> = report
            .stale
            .iter()
            .map(|dir| {
                dir.strip_prefix(&ws.root)
                    .unwrap_or(dir)
                    .display()
                    .to_string()
            })
            .collect();
        bail!(
            "{} out of date in {} director{}: {}",
            ws.config.discovery.output,
            stale.len(),
            if stale.len() == 1 { "y" } else { "ies" },
            stale.join(", ")
        );
    }

    info!(
        "All {} {} file(s) are up to date",
        report.processed.len(),
        ws.config.discovery.output
    );
    Ok(())
}
