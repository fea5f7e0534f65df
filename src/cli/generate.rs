use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::cli::Workspace;
use crate::delegate::{Delegator, Mode};
use crate::tool::CommandRenderer;

pub fn run(root: Option<&Path>, config_path: Option<&Path>, timeout: Option<u64>) -> Result<()> {
    let mut ws = Workspace::load(root, config_path)?;
    ws.apply_timeout(timeout)?;

    let renderer = CommandRenderer::new(ws.config.tool.clone());
    let report = Delegator::new(&ws.root, &ws.config.discovery, &renderer).run(Mode::Write)?;

    info!(
        "Regenerated {} {} file(s) under {}",
        report.processed.len(),
        ws.config.discovery.output,
        ws.root.display()
    );
    Ok(())
}
