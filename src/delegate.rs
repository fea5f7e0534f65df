//! The README regeneration pass over every package directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::discover::{self, Candidate};
use crate::tool::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Overwrite the output file with the tool's output.
    Write,
    /// Compare the tool's output with the existing file and write nothing.
    Check,
}

#[derive(Debug, Default)]
pub struct Report {
    pub processed: Vec<PathBuf>,
    /// Directories whose output file is missing or differs (check mode only).
    pub stale: Vec<PathBuf>,
}

impl Report {
    pub fn is_up_to_date(&self) -> bool {
        self.stale.is_empty()
    }
}

pub struct Delegator<'a, R: Renderer> {
    root: &'a Path,
    manifest: &'a str,
    output: &'a str,
    renderer: &'a R,
}

impl<'a, R: Renderer> Delegator<'a, R> {
    pub fn new(root: &'a Path, discovery: &'a DiscoveryConfig, renderer: &'a R) -> Self {
        Self {
            root,
            manifest: &discovery.manifest,
            output: &discovery.output,
            renderer,
        }
    }

    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        discover::find_candidates(self.root, self.manifest)
    }

    /// Run the renderer once per candidate, in order. The first failure
    /// aborts the pass; files already written are left in place.
    pub fn run(&self, mode: Mode) -> Result<Report> {
        let candidates = self.candidates()?;
        let mut report = Report::default();

        if candidates.is_empty() {
            info!(
                "No directories with {} under {}",
                self.manifest,
                self.root.display()
            );
            return Ok(report);
        }

        info!(
            "Running `{}` in {} director{}",
            self.renderer.describe(),
            candidates.len(),
            if candidates.len() == 1 { "y" } else { "ies" }
        );

        for candidate in &candidates {
            let target = candidate.dir.join(self.output);
            let rendered = self
                .renderer
                .render(&candidate.dir)
                .with_context(|| format!("Failed to generate {}", target.display()))?;

            match mode {
                Mode::Write => {
                    fs::write(&target, &rendered)
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    info!("{}: wrote {} ({} bytes)", candidate.name, self.output, rendered.len());
                }
                Mode::Check => {
                    if is_current(&target, &rendered)? {
                        debug!("{}: {} is up to date", candidate.name, self.output);
                    } else {
                        warn!("{}: {} is out of date", candidate.name, self.output);
                        report.stale.push(candidate.dir.clone());
                    }
                }
            }
            report.processed.push(candidate.dir.clone());
        }

        Ok(report)
    }
}

fn is_current(target: &Path, rendered: &[u8]) -> Result<bool> {
    match fs::read(target) {
        Ok(existing) => Ok(existing == rendered),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", target.display())),
    }
}
