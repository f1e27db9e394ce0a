use std::path::PathBuf;

use anyhow::{Context as _, Result};
use eventide_core::DateWindow;
use eventide_core::ics::generate_ics;

use super::Context;
use crate::render::Render;

pub fn run(ctx: &Context, window: DateWindow, output: Option<PathBuf>) -> Result<()> {
    let expansion = ctx.expand(window)?;

    for skipped in &expansion.skipped {
        eprintln!("{}", skipped.render());
    }

    let ics = generate_ics(&expansion.instances, chrono::Utc::now())?;

    match output {
        Some(path) => {
            std::fs::write(&path, ics)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!(
                "Wrote {} events to {}",
                expansion.instances.len(),
                path.display()
            );
        }
        None => print!("{}", ics),
    }

    Ok(())
}
