use anyhow::Result;
use eventide_core::DateWindow;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{Render, format_date_label};

pub fn run(ctx: &Context, window: DateWindow, json: bool) -> Result<()> {
    let expansion = ctx.expand(window)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&expansion)?);
        return Ok(());
    }

    for skipped in &expansion.skipped {
        eprintln!("{}", skipped.render());
    }

    if expansion.instances.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group instances by day and print
    let today = chrono::Local::now().date_naive();
    let mut current_date = None;

    for instance in &expansion.instances {
        if current_date != Some(instance.date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(instance.date, today).bold());
            current_date = Some(instance.date);
        }

        println!("  {}", instance.render());
    }

    if expansion.truncated {
        println!();
        println!(
            "{}",
            format!(
                "Showing the first {} events; narrow the range with --to",
                expansion.instances.len()
            )
            .yellow()
        );
    }

    Ok(())
}
