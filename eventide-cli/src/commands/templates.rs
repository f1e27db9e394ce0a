use anyhow::Result;
use eventide_core::RecurringEvent;
use eventide_core::store::TemplateStore;
use owo_colors::OwoColorize;

use super::Context;

pub fn run(ctx: &Context, all: bool) -> Result<()> {
    let templates = if all {
        ctx.store.templates()?
    } else {
        ctx.store.list_active_templates()?
    };

    if templates.is_empty() {
        println!(
            "{}",
            format!("No templates found in {}", ctx.store.dir().display()).dimmed()
        );
        return Ok(());
    }

    for template in templates {
        let inactive = !template.is_active;
        let header = format!("{} {}", template.id.bold(), template.title);

        match RecurringEvent::from_template(template) {
            Ok(event) => {
                let tag = if inactive { " (inactive)".dimmed().to_string() } else { String::new() };
                println!("{}{}", header, tag);
                println!("   {} from {}", event.rule, event.start_date());
                println!("   {}", format!("RRULE:{}", event.series_rrule()).dimmed());
            }
            Err(e) => {
                println!("{}", header);
                println!("   {}", e.to_string().red());
            }
        }
    }

    Ok(())
}
