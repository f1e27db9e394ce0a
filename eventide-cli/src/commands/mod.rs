pub mod expand;
pub mod export;
pub mod templates;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use eventide_core::config::EventideConfig;
use eventide_core::store::{DirTemplateStore, TemplateStore};
use eventide_core::{DateWindow, Expansion, expand_templates};

/// Config plus the template store every command reads from.
pub struct Context {
    pub config: EventideConfig,
    pub store: DirTemplateStore,
}

impl Context {
    pub fn load(templates: Option<PathBuf>) -> Result<Self> {
        let config = EventideConfig::load().context("Failed to load configuration")?;
        let dir = templates.unwrap_or_else(|| config.templates_path());

        tracing::debug!(templates = %dir.display(), "using template directory");

        Ok(Context {
            config,
            store: DirTemplateStore::new(dir),
        })
    }

    pub fn window(&self, from: Option<&str>, to: Option<&str>) -> Result<DateWindow> {
        let today = chrono::Local::now().date_naive();
        let window = DateWindow::from_args(from, to, today, self.config.window_days()?)?;
        Ok(window)
    }

    pub fn expand(&self, window: DateWindow) -> Result<Expansion> {
        let templates = self.store.list_active_templates()?;
        let expansion = expand_templates(
            &templates,
            window.start(),
            window.end(),
            &self.config.expansion_options(),
        )?;
        Ok(expansion)
    }
}
