//! Template stores.
//!
//! The admin side owns templates; expansion only ever needs the active ones.

use std::path::{Path, PathBuf};

use crate::error::{EventideError, EventideResult};
use crate::template::EventTemplate;

/// Source of event templates.
pub trait TemplateStore {
    /// Every template with `isActive == true`.
    fn list_active_templates(&self) -> EventideResult<Vec<EventTemplate>>;
}

/// Templates held in memory, e.g. already fetched by a host application.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: Vec<EventTemplate>,
}

impl MemoryTemplateStore {
    pub fn new(templates: Vec<EventTemplate>) -> Self {
        MemoryTemplateStore { templates }
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn list_active_templates(&self) -> EventideResult<Vec<EventTemplate>> {
        Ok(self.templates.iter().filter(|t| t.is_active).cloned().collect())
    }
}

/// A directory with one template document per `.toml` or `.json` file.
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    dir: PathBuf,
}

impl DirTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirTemplateStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every template document, active or not.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn templates(&self) -> EventideResult<Vec<EventTemplate>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            EventideError::TemplateStore(format!(
                "Could not read template directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut loaded: Vec<(PathBuf, EventTemplate)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_template_file(path))
            .filter_map(|path| match load_template(&path) {
                Ok(template) => Some((path, template)),
                Err(e) => {
                    tracing::warn!("skipping template file: {e}");
                    None
                }
            })
            .collect();

        // Files sharing an id keep file-name order, so the first one wins downstream
        loaded.sort_by(|(a_path, a), (b_path, b)| a.id.cmp(&b.id).then_with(|| a_path.cmp(b_path)));
        for pair in loaded.windows(2) {
            if pair[0].1.id == pair[1].1.id {
                tracing::warn!(
                    template = %pair[1].1.id,
                    "{} reuses the id of {}",
                    pair[1].0.display(),
                    pair[0].0.display()
                );
            }
        }

        let templates = loaded.into_iter().map(|(_, template)| template).collect();
        Ok(templates)
    }
}

impl TemplateStore for DirTemplateStore {
    fn list_active_templates(&self) -> EventideResult<Vec<EventTemplate>> {
        let mut templates = self.templates()?;
        templates.retain(|t| t.is_active);
        Ok(templates)
    }
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "toml" || ext == "json")
}

/// Parse a single template document, picking the format from the extension.
pub fn load_template(path: &Path) -> EventideResult<EventTemplate> {
    let content = std::fs::read_to_string(path)?;
    let parse_error = |reason: String| EventideError::TemplateParse {
        path: path.to_path_buf(),
        reason,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => Err(parse_error("expected a .toml or .json file".to_string())),
    }
}
