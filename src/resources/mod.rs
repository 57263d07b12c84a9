use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

const EMBEDDED: &str = include_str!("../../resources/privileges.yaml");
const DEFAULT_ALL_TITLE: &str = "All";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to read resource file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid resource file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Display titles for privilege areas, controllers and actions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resources {
    #[serde(default)]
    all: Option<String>,
    #[serde(default)]
    areas: HashMap<String, String>,
    #[serde(default)]
    controllers: HashMap<String, String>,
    #[serde(default)]
    actions: HashMap<String, String>,
}

impl Resources {
    pub fn from_yaml(source: &str) -> Result<Self, ResourceError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Built-in titles, overlaid with the file at `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self, ResourceError> {
        let mut resources = Self::from_yaml(EMBEDDED)?;

        if let Some(path) = path {
            let source = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
                path: path.display().to_string(),
                source,
            })?;
            resources.merge(Self::from_yaml(&source)?);
            tracing::info!("Loaded resource titles from {}", path.display());
        }

        Ok(resources)
    }

    fn merge(&mut self, other: Resources) {
        if other.all.is_some() {
            self.all = other.all;
        }
        self.areas.extend(other.areas);
        self.controllers.extend(other.controllers);
        self.actions.extend(other.actions);
    }

    pub fn all_title(&self) -> String {
        self.all.clone().unwrap_or_else(|| DEFAULT_ALL_TITLE.to_string())
    }

    /// `None` stays `None`: global privileges have no area node
    pub fn area_title(&self, area: Option<&str>) -> Option<String> {
        area.map(|area| lookup(&self.areas, area))
    }

    pub fn controller_title(&self, controller: &str) -> String {
        lookup(&self.controllers, controller)
    }

    pub fn action_title(&self, action: &str) -> String {
        lookup(&self.actions, action)
    }
}

fn lookup(titles: &HashMap<String, String>, key: &str) -> String {
    titles.get(key).cloned().unwrap_or_else(|| key.to_string())
}
