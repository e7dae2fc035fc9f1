//! Prompt templates for classification and contradiction detection
//!
//! Templates use the `.prompty` layout: a YAML front matter block between
//! `---` markers declaring the template inputs, followed by a YAML body with
//! `system` and `user` sections. Sections may contain `{{ name }}`
//! placeholders which are replaced by the matching parameter.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

/// Template used to group statements into categories
pub const CLASSIFICATION_TEMPLATE: &str = "classification";

/// Template used to detect contradictions within a category
pub const CONTRADICTION_TEMPLATE: &str = "contradiction";

/// Parameter carrying the numbered statement listing
pub const NUMBERED_SENTENCES: &str = "numbered_sentences";

const TEMPLATE_EXTENSION: &str = "prompty";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        CLASSIFICATION_TEMPLATE,
        include_str!("../../prompts/classification.prompty"),
    ),
    (
        CONTRADICTION_TEMPLATE,
        include_str!("../../prompts/contradiction.prompty"),
    ),
];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Named values substituted into a template
pub type PromptParams = BTreeMap<String, String>;

/// Error type for prompt loading and rendering
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Missing required inputs for {template}: {missing:?}")]
    MissingInputs {
        template: String,
        missing: Vec<String>,
    },

    #[error("Invalid prompt template {template}: {reason}")]
    InvalidFormat { template: String, reason: String },

    #[error("Failed to read prompt templates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of system and user prompts
pub trait PromptProvider: Send + Sync {
    fn system_prompt(&self, template: &str, params: &PromptParams) -> Result<String, PromptError>;

    fn user_prompt(&self, template: &str, params: &PromptParams) -> Result<String, PromptError>;
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    inputs: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct Sections {
    system: String,
    user: String,
}

/// A parsed `.prompty` template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    /// Inputs every render must provide
    pub inputs: Vec<String>,
    system: String,
    user: String,
}

impl PromptTemplate {
    /// Parse a template from its file contents
    pub fn parse(name: &str, content: &str) -> Result<Self, PromptError> {
        let invalid = |reason: String| PromptError::InvalidFormat {
            template: name.to_string(),
            reason,
        };

        let mut parts = content.splitn(3, "---");
        let (Some(preamble), Some(front), Some(body)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected front matter between '---' markers".to_string()));
        };
        if !preamble.trim().is_empty() {
            return Err(invalid("content found before front matter".to_string()));
        }

        let front: FrontMatter = if front.trim().is_empty() {
            FrontMatter {
                inputs: BTreeMap::new(),
            }
        } else {
            serde_yaml::from_str(front).map_err(|e| invalid(format!("front matter: {}", e)))?
        };

        let sections: Sections = serde_yaml::from_str(body.trim())
            .map_err(|e| invalid(format!("'system' and 'user' sections required: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            inputs: front.inputs.into_keys().collect(),
            system: sections.system,
            user: sections.user,
        })
    }

    pub fn render_system(&self, params: &PromptParams) -> Result<String, PromptError> {
        self.render(&self.system, params)
    }

    pub fn render_user(&self, params: &PromptParams) -> Result<String, PromptError> {
        self.render(&self.user, params)
    }

    fn render(&self, section: &str, params: &PromptParams) -> Result<String, PromptError> {
        let missing: Vec<String> = self
            .inputs
            .iter()
            .filter(|input| !params.contains_key(*input))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(PromptError::MissingInputs {
                template: self.name.clone(),
                missing,
            });
        }

        // Placeholders without a value render empty
        let rendered = PLACEHOLDER.replace_all(section, |caps: &Captures| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        });

        Ok(rendered.trim_end().to_string())
    }
}

/// In-memory set of prompt templates keyed by name
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptLibrary {
    /// Templates compiled into the binary
    pub fn builtin() -> Result<Self, PromptError> {
        let mut templates = HashMap::new();
        for (name, content) in BUILTIN_TEMPLATES {
            templates.insert(name.to_string(), PromptTemplate::parse(name, content)?);
        }
        Ok(Self { templates })
    }

    /// Built-in templates overridden by the `.prompty` files found in `dir`
    pub fn from_dir(dir: &Path) -> Result<Self, PromptError> {
        let io_error = |source| PromptError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut library = Self::builtin()?;

        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path).map_err(|source| PromptError::Io {
                path: path.clone(),
                source,
            })?;
            let template = PromptTemplate::parse(name, &content)?;

            tracing::debug!(template = %name, path = %path.display(), "Loaded prompt template");
            library.templates.insert(name.to_string(), template);
        }

        Ok(library)
    }

    /// Load from `dir` when configured, otherwise use the built-in templates
    pub fn load(dir: Option<&Path>) -> Result<Self, PromptError> {
        let library = match dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::builtin()?,
        };

        library.require(CLASSIFICATION_TEMPLATE)?;
        library.require(CONTRADICTION_TEMPLATE)?;

        tracing::info!(
            templates = library.templates.len(),
            source = %dir.map(|d| d.display().to_string()).unwrap_or_else(|| "builtin".to_string()),
            "Prompt templates loaded"
        );

        Ok(library)
    }

    fn require(&self, name: &str) -> Result<&PromptTemplate, PromptError> {
        self.templates
            .get(name)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }
}

impl PromptProvider for PromptLibrary {
    fn system_prompt(&self, template: &str, params: &PromptParams) -> Result<String, PromptError> {
        self.require(template)?.render_system(params)
    }

    fn user_prompt(&self, template: &str, params: &PromptParams) -> Result<String, PromptError> {
        self.require(template)?.render_user(params)
    }
}

/// Parameters carrying a numbered statement listing
pub fn listing_params(numbered_sentences: String) -> PromptParams {
    PromptParams::from([(NUMBERED_SENTENCES.to_string(), numbered_sentences)])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"---
name: greeting
inputs:
  who:
    type: string
---
system: |
  You greet people.
user: |
  Say hello to {{ who }} and {{missing}}.
"#;

    #[test]
    fn test_builtin_templates_render_listing() {
        let library = PromptLibrary::load(None).unwrap();
        let params = listing_params("1. First\n2. Second".to_string());

        let user = library.user_prompt(CLASSIFICATION_TEMPLATE, &params).unwrap();
        assert!(user.contains("1. First\n2. Second"));
        assert!(!user.contains("{{"));

        let system = library.system_prompt(CONTRADICTION_TEMPLATE, &params).unwrap();
        assert!(system.contains("severe"));
        assert!(system.contains("moderate"));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let library = PromptLibrary::builtin().unwrap();
        let result = library.user_prompt(CONTRADICTION_TEMPLATE, &PromptParams::new());

        match result {
            Err(PromptError::MissingInputs { template, missing }) => {
                assert_eq!(template, CONTRADICTION_TEMPLATE);
                assert_eq!(missing, vec![NUMBERED_SENTENCES.to_string()]);
            }
            other => panic!("expected MissingInputs, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let library = PromptLibrary::builtin().unwrap();
        let result = library.system_prompt("summary", &PromptParams::new());
        assert!(matches!(result, Err(PromptError::NotFound(name)) if name == "summary"));
    }

    #[test]
    fn test_placeholders_render_with_and_without_values() {
        let template = PromptTemplate::parse("greeting", SIMPLE).unwrap();
        let params = PromptParams::from([("who".to_string(), "Ada".to_string())]);

        assert_eq!(template.inputs, vec!["who".to_string()]);
        assert_eq!(template.render_user(&params).unwrap(), "Say hello to Ada and .");
        assert_eq!(template.render_system(&params).unwrap(), "You greet people.");
    }

    #[test]
    fn test_invalid_templates_are_rejected() {
        let no_front_matter = PromptTemplate::parse("bad", "system: hi\nuser: there\n");
        assert!(matches!(no_front_matter, Err(PromptError::InvalidFormat { .. })));

        let no_user = PromptTemplate::parse("bad", "---\nname: bad\n---\nsystem: hi\n");
        assert!(matches!(no_user, Err(PromptError::InvalidFormat { .. })));
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("classification.prompty"),
            "---\ninputs:\n  numbered_sentences:\n    type: string\n---\nsystem: custom system\nuser: \"Sort: {{ numbered_sentences }}\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = PromptLibrary::load(Some(dir.path())).unwrap();
        let params = listing_params("1. A".to_string());

        assert_eq!(
            library.system_prompt(CLASSIFICATION_TEMPLATE, &params).unwrap(),
            "custom system"
        );
        assert_eq!(
            library.user_prompt(CLASSIFICATION_TEMPLATE, &params).unwrap(),
            "Sort: 1. A"
        );
        // Templates not present in the directory fall back to the built-in ones
        assert!(library.user_prompt(CONTRADICTION_TEMPLATE, &params).is_ok());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result = PromptLibrary::load(Some(Path::new("/nonexistent/prompt/templates")));
        assert!(matches!(result, Err(PromptError::Io { .. })));
    }
}
