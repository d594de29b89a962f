use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::settings::PageSettings;
use crate::app::infrastructure::error::{AppError, Result};

/// One documentation topic: a sidebar entry plus its content section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub title: String,

    /// Font Awesome icon class shown next to the sidebar entry
    #[serde(default)]
    pub icon: Option<String>,

    /// Markdown file, relative to the manifest
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Inline markdown, used when no `source` is given
    #[serde(default)]
    pub markdown: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageManifest {
    pub title: String,

    #[serde(default)]
    pub stylesheet: Option<String>,

    #[serde(default)]
    pub settings: PageSettings,

    #[serde(default)]
    pub sections: Vec<SectionSpec>,

    /// Directory relative sources resolve against; not part of the file.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl PageManifest {
    /// Parse a manifest from TOML text. Relative sources resolve against `base_dir`.
    pub fn from_toml(text: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: PageManifest = toml::from_str(text)?;
        manifest.base_dir = base_dir.to_path_buf();
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml(&text, &base_dir)
    }

    fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(AppError::Manifest("no sections defined".to_string()));
        }
        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.id.trim().is_empty() || section.id.contains(char::is_whitespace) {
                return Err(AppError::Manifest(format!(
                    "invalid section id '{}'",
                    section.id
                )));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(AppError::Manifest(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            if section.source.is_none() && section.markdown.is_none() {
                return Err(AppError::Manifest(format!(
                    "section '{}' has neither source nor markdown",
                    section.id
                )));
            }
        }
        Ok(())
    }

    /// Markdown text for a section, reading its source file when needed.
    pub fn section_markdown(&self, section: &SectionSpec) -> Result<String> {
        match (&section.source, &section.markdown) {
            (Some(source), _) => Ok(fs::read_to_string(self.base_dir.join(source))?),
            (None, Some(inline)) => Ok(inline.clone()),
            (None, None) => Err(AppError::Manifest(format!(
                "section '{}' has neither source nor markdown",
                section.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = r####"
        title = "Git Reference"

        [settings]
        mobile_breakpoint = 900

        [[sections]]
        id = "basics"
        title = "Basics"
        icon = "fa-terminal"
        markdown = "### Init\n\n`git init`"

        [[sections]]
        id = "branching"
        title = "Branching"
        source = "branching.md"
    "####;

    #[test]
    fn test_parse_manifest() {
        let manifest = PageManifest::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        assert_eq!(manifest.title, "Git Reference");
        assert_eq!(manifest.sections.len(), 2);
        assert_eq!(manifest.settings.mobile_breakpoint, 900);
        assert_eq!(manifest.settings.min_query_len, 2);
        assert_eq!(manifest.sections[0].icon.as_deref(), Some("fa-terminal"));
        assert_eq!(manifest.base_dir, PathBuf::from("/docs"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
            title = "x"
            [[sections]]
            id = "a"
            title = "A"
            markdown = ""
            [[sections]]
            id = "a"
            title = "Again"
            markdown = ""
        "#;
        let err = PageManifest::from_toml(text, Path::new(".")).unwrap_err();
        assert_eq!(err.to_string(), "Manifest error: duplicate section id 'a'");
    }

    #[test]
    fn test_missing_sections_rejected() {
        let err = PageManifest::from_toml("title = \"x\"", Path::new(".")).unwrap_err();
        assert!(matches!(err, AppError::Manifest(_)));
    }

    #[test]
    fn test_section_without_content_rejected() {
        let text = r#"
            title = "x"
            [[sections]]
            id = "a"
            title = "A"
        "#;
        let err = PageManifest::from_toml(text, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("neither source nor markdown"));
    }

    #[test]
    fn test_load_reads_relative_sources() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("branching.md"), "### Branch\n").unwrap();
        let path = dir.path().join("page.toml");
        fs::write(&path, MANIFEST).unwrap();

        let manifest = PageManifest::load(&path).unwrap();
        let branching = &manifest.sections[1];
        assert_eq!(manifest.section_markdown(branching).unwrap(), "### Branch\n");
        let basics = &manifest.sections[0];
        assert!(manifest.section_markdown(basics).unwrap().contains("git init"));
    }

    #[test]
    fn test_missing_source_file_is_io_error() {
        let dir = tempdir().unwrap();
        let manifest = PageManifest::from_toml(MANIFEST, dir.path()).unwrap();
        let err = manifest.section_markdown(&manifest.sections[1]).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
