//! A yWriter 7 project file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::CodecConfig;
use crate::constants::YW7_EXTENSION;
use crate::file::guard;
use crate::models::Novel;
use crate::parser::postprocess::postprocess_xml;
use crate::parser::reader::parse_yw7;
use crate::parser::writer::{build_element_tree, prepare_for_write};
use crate::xml::Element;

/// A `.yw7` project: its path, its model, and the tree from the last read.
///
/// ```no_run
/// use ywcodec::Yw7File;
///
/// let mut project = Yw7File::new("novel.yw7");
/// project.read()?;
/// project.novel.title = Some("Working Title".to_string());
/// project.write()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Yw7File {
    file_path: Option<PathBuf>,
    project_name: Option<String>,
    project_path: Option<String>,
    /// The project content
    pub novel: Novel,
    tree: Option<Element>,
    config: CodecConfig,
}

impl Yw7File {
    /// Creates a project file handle with the default configuration.
    ///
    /// A path without the `.yw7` extension leaves the handle without a path;
    /// [`Yw7File::read`] and [`Yw7File::write`] then fail.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, CodecConfig::default())
    }

    /// Creates a project file handle with the configuration from the user's
    /// config file, or the defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be loaded.
    pub fn with_user_config(path: impl AsRef<Path>) -> Result<Self> {
        let config = CodecConfig::load().context("Failed to load codec configuration")?;
        Ok(Self::with_config(path, config))
    }

    /// Creates a project file handle with the given configuration.
    pub fn with_config(path: impl AsRef<Path>, config: CodecConfig) -> Self {
        let mut file = Self {
            file_path: None,
            project_name: None,
            project_path: None,
            novel: Novel::new(),
            tree: None,
            config,
        };
        file.set_file_path(path);
        file
    }

    /// Sets the file path and derives the URL-encoded project name and
    /// directory from it.
    ///
    /// The directory is resolved to an absolute path when it exists.
    ///
    /// Returns `false`, leaving the previous state untouched, unless the
    /// file name ends with `.yw7` (in any case).
    pub fn set_file_path(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let stem_len = file_name.len().saturating_sub(YW7_EXTENSION.len());
        let Some(extension) = file_name.get(stem_len..) else {
            return false;
        };
        if !extension.eq_ignore_ascii_case(YW7_EXTENSION) {
            return false;
        }

        let directory = project_directory(path);

        self.project_name = Some(url_quote(&file_name[..stem_len], ""));
        self.project_path = Some(url_quote(&directory, "/:"));
        self.file_path = Some(path.to_path_buf());
        true
    }

    /// The project file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// URL-encoded file name without extension.
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// URL-encoded project directory with `/` separators.
    pub fn project_path(&self) -> Option<&str> {
        self.project_path.as_deref()
    }

    /// The element tree from the last read or write.
    pub fn tree(&self) -> Option<&Element> {
        self.tree.as_ref()
    }

    /// The configuration used for writing.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Checks whether yWriter has the project open.
    pub fn is_locked(&self) -> bool {
        self.file_path.as_deref().is_some_and(guard::is_locked)
    }

    fn require_path(&self) -> Result<PathBuf> {
        self.file_path
            .clone()
            .context("No yWriter 7 project file path set")
    }

    /// Reads the project, replacing the model.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set, the project is locked, or the file
    /// cannot be read or parsed. The model is left unchanged on error.
    pub fn read(&mut self) -> Result<()> {
        let path = self.require_path()?;
        let (novel, tree) = parse_yw7(&path)?;
        self.novel = novel;
        self.tree = Some(tree);
        Ok(())
    }

    /// Writes the model to the project file.
    ///
    /// The tree from the last read is patched when available, otherwise a
    /// fresh one is built. The previous file is kept as `<path>.bak`.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set, the project is locked, or the
    /// file cannot be written. A failed write restores the previous file.
    pub fn write(&mut self) -> Result<()> {
        let path = self.require_path()?;
        guard::ensure_unlocked(&path)?;

        prepare_for_write(&mut self.novel, self.config.fallback_locale());
        let root = build_element_tree(&self.novel, self.tree.take());
        let xml = root.to_indented_xml(&self.config.output.indent);
        self.tree = Some(root);

        let text = postprocess_xml(&xml)?;
        guard::write_with_backup(&path, |target| fs::write(target, text.as_bytes()))?;

        info!(
            "Wrote {} ({} chapters, {} scenes)",
            path.display(),
            self.novel.chapters.len(),
            self.novel.scenes.len()
        );
        Ok(())
    }

    /// Empties every project, chapter and scene custom field so the next
    /// write removes them from the file. Scene arcs and style are dropped as
    /// well.
    ///
    /// Returns `true` if any information was discarded.
    pub fn reset_custom_variables(&mut self) -> bool {
        let mut changed = self.novel.kw_vars.blank_all();
        for chapter in self.novel.chapters.values_mut() {
            changed |= chapter.kw_vars.blank_all();
        }
        for scene in self.novel.scenes.values_mut() {
            changed |= scene.kw_vars.blank_all();
            scene.scn_arcs = None;
            scene.scn_style = None;
        }
        changed
    }
}

/// Percent-encodes everything except ASCII alphanumerics, `_.-~` and the
/// characters in `safe`.
fn url_quote(text: &str, safe: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for byte in text.bytes() {
        let c = char::from(byte);
        if byte.is_ascii_alphanumeric() || "_.-~".contains(c) || (byte.is_ascii() && safe.contains(c))
        {
            quoted.push(c);
        } else {
            quoted.push_str(&format!("%{byte:02X}"));
        }
    }
    quoted
}

/// Absolute directory of `path` with `/` separators, or the parent as
/// given when it cannot be resolved.
fn project_directory(path: &Path) -> String {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return String::new(),
    };
    let resolved = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
    let directory = resolved.to_string_lossy().replace('\\', "/");
    match directory.strip_prefix("//?/") {
        Some(verbatim) => verbatim.to_string(),
        None => directory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectField, Scene, SceneField};

    #[test]
    fn test_set_file_path_accepts_yw7_only() {
        let mut file = Yw7File::new("/books/My Novel.yw7");
        assert_eq!(file.project_name(), Some("My%20Novel"));
        assert_eq!(file.project_path(), Some("/books"));

        assert!(!file.set_file_path("/other/notes.txt"));
        assert_eq!(file.file_path(), Some(Path::new("/books/My Novel.yw7")));

        assert!(file.set_file_path("C:/Üb/novel.YW7"));
        assert_eq!(file.project_name(), Some("novel"));
        assert_eq!(file.project_path(), Some("C:/%C3%9Cb"));
    }

    #[test]
    fn test_relative_path_resolves_project_directory() {
        let file = Yw7File::new("novel.yw7");
        let cwd = fs::canonicalize(".").unwrap();
        let expected = url_quote(&cwd.to_string_lossy().replace('\\', "/"), "/:");
        assert_eq!(file.project_path(), Some(expected.as_str()));
        assert!(!expected.is_empty());
    }

    #[test]
    fn test_with_user_config_sets_path() {
        let file = Yw7File::with_user_config("/books/novel.yw7").unwrap();
        assert_eq!(file.file_path(), Some(Path::new("/books/novel.yw7")));
        assert!(file.config().validate().is_ok());
    }

    #[test]
    fn test_non_yw7_path_leaves_state_unset() {
        let mut file = Yw7File::new("novel.yw6");
        assert_eq!(file.file_path(), None);
        assert_eq!(file.project_name(), None);
        assert!(file.read().is_err());
        assert!(file.write().is_err());
    }

    #[test]
    fn test_url_quote() {
        assert_eq!(url_quote("a b&c", ""), "a%20b%26c");
        assert_eq!(url_quote("/x:y", "/:"), "/x:y");
        assert_eq!(url_quote("/x:y", ""), "%2Fx%3Ay");
    }

    #[test]
    fn test_reset_custom_variables() {
        let mut file = Yw7File::new("novel.yw7");
        assert!(!file.reset_custom_variables());

        file.novel
            .kw_vars
            .set(ProjectField::LanguageCode, Some("de".to_string()));
        let mut scene = Scene::new();
        scene.kw_vars.set(SceneField::SceneStyle, Some("terse".to_string()));
        scene.scn_style = Some("terse".to_string());
        file.novel.scenes.insert("1".to_string(), scene);

        assert!(file.reset_custom_variables());
        assert_eq!(file.novel.kw_vars.get(ProjectField::LanguageCode), Some(""));
        let scene = &file.novel.scenes["1"];
        assert_eq!(scene.kw_vars.get(SceneField::SceneStyle), Some(""));
        assert_eq!(scene.scn_style, None);
        assert!(!file.reset_custom_variables());
    }
}
