//! Loading and saving [`Stylesheet`]s as TOML.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Stylesheet;

#[derive(Debug, Error)]
pub enum StyleConfigError {
    #[error("Failed to read stylesheet at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse stylesheet at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Stylesheet {
    /// Load a stylesheet, returning `None` if the file does not exist.
    ///
    /// `~` and `$VARS` in the path are expanded first.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, StyleConfigError> {
        let path = expand_path(path.as_ref());
        if !path.exists() {
            log::debug!("no stylesheet at {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StyleConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let stylesheet = Self::from_toml(&content).map_err(|source| StyleConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        log::debug!("loaded stylesheet from {}", path.display());
        Ok(Some(stylesheet))
    }

    /// Load from [`Stylesheet::stylesheet_path`].
    pub fn load() -> Result<Option<Self>, StyleConfigError> {
        Self::load_from_path(Self::stylesheet_path())
    }

    /// Load from [`Stylesheet::stylesheet_path`], falling back to defaults
    /// when no file exists.
    pub fn load_or_default() -> Result<Self, StyleConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = expand_path(path.as_ref());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        log::debug!("saved stylesheet to {}", path.display());
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::stylesheet_path())
    }

    pub fn stylesheet_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markspan");
        PathBuf::from(config_dir.as_ref()).join("stylesheet.toml")
    }
}

/// Expand `~` and environment variables, leaving the path alone if an
/// expansion fails.
fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    match shellexpand::full(&path_str) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontSpec, Rgb};
    use markspan_syntax::HeaderLevel;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn stylesheet_path_is_expanded() {
        let path = Stylesheet::stylesheet_path();
        let path_str = path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markspan/stylesheet.toml"));
    }

    #[test]
    fn missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        assert!(Stylesheet::load_from_path(&missing).unwrap().is_none());
    }

    #[test]
    fn save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("nested/stylesheet.toml");

        let mut sheet = Stylesheet::default();
        sheet.set_font_for_header(HeaderLevel::H1, FontSpec::new("Georgia", 32.0).bold());
        sheet.block_quote.color = Rgb::new(10, 20, 30);
        sheet.save_to_path(&file).unwrap();

        let loaded = Stylesheet::load_from_path(&file).unwrap().unwrap();
        assert_eq!(loaded, sheet);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let sheet = Stylesheet::from_toml(
            r#"
italic_font_name = "Times-Italic"

[block_quote]
indent_per_level = 8.0
"#,
        )
        .unwrap();

        assert_eq!(sheet.italic_font_name, "Times-Italic");
        assert_eq!(sheet.block_quote.indent_per_level, 8.0);
        assert!(sheet.block_quote.italic);
        assert_eq!(sheet.paragraph_font, Stylesheet::default().paragraph_font);
        assert_eq!(sheet.header_fonts, Stylesheet::default().header_fonts);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("bad.toml");
        std::fs::write(&file, "paragraph_font = 12").unwrap();

        let err = Stylesheet::load_from_path(&file).unwrap_err();
        assert!(matches!(err, StyleConfigError::Parse { ref path, .. } if *path == file));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn unreadable_path_is_read_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = Stylesheet::load_from_path(temp_dir.path()).unwrap_err();
        assert!(matches!(err, StyleConfigError::Read { .. }));
    }

    #[test]
    fn env_var_in_path_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        unsafe {
            env::set_var("MARKSPAN_TEST_STYLE_DIR", temp_dir.path());
        }

        let sheet = Stylesheet::default();
        sheet
            .save_to_path("$MARKSPAN_TEST_STYLE_DIR/stylesheet.toml")
            .unwrap();
        assert!(temp_dir.path().join("stylesheet.toml").exists());

        let loaded = Stylesheet::load_from_path("$MARKSPAN_TEST_STYLE_DIR/stylesheet.toml")
            .unwrap()
            .unwrap();
        assert_eq!(loaded, sheet);

        unsafe {
            env::remove_var("MARKSPAN_TEST_STYLE_DIR");
        }
    }

    #[test]
    fn expand_path_leaves_plain_paths() {
        assert_eq!(expand_path(Path::new("/absolute/path")), PathBuf::from("/absolute/path"));
        assert_eq!(expand_path(Path::new("relative/path")), PathBuf::from("relative/path"));
    }
}
