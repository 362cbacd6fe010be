//! Directory conventions of one imaging session.
//!
//! ```text
//! <session>/
//!   light/              raw frames + DSS .Info.txt reports
//!   dss_plot/
//!     dss_quality_data.csv
//!     dss_plot.jpg
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_LIGHTS_DIR: &str = "light";
pub const DEFAULT_OUTPUT_DIR: &str = "dss_plot";
pub const DEFAULT_TABLE_NAME: &str = "dss_quality_data.csv";
pub const DEFAULT_PLOT_NAME: &str = "dss_plot.jpg";

#[derive(Clone, Debug)]
pub struct SessionLayout {
    root: PathBuf,
    lights_dir: String,
    output_dir: String,
    table_name: String,
    plot_name: String,
}

impl SessionLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SessionLayout {
            root: root.as_ref().to_path_buf(),
            lights_dir: DEFAULT_LIGHTS_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            plot_name: DEFAULT_PLOT_NAME.to_string(),
        }
    }

    pub fn with_lights_dir(mut self, name: impl Into<String>) -> Self {
        self.lights_dir = name.into();
        self
    }

    pub fn with_output_dir(mut self, name: impl Into<String>) -> Self {
        self.output_dir = name.into();
        self
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    pub fn with_plot_name(mut self, name: impl Into<String>) -> Self {
        self.plot_name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lights_path(&self) -> PathBuf {
        self.root.join(&self.lights_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn table_path(&self) -> PathBuf {
        self.output_path().join(&self.table_name)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.output_path().join(&self.plot_name)
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<PathBuf> {
        let dir = self.output_path();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_paths() {
        let layout = SessionLayout::new("/data/2021-12-09_cygnus_loop");
        assert_eq!(layout.lights_path(), Path::new("/data/2021-12-09_cygnus_loop/light"));
        assert_eq!(
            layout.table_path(),
            Path::new("/data/2021-12-09_cygnus_loop/dss_plot/dss_quality_data.csv")
        );
        assert_eq!(
            layout.plot_path(),
            Path::new("/data/2021-12-09_cygnus_loop/dss_plot/dss_plot.jpg")
        );
    }

    #[test]
    fn test_overrides() {
        let layout = SessionLayout::new("s")
            .with_lights_dir("lights")
            .with_output_dir("out")
            .with_table_name("t.csv")
            .with_plot_name("p.png");
        assert_eq!(layout.lights_path(), Path::new("s/lights"));
        assert_eq!(layout.table_path(), Path::new("s/out/t.csv"));
        assert_eq!(layout.plot_path(), Path::new("s/out/p.png"));
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = SessionLayout::new(tmp.path());
        let dir = layout.ensure_output_dir().unwrap();
        assert!(dir.is_dir());
        layout.ensure_output_dir().unwrap();
    }
}
