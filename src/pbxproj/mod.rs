//! Post-generation cleanup of Xcode `project.pbxproj` files.
//!
//! The generated project references a sibling package folder
//! (`../OrderTechCore`) that is not available when the app is built on its
//! own. [`strip_project`] removes that folder reference in place.

mod stripper;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use stripper::{strip, ReferenceStripper, StripSummary, Stripped, PATTERN_SIZE_LIMIT};

/// Descriptor rewritten when no path is given, relative to the working directory.
pub const DEFAULT_PROJECT_PATH: &str = "DisplayApp.xcodeproj/project.pbxproj";

/// Local folder dependency removed when no name is given.
pub const DEFAULT_DEPENDENCY: &str = "OrderTechCore";

/// Project file errors.
#[derive(Debug, Error)]
pub enum StripError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dependency name cannot be compiled into a pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A descriptor loaded into memory.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    text: String,
}

impl ProjectFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StripError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|source| StripError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply `stripper` to the in-memory text. Nothing is written.
    pub fn strip(&mut self, stripper: &ReferenceStripper) -> StripSummary {
        let stripped = stripper.strip_with_summary(&self.text);
        self.text = stripped.text;
        stripped.summary
    }

    /// Overwrite the file at its original path. No backup is kept.
    pub fn save(&self) -> Result<(), StripError> {
        fs::write(&self.path, &self.text).map_err(|source| StripError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Result of [`strip_project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub path: PathBuf,
    pub dependency: String,
    #[serde(flatten)]
    pub summary: StripSummary,
    /// False for dry runs.
    pub written: bool,
}

impl StripReport {
    /// The line printed once the command finishes.
    pub fn confirmation(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!(
            "Stripped local folder reference to ../{} from {}",
            self.dependency, file_name
        )
    }
}

/// Remove `dependency` from the descriptor at `path`.
///
/// The file is read once and, unless `dry_run` is set, rewritten once even
/// when nothing matched. A missing entry is not an error.
pub fn strip_project(
    path: impl AsRef<Path>,
    dependency: &str,
    dry_run: bool,
) -> Result<StripReport, StripError> {
    let project = ProjectFile::open(path.as_ref())?;
    strip_file(project, dependency, dry_run)
}

/// Like [`strip_project`], for a descriptor that is already loaded.
pub fn strip_file(
    mut project: ProjectFile,
    dependency: &str,
    dry_run: bool,
) -> Result<StripReport, StripError> {
    let stripper = ReferenceStripper::new(dependency)?;
    let summary = project.strip(&stripper);

    tracing::debug!(
        path = %project.path().display(),
        references = summary.references_removed,
        memberships = summary.memberships_removed,
        "Stripped project descriptor"
    );

    if summary.is_empty() {
        tracing::warn!(
            path = %project.path().display(),
            dependency,
            "No entries for dependency found; descriptor layout may have changed"
        );
    }

    if !dry_run {
        project.save()?;
    }

    Ok(StripReport {
        path: project.path,
        dependency: dependency.to_string(),
        summary,
        written: !dry_run,
    })
}
