//! CV document reader

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CvError {
    #[error("CV not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported CV format '{extension}' ({}); use a .txt or .md export", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to read CV {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CV {} contains no text", .0.display())]
    Empty(PathBuf),
}

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// CV file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvDocument {
    path: PathBuf,
}

impl CvDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path, as handed to file inputs
    pub fn absolute_path(&self) -> Result<PathBuf, CvError> {
        if !self.path.exists() {
            return Err(CvError::NotFound(self.path.clone()));
        }
        std::fs::canonicalize(&self.path).map_err(|source| CvError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub async fn extract_text(&self) -> Result<String, CvError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(CvError::UnsupportedFormat {
                path: self.path.clone(),
                extension,
            });
        }

        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CvError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(CvError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(CvError::Empty(self.path.clone()));
        }
        info!(path = %self.path.display(), chars = text.chars().count(), "Read CV");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_text_cv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cv.md");
        std::fs::write(&path, "\n# Jane Doe\nRust engineer\n\n").unwrap();

        let text = CvDocument::new(&path).extract_text().await.unwrap();
        assert_eq!(text, "# Jane Doe\nRust engineer");
    }

    #[tokio::test]
    async fn test_pdf_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cv.PDF");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let err = CvDocument::new(&path).extract_text().await.unwrap_err();
        assert!(matches!(
            err,
            CvError::UnsupportedFormat { ref extension, .. } if extension == "pdf"
        ));
    }

    #[tokio::test]
    async fn test_missing_and_empty() {
        let dir = tempdir().unwrap();
        let missing = CvDocument::new(dir.path().join("none.txt"));
        assert!(matches!(missing.extract_text().await, Err(CvError::NotFound(_))));
        assert!(matches!(missing.absolute_path(), Err(CvError::NotFound(_))));

        let blank = dir.path().join("blank.txt");
        std::fs::write(&blank, "  \n").unwrap();
        assert!(matches!(
            CvDocument::new(&blank).extract_text().await,
            Err(CvError::Empty(_))
        ));
    }
}
