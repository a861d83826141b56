use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use pdf_oxide::PdfDocument;
use walkdir::WalkDir;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Text of one PDF page.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub source: String,
    /// 1-based.
    pub number: usize,
    pub text: String,
}

fn pdf_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Data directory not found: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn extract_pages(path: &Path) -> Result<Vec<Page>> {
    let mut doc = PdfDocument::open(path)
        .map_err(|e| anyhow!("Failed to parse {}: {e}", path.display()))?;
    let page_count = doc
        .page_count()
        .map_err(|e| anyhow!("Failed to read page count of {}: {e}", path.display()))?;

    let source = path.display().to_string();
    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let text = doc.extract_text(index).unwrap_or_default();
        if !text.trim().is_empty() {
            pages.push(Page {
                source: source.clone(),
                number: index + 1,
                text,
            });
        }
    }
    Ok(pages)
}

/// Loads every `*.pdf` directly inside `dir`, one `Page` per non-blank page.
pub async fn load_pdfs(dir: &Path) -> Result<Vec<Page>> {
    let paths = pdf_paths(dir)?;
    if paths.is_empty() {
        bail!("No PDF files found in {}", dir.display());
    }

    let mut pages = Vec::new();
    for path in paths {
        let name = path.display().to_string();
        let extracted = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || extract_pages(&path)),
        )
        .await
        .with_context(|| format!("PDF extraction timed out: {name}"))??;

        match extracted {
            Ok(found) => {
                tracing::info!(pages = found.len(), "Loaded {name}");
                pages.extend(found);
            }
            Err(err) => tracing::error!("Skipping {name}: {err:#}"),
        }
    }

    if pages.is_empty() {
        bail!("No text could be extracted from the PDFs in {}", dir.display());
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Data");

        let err = load_pdfs(&missing).await.unwrap_err();
        assert!(err.to_string().contains("Data directory not found"));
    }

    #[tokio::test]
    async fn directory_without_pdfs_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();

        let err = load_pdfs(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("No PDF files found"));
    }

    #[test]
    fn only_top_level_pdfs_are_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.PDF"), b"").unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.pdf"), b"").unwrap();

        let names: Vec<_> = pdf_paths(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }

    #[tokio::test]
    async fn unreadable_pdfs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"definitely not a pdf").unwrap();

        let err = load_pdfs(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("No text could be extracted"));
    }
}
