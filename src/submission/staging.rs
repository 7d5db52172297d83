use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{ScreeningError, ValidationError};

pub const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers tolerate leading junk before the header; so do we, up to here.
const PDF_HEADER_WINDOW: usize = 1024;

/// A résumé read into memory and waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, ScreeningError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ScreeningError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        content_type_for(&self.file_name)
    }

    /// Only PDFs are accepted: the name must say so and the bytes must agree.
    pub fn is_pdf(&self) -> bool {
        self.content_type() == Some(PDF_MIME) && has_pdf_header(&self.bytes)
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    file_name
        .to_ascii_lowercase()
        .ends_with(".pdf")
        .then_some(PDF_MIME)
}

/// Ordered set of files staged for the next upload, capped at `max_files`.
#[derive(Debug, Clone)]
pub struct Staging {
    files: Vec<StagedFile>,
    max_files: usize,
}

impl Staging {
    pub fn new(max_files: usize) -> Self {
        Self {
            files: Vec::new(),
            max_files,
        }
    }

    /// Stages every PDF among `candidates`, silently dropping the rest.
    ///
    /// The addition is all-or-nothing: if the PDFs would push the total past
    /// the ceiling nothing is staged. Returns how many files were added.
    pub fn add(&mut self, candidates: Vec<StagedFile>) -> Result<usize, ValidationError> {
        let pdfs: Vec<StagedFile> = candidates
            .into_iter()
            .filter(|file| {
                let keep = file.is_pdf();
                if !keep {
                    warn!("skipping {}: not a PDF", file.file_name);
                }
                keep
            })
            .collect();

        let attempted = self.files.len() + pdfs.len();
        if attempted > self.max_files {
            return Err(ValidationError::TooManyFiles {
                attempted,
                max: self.max_files,
            });
        }
        let added = pdfs.len();
        self.files.extend(pdfs);
        debug!("staged {added} file(s), {} total", self.files.len());
        Ok(added)
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }
}

/// Reads explicit paths plus every `.pdf` directly inside `dir`.
///
/// Directory entries are taken in name order so repeated runs stage the same
/// sequence.
pub async fn collect_candidates(
    paths: &[PathBuf],
    dir: Option<&Path>,
) -> Result<Vec<StagedFile>, ScreeningError> {
    let mut wanted: Vec<PathBuf> = paths.to_vec();
    if let Some(dir) = dir {
        wanted.extend(pdfs_in_dir(dir).await?);
    }

    let mut out = Vec::with_capacity(wanted.len());
    for path in &wanted {
        out.push(StagedFile::read(path).await?);
    }
    Ok(out)
}

async fn pdfs_in_dir(dir: &Path) -> Result<Vec<PathBuf>, ScreeningError> {
    let io_err = |source| ScreeningError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if content_type_for(&name) != Some(PDF_MIME) {
            continue;
        }
        // Follows symlinks; a dangling link is skipped, not fatal.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => found.push(path),
            Ok(_) => {}
            Err(err) => warn!("skipping {}: {err}", path.display()),
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> StagedFile {
        StagedFile::new(name, b"%PDF-1.7\n%fake body".to_vec())
    }

    #[test]
    fn filters_out_non_pdf_candidates() {
        let mut staging = Staging::new(10);
        let added = staging
            .add(vec![
                pdf("alice.pdf"),
                StagedFile::new("notes.txt", b"hello".to_vec()),
                StagedFile::new("renamed.pdf", b"PK\x03\x04zip".to_vec()),
                pdf("BOB.PDF"),
            ])
            .expect("within limit");
        assert_eq!(added, 2);
        let names: Vec<_> = staging.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["alice.pdf", "BOB.PDF"]);
    }

    #[test]
    fn accepts_header_after_leading_bytes() {
        let shifted = StagedFile::new("scan.pdf", b"\r\n%PDF-1.4 body".to_vec());
        assert!(shifted.is_pdf());

        let mut late = vec![b' '; PDF_HEADER_WINDOW];
        late.extend_from_slice(b"%PDF-1.4");
        assert!(!StagedFile::new("late.pdf", late).is_pdf());

        assert_eq!(content_type_for("cv.docx"), None);
        assert_eq!(content_type_for("cv.txt"), None);
    }

    #[test]
    fn rejects_additions_past_the_ceiling_atomically() {
        let mut staging = Staging::new(3);
        staging.add(vec![pdf("a.pdf"), pdf("b.pdf")]).expect("fits");

        let err = staging
            .add(vec![pdf("c.pdf"), pdf("d.pdf")])
            .expect_err("over the ceiling");
        assert_eq!(
            err,
            ValidationError::TooManyFiles {
                attempted: 4,
                max: 3
            }
        );
        assert_eq!(staging.len(), 2);

        // Non-PDFs do not count toward the ceiling.
        staging
            .add(vec![pdf("c.pdf"), StagedFile::new("x.txt", Vec::new())])
            .expect("fits after filtering");
        assert_eq!(staging.len(), 3);
    }

    #[test]
    fn removes_by_index() {
        let mut staging = Staging::new(10);
        staging
            .add(vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")])
            .expect("fits");
        let removed = staging.remove(1).expect("index in range");
        assert_eq!(removed.file_name, "b.pdf");
        assert!(staging.remove(5).is_none());
        assert_eq!(staging.len(), 2);
    }

    #[tokio::test]
    async fn collects_directory_pdfs_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["zed.pdf", "amy.pdf", "readme.md"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").expect("write");
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).expect("mkdir");

        let files = collect_candidates(&[], Some(dir.path()))
            .await
            .expect("collect");
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["amy.pdf", "zed.pdf"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn directory_scan_follows_symlinks() {
        let store = tempfile::tempdir().expect("tempdir");
        let target = store.path().join("real.pdf");
        std::fs::write(&target, b"%PDF-1.4").expect("write");

        let dir = tempfile::tempdir().expect("tempdir");
        std::os::unix::fs::symlink(&target, dir.path().join("linked.pdf")).expect("symlink");
        std::os::unix::fs::symlink(store.path().join("gone.pdf"), dir.path().join("dangling.pdf"))
            .expect("symlink");

        let files = collect_candidates(&[], Some(dir.path()))
            .await
            .expect("collect");
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["linked.pdf"]);
    }

    #[test]
    fn missing_path_reports_io_error() {
        let paths = [PathBuf::from("/definitely/not/here.pdf")];
        let err = tokio_test::block_on(collect_candidates(&paths, None)).expect_err("missing file");
        assert!(matches!(err, ScreeningError::Io { .. }));
    }
}
