//! File boundary: snapshot loading and all-or-nothing output.
//!
//! Every output a command produces is staged into a temp file next to its
//! destination first. Nothing is renamed into place until all outputs of the
//! command have been written, so a failing run never leaves a truncated file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{OntologyError, Result};
use crate::model::{Document, Graph};

/// Reads a snapshot document, failing on missing files and on anything that
/// does not have the `graphs` / `nodes` / `edges` shape.
pub fn load_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).map_err(|e| OntologyError::io(path, e))?;
    let doc: Document = serde_json::from_str(&text).map_err(|e| {
        OntologyError::malformed(
            path,
            format!("expected an ontology container with `graphs` / `nodes` / `edges`: {e}"),
        )
    })?;
    tracing::info!(
        path = %path.display(),
        graphs = doc.graphs.len(),
        "loaded ontology snapshot"
    );
    Ok(doc)
}

/// The first graph of a loaded document; an empty `graphs` array is malformed.
pub fn primary_graph<'a>(doc: &'a Document, path: &Path) -> Result<&'a Graph> {
    let graph = doc
        .primary_graph()
        .ok_or_else(|| OntologyError::malformed(path, "`graphs` is empty"))?;
    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "using first graph"
    );
    Ok(graph)
}

/// Renders a document the way snapshots are conventionally written
/// (two-space indentation, non-ASCII kept as-is).
pub fn render_document(doc: &Document, path: &Path) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(doc)
        .map_err(|e| OntologyError::malformed(path, format!("cannot serialize snapshot: {e}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// A set of output files that become visible together.
///
/// Destinations are checked before the first rename. If a rename still fails
/// part way, the files already moved into place are restored to their
/// previous contents (or removed) and directories created for the set are
/// removed again.
#[derive(Default)]
pub struct StagedWrites {
    staged: Vec<(NamedTempFile, PathBuf)>,
    created_dirs: Vec<PathBuf>,
}

/// A destination already replaced during a commit, with what it held before.
struct Replaced {
    path: PathBuf,
    previous: Option<Vec<u8>>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `dir` and any missing ancestors. Directories created here are
    /// removed again if the set is dropped or fails to commit.
    pub fn create_dir_all(&mut self, dir: &Path) -> Result<()> {
        let mut missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|d| !d.as_os_str().is_empty() && !d.exists())
            .map(Path::to_path_buf)
            .collect();
        fs::create_dir_all(dir).map_err(|source| OntologyError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        missing.reverse();
        self.created_dirs.extend(missing);
        Ok(())
    }

    /// Writes `contents` into a temp file in `path`'s directory. Failures are
    /// reported as [`OntologyError::Io`].
    pub fn stage(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let output_error = |source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(output_error)?;
        tmp.write_all(contents)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(output_error)?;
        self.staged.push((tmp, path.to_path_buf()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Moves every staged file into place, or none of them. Dropping without
    /// committing deletes the temp files.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);
        for (_, path) in &staged {
            if path.is_dir() {
                return Err(OntologyError::Io {
                    path: path.clone(),
                    source: std::io::Error::other("destination is a directory"),
                });
            }
        }

        let mut replaced: Vec<Replaced> = Vec::with_capacity(staged.len());
        for (tmp, path) in staged {
            let previous = match fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(source) => {
                    roll_back(&replaced);
                    return Err(OntologyError::Io { path, source });
                }
            };
            if let Err(e) = tmp.persist(&path) {
                roll_back(&replaced);
                return Err(OntologyError::Io {
                    path,
                    source: e.error,
                });
            }
            tracing::info!(path = %path.display(), "wrote output");
            replaced.push(Replaced { path, previous });
        }
        self.created_dirs.clear();
        Ok(replaced.into_iter().map(|r| r.path).collect())
    }
}

impl Drop for StagedWrites {
    fn drop(&mut self) {
        self.staged.clear();
        for dir in self.created_dirs.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                tracing::debug!(path = %dir.display(), error = %e, "left output directory in place");
            }
        }
    }
}

/// Undoes the renames of a failed commit, newest first.
fn roll_back(replaced: &[Replaced]) {
    for entry in replaced.iter().rev() {
        let restored = match &entry.previous {
            Some(bytes) => fs::write(&entry.path, bytes),
            None => fs::remove_file(&entry.path),
        };
        match restored {
            Ok(()) => tracing::warn!(path = %entry.path.display(), "rolled back output"),
            Err(e) => tracing::error!(
                path = %entry.path.display(),
                error = %e,
                "could not roll back output"
            ),
        }
    }
}

/// Stages and commits a single file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut writes = StagedWrites::new();
    writes.stage(path, contents)?;
    writes.commit()?;
    Ok(())
}
