//! Local-directory file store.
//!
//! Folders are the sub-directories of a root directory; the root itself is
//! folder `.`. Content types come from file extensions via `mime_guess`.
//! Useful for dry runs and for screening resumes that never went to Drive.

use super::{FileStore, Folder};
use crate::document::DocumentRef;
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// [`FileStore`] over a directory tree.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative id onto the root, refusing anything that escapes it.
    fn resolve(&self, id: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if escapes {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(self.root.join(rel))
    }
}

async fn read_dir_sorted(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut out = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let file_type = entry.file_type().await.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        out.push((name, entry.path(), file_type.is_dir()));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[async_trait]
impl FileStore for LocalStore {
    async fn list_folders(&self) -> Result<Vec<Folder>, StoreError> {
        let entries = read_dir_sorted(&self.root).await?;
        Ok(entries
            .into_iter()
            .filter(|(_, _, is_dir)| *is_dir)
            .map(|(name, _, _)| Folder {
                id: name.clone(),
                name,
            })
            .collect())
    }

    async fn list_documents(
        &self,
        folder_id: &str,
        content_types: &[String],
    ) -> Result<Vec<DocumentRef>, StoreError> {
        let dir = self.resolve(folder_id)?;
        if !dir.is_dir() {
            return Err(StoreError::NotFound {
                id: folder_id.to_string(),
            });
        }

        let wanted: Vec<String> = content_types.iter().map(|t| t.to_ascii_lowercase()).collect();
        let mut docs = Vec::new();
        for (name, path, is_dir) in read_dir_sorted(&dir).await? {
            if is_dir {
                continue;
            }
            let mime = guess_mime(&path);
            if !wanted.is_empty() && !wanted.contains(&mime) {
                debug!("Skipping '{}' ({})", name, mime);
                continue;
            }
            let id = Path::new(folder_id).join(&name).to_string_lossy().into_owned();
            docs.push(DocumentRef::new(id, name, mime));
        }
        Ok(docs)
    }

    async fn download(&self, document_id: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(document_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                id: document_id.to_string(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        let vaga = dir.path().join("vaga-dados");
        std::fs::create_dir(&vaga).expect("mkdir");
        std::fs::create_dir(dir.path().join("arquivo")).expect("mkdir");
        std::fs::write(vaga.join("b.pdf"), b"%PDF-1.4").expect("write");
        std::fs::write(vaga.join("a.txt"), b"Ana").expect("write");
        std::fs::write(vaga.join("c.png"), b"\x89PNG").expect("write");
        std::fs::write(dir.path().join("root.txt"), b"raiz").expect("write");
        dir
    }

    #[tokio::test]
    async fn folders_are_sorted_subdirectories() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let names: Vec<String> = store
            .list_folders()
            .await
            .expect("listed")
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["arquivo", "vaga-dados"]);
    }

    #[tokio::test]
    async fn documents_are_filtered_by_content_type() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let docs = store
            .list_documents("vaga-dados", &["application/pdf".into(), "text/plain".into()])
            .await
            .expect("listed");
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.pdf"]);
        assert_eq!(docs[1].mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn listed_ids_download() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let docs = store
            .list_documents("vaga-dados", &["text/plain".into()])
            .await
            .expect("listed");
        assert_eq!(store.download(&docs[0].id).await.expect("read"), b"Ana");
    }

    #[tokio::test]
    async fn root_is_folder_dot() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let docs = store
            .list_documents(".", &["text/plain".into()])
            .await
            .expect("listed");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "root.txt");
    }

    #[tokio::test]
    async fn missing_folder_is_not_found() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let err = store.list_documents("nope", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tree();
        let store = LocalStore::new(dir.path());
        let err = tokio_test::block_on(store.download("vaga-dados/z.pdf")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref id } if id == "vaga-dados/z.pdf"));
    }

    #[tokio::test]
    async fn parent_traversal_is_refused() {
        let dir = tree();
        let store = LocalStore::new(dir.path().join("vaga-dados"));
        let err = store.download("../root.txt").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
