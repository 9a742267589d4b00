//! File stores: where resumes are listed and downloaded from.
//!
//! The orchestrator only sees [`FileStore`]. Two adapters ship with the
//! crate:
//!
//! | Adapter | Folder | Document id |
//! |---------|--------|-------------|
//! | [`DriveStore`] | Drive folder id | Drive file id |
//! | [`LocalStore`] | sub-directory of the root (`.` = root) | path relative to the root |

pub mod drive;
pub mod local;

use crate::document::DocumentRef;
use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use drive::DriveStore;
pub use local::LocalStore;

/// A folder that can be screened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// Remote or local document storage.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Folders the credentials can see.
    async fn list_folders(&self) -> Result<Vec<Folder>, StoreError>;

    /// Documents directly inside `folder_id` whose content type is one of
    /// `content_types`.
    async fn list_documents(
        &self,
        folder_id: &str,
        content_types: &[String],
    ) -> Result<Vec<DocumentRef>, StoreError>;

    /// Full payload of one document.
    async fn download(&self, document_id: &str) -> Result<Vec<u8>, StoreError>;
}
