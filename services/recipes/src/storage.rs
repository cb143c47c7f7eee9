//! Local storage for uploaded files
//!
//! Uploads are written verbatim under the media root, one directory per
//! upload kind, and referenced from their owning row by relative path.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};
use uuid::Uuid;

/// URL prefix stored files are served under
pub const MEDIA_URL: &str = "/media/";

/// Upload directories below the media root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDir {
    Avatars,
    RecipeImages,
    RecipeFiles,
}

impl UploadDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadDir::Avatars => "avatars",
            UploadDir::RecipeImages => "recipe_images",
            UploadDir::RecipeFiles => "recipe_files",
        }
    }
}

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Whether the upload claims to be an image
    pub fn is_image(&self) -> bool {
        if let Some(content_type) = &self.content_type {
            if content_type.starts_with("image/") {
                return true;
            }
        }

        let extension = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        matches!(
            extension.as_deref(),
            Some("jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp")
        )
    }
}

/// Writes uploads below `root`
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store `file` and return its path relative to the media root
    pub async fn save(&self, dir: UploadDir, file: &UploadedFile) -> Result<String> {
        let name = format!(
            "{}_{}",
            &Uuid::new_v4().simple().to_string()[..8],
            sanitize_file_name(&file.file_name)
        );
        let relative = format!("{}/{}", dir.as_str(), name);

        let target_dir = self.root.join(dir.as_str());
        tokio::fs::create_dir_all(&target_dir).await?;
        tokio::fs::write(target_dir.join(&name), &file.bytes).await?;

        info!("Stored upload {} ({} bytes)", relative, file.bytes.len());
        Ok(relative)
    }

    /// Delete a stored file by its relative path; failures are only logged
    pub async fn remove(&self, relative: &str) {
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Removed upload {}", relative),
            Err(e) => warn!("Failed to remove upload {}: {}", relative, e),
        }
    }
}

/// Public URL of a stored file
pub fn media_url(path: &str) -> String {
    format!("{}{}", MEDIA_URL, path)
}

/// Reduce a client supplied file name to a safe single path segment
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cake pic.jpg"), "cake_pic.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn test_media_url() {
        assert_eq!(media_url("avatars/ab_me.png"), "/media/avatars/ab_me.png");
    }

    #[test]
    fn test_is_image() {
        let mut file = UploadedFile {
            file_name: "cake.PNG".to_string(),
            content_type: None,
            bytes: vec![],
        };
        assert!(file.is_image());

        file.file_name = "notes.txt".to_string();
        assert!(!file.is_image());

        file.content_type = Some("image/jpeg".to_string());
        assert!(file.is_image());
    }

    #[tokio::test]
    async fn test_save_writes_file_verbatim() {
        let root = std::env::temp_dir().join(format!("recipes-media-{}", Uuid::new_v4()));
        let storage = MediaStorage::new(&root);
        let file = UploadedFile {
            file_name: "cake.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![1, 2, 3, 4],
        };

        let path = storage.save(UploadDir::RecipeImages, &file).await.unwrap();
        assert!(path.starts_with("recipe_images/"));
        assert!(path.ends_with("_cake.jpg"));

        let stored = tokio::fs::read(root.join(&path)).await.unwrap();
        assert_eq!(stored, vec![1, 2, 3, 4]);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_saved_file() {
        let root = std::env::temp_dir().join(format!("recipes-media-{}", Uuid::new_v4()));
        let storage = MediaStorage::new(&root);
        let file = UploadedFile {
            file_name: "me.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![9],
        };

        let path = storage.save(UploadDir::Avatars, &file).await.unwrap();
        storage.remove(&path).await;
        assert!(!root.join(&path).exists());

        // already gone
        storage.remove(&path).await;

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
