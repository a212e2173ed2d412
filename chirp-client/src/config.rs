/// Configuration management for the chirp client
///
/// All settings load from environment variables with development
/// defaults.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document store collection layout
    pub store: StoreConfig,
    /// Blob storage settings
    pub storage: StorageConfig,
}

/// Collection names in the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Top-level posts collection
    pub posts_collection: String,
    /// Per-post comments sub-collection
    pub comments_collection: String,
}

/// Blob storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding uploaded attachments
    pub bucket: String,
    /// Host serving retrieval URLs
    pub host: String,
    /// Key prefix for image attachments
    pub upload_prefix: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Config {
            store: StoreConfig {
                posts_collection: std::env::var("CHIRP_POSTS_COLLECTION")
                    .unwrap_or_else(|_| "posts".to_string()),
                comments_collection: std::env::var("CHIRP_COMMENTS_COLLECTION")
                    .unwrap_or_else(|_| "comments".to_string()),
            },
            storage: StorageConfig {
                bucket: std::env::var("CHIRP_STORAGE_BUCKET")
                    .unwrap_or_else(|_| "chirp-media".to_string()),
                host: std::env::var("CHIRP_STORAGE_HOST")
                    .unwrap_or_else(|_| "storage.chirp.dev".to_string()),
                upload_prefix: std::env::var("CHIRP_UPLOAD_PREFIX")
                    .unwrap_or_else(|_| "images".to_string()),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                posts_collection: "posts".to_string(),
                comments_collection: "comments".to_string(),
            },
            storage: StorageConfig {
                bucket: "chirp-media".to_string(),
                host: "storage.chirp.dev".to_string(),
                upload_prefix: "images".to_string(),
            },
        }
    }
}
