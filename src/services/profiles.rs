use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::FoodProfile;

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid profile name: {0}")]
    InvalidName(String),
}

/// Where user food profiles come from
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Look up one profile by name (case-insensitive)
    async fn get(&self, name: &str) -> Result<Option<FoodProfile>, ProfileError>;

    /// Every profile except the one named `exclude`
    async fn all_except(&self, exclude: Option<&str>) -> Result<Vec<FoodProfile>, ProfileError>;

    /// Create or overwrite a profile
    async fn save(&self, profile: &FoodProfile) -> Result<(), ProfileError>;
}

/// Profiles kept as one JSON document per user in a directory
///
/// File names are derived from the user name (`user_<name>.json`, lower-cased,
/// spaces replaced by underscores). Names that could escape the data directory
/// are refused. No locking or durability guarantees.
pub struct JsonProfileStore {
    data_dir: PathBuf,
}

impl JsonProfileStore {
    /// Open a store, creating the directory if needed
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, ProfileError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&data_dir).await?;

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn profile_path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        let name = name.trim();
        if name.is_empty() || name.contains(|c: char| matches!(c, '/' | '\\' | '\0')) || name.starts_with('.') {
            return Err(ProfileError::InvalidName(name.to_string()));
        }

        let safe = name.replace(' ', "_").to_lowercase();
        Ok(self.data_dir.join(format!("user_{}.json", safe)))
    }

    /// Get a profile, creating an empty one if it does not exist yet
    ///
    /// Returns the profile and whether it was just created.
    pub async fn get_or_create(&self, name: &str) -> Result<(FoodProfile, bool), ProfileError> {
        if let Some(profile) = self.get(name).await? {
            return Ok((profile, false));
        }

        let profile = FoodProfile::new(name.trim());
        self.save(&profile).await?;
        tracing::info!("Created profile for {}", profile.name);

        Ok((profile, true))
    }

    /// Replace a profile's food choices
    pub async fn update_foods(&self, name: &str, foods: Vec<String>) -> Result<FoodProfile, ProfileError> {
        let mut profile = self
            .get(name)
            .await?
            .ok_or_else(|| ProfileError::NotFound(format!("Profile not found for user {}", name)))?;

        profile.food_choices = foods;
        profile.last_updated = Some(chrono::Utc::now());
        self.save(&profile).await?;

        Ok(profile)
    }
}

#[async_trait]
impl ProfileSource for JsonProfileStore {
    async fn get(&self, name: &str) -> Result<Option<FoodProfile>, ProfileError> {
        let path = self.profile_path(name)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn all_except(&self, exclude: Option<&str>) -> Result<Vec<FoodProfile>, ProfileError> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        let mut paths = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }

        // Directory order is platform dependent
        paths.sort();

        let mut profiles = Vec::with_capacity(paths.len());
        for path in paths {
            let profile = match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<FoodProfile>(&bytes) {
                    Ok(profile) => profile,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable profile {}: {}", path.display(), e);
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping profile {}: {}", path.display(), e);
                    continue;
                }
            };

            if profile.name.trim().is_empty() {
                continue;
            }
            if exclude.is_some_and(|name| profile.is_same_person(name)) {
                continue;
            }

            profiles.push(profile);
        }

        tracing::debug!("Loaded {} profiles from {}", profiles.len(), self.data_dir.display());
        Ok(profiles)
    }

    async fn save(&self, profile: &FoodProfile) -> Result<(), ProfileError> {
        let json = serde_json::to_vec_pretty(profile)?;
        tokio::fs::write(self.profile_path(&profile.name)?, json).await?;
        Ok(())
    }
}
