//! File-backed user store.
//!
//! The whole collection lives in memory behind one mutex and is written to a
//! single JSON snapshot after every mutation. Writes go to a temporary file
//! that is synced and then renamed over the snapshot.

pub mod models;

pub use models::{UserId, UserRecord};

use crate::error::{AppError, AppResult};
use crate::wallet::KeyGenerator;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

type Users = BTreeMap<UserId, UserRecord>;

pub struct UserStore {
    path: PathBuf,
    users: Mutex<Users>,
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl UserStore {
    /// Load the snapshot at `path`, or start empty if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let users = match tokio::fs::read(&path).await {
            Ok(contents) => parse_snapshot(&path, &contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No user snapshot at {}, starting empty", path.display());
                Users::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} users from {}", users.len(), path.display());

        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the user's record, creating a wallet for them on first contact.
    ///
    /// The boolean is true only for the call that created the record.
    pub async fn get_or_create(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> AppResult<(UserRecord, bool)> {
        let mut users = self.users.lock().await;

        if let Some(existing) = users.get(user_id) {
            return Ok((existing.clone(), false));
        }

        let record = UserRecord::new(display_name, KeyGenerator::generate());
        users.insert(user_id.clone(), record.clone());

        if let Err(e) = self.persist(&users).await {
            users.remove(user_id);
            return Err(e);
        }

        info!(user_id = %user_id, address = %record.address, "Created wallet");
        Ok((record, true))
    }

    pub async fn get(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.lock().await.get(user_id).cloned()
    }

    /// Replace the stored balance with the latest observed value.
    pub async fn set_balance(&self, user_id: &UserId, balance: f64) -> AppResult<UserRecord> {
        let mut users = self.users.lock().await;

        let record = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(user_id.clone()))?;
        let previous = std::mem::replace(&mut record.balance, balance);
        let updated = record.clone();

        if let Err(e) = self.persist(&users).await {
            if let Some(record) = users.get_mut(user_id) {
                record.balance = previous;
            }
            return Err(e);
        }

        debug!(user_id = %user_id, balance, previous, "Balance updated");
        Ok(updated)
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    /// Write the full collection atomically. Called with the lock held.
    async fn persist(&self, users: &Users) -> AppResult<()> {
        let json = serde_json::to_string_pretty(users)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path).await?;
        debug!("Saved {} users to {}", users.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn parse_snapshot(path: &Path, contents: &[u8]) -> AppResult<Users> {
    let users: Users =
        serde_json::from_slice(contents).map_err(|e| AppError::corrupt(path, e.to_string()))?;

    for (user_id, record) in &users {
        if !KeyGenerator::keys_match(&record.address, &record.secret_key) {
            return Err(AppError::corrupt(
                path,
                format!("keypair for user {} does not match its address", user_id),
            ));
        }
    }

    Ok(users)
}
