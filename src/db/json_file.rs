// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file document store with typed operations.
//!
//! The whole dataset lives in one JSON document:
//! - `chirps` (chirp id → chirp)
//! - `users` (user id → user, each embedding its refresh-token slot)
//!
//! Read-only operations load the file under a shared lock. Every mutation
//! is load → mutate → persist under the exclusive lock, so concurrent
//! writers never lose each other's updates. Persisting writes a sibling
//! temp file and renames it over the document.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Chirp, ChirpFilter, RefreshToken, SortOrder, User};

/// The entire persisted dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
}

impl Document {
    fn user_with_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }
}

/// Next free id: current max + 1. Id 0 is never handed out.
fn next_id<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(1, |max| max + 1)
}

/// File-backed document store. Cheap to clone; clones share the lock.
#[derive(Clone)]
pub struct JsonDb {
    path: Arc<PathBuf>,
    lock: Arc<RwLock<()>>,
}

impl JsonDb {
    /// Open the document at `path`, creating an empty one if the file is missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(path = %path.display(), "Creating empty document");
                write_atomic(&path, &Document::default()).await?;
            }
            Err(e) => {
                return Err(AppError::StorageUnavailable(format!(
                    "Failed to stat {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        let db = Self {
            path: Arc::new(path),
            lock: Arc::new(RwLock::new(())),
        };

        // Fail fast on an unreadable document.
        db.load().await?;
        tracing::info!(path = %db.path.display(), "Opened document store");

        Ok(db)
    }

    /// Delete the document file if present.
    pub async fn remove(path: &Path) -> Result<(), AppError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::warn!(path = %path.display(), "Deleted document store");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageUnavailable(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document snapshot.
    pub async fn load(&self) -> Result<Document, AppError> {
        let _guard = self.lock.read().await;
        read_document(&self.path).await
    }

    /// Replace the durable document wholesale.
    pub async fn persist(&self, document: &Document) -> Result<(), AppError> {
        let _guard = self.lock.write().await;
        write_atomic(&self.path, document).await
    }

    /// Run `f` against a snapshot under the shared lock.
    async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, AppError> {
        let _guard = self.lock.read().await;
        let document = read_document(&self.path).await?;
        Ok(f(&document))
    }

    /// Load, apply `f`, and persist, all under the exclusive lock.
    /// Nothing is written if `f` fails.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.lock.write().await;
        let mut document = read_document(&self.path).await?;
        let out = f(&mut document)?;
        write_atomic(&self.path, &document).await?;
        Ok(out)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user with an already-hashed password.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.mutate(|doc| {
            if doc.user_with_email(email).is_some() {
                return Err(AppError::DuplicateEmail);
            }

            let user = User {
                id: next_id(&doc.users),
                email: email.to_string(),
                password: password_hash.to_string(),
                expires_in_seconds: 0,
                refresh_token: None,
                is_chirpy_red: false,
            };
            doc.users.insert(user.id, user.clone());
            Ok(user)
        })
        .await
    }

    /// Get a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.read(|doc| doc.user_with_email(email).cloned()).await
    }

    /// Get a user by id.
    pub async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, AppError> {
        self.read(|doc| doc.users.values().find(|u| u.id == id).cloned())
            .await
    }

    /// Replace the stored record at `user.id` (last writer wins).
    ///
    /// Fails `NotFound` if no such user exists and `DuplicateEmail` if the
    /// new email belongs to someone else.
    pub async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let user = user.clone();
        self.mutate(move |doc| {
            if !doc.users.contains_key(&user.id) {
                return Err(AppError::NotFound(format!("User {} not found", user.id)));
            }
            if doc
                .user_with_email(&user.email)
                .is_some_and(|other| other.id != user.id)
            {
                return Err(AppError::DuplicateEmail);
            }
            doc.users.insert(user.id, user.clone());
            Ok(user)
        })
        .await
    }

    /// Atomically edit one user in place and return the stored result.
    pub async fn modify_user(
        &self,
        id: u64,
        f: impl FnOnce(&mut User),
    ) -> Result<User, AppError> {
        self.try_modify_user(id, |user| {
            f(user);
            Ok(())
        })
        .await
    }

    /// Like [`modify_user`](Self::modify_user), but `f` may refuse the
    /// edit; nothing is written when it does.
    pub async fn try_modify_user(
        &self,
        id: u64,
        f: impl FnOnce(&mut User) -> Result<(), AppError>,
    ) -> Result<User, AppError> {
        self.mutate(|doc| {
            let user = doc
                .users
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
            f(user)?;
            let updated = user.clone();

            if doc
                .user_with_email(&updated.email)
                .is_some_and(|other| other.id != id)
            {
                return Err(AppError::DuplicateEmail);
            }
            Ok(updated)
        })
        .await
    }

    // ─── Refresh Token Operations ────────────────────────────────

    /// Overwrite the user's refresh-token slot.
    pub async fn set_user_refresh_token(
        &self,
        user_id: u64,
        token: RefreshToken,
    ) -> Result<(), AppError> {
        self.modify_user(user_id, |user| user.refresh_token = Some(token))
            .await?;
        Ok(())
    }

    /// Clear whichever slot holds `token`. Returns whether one was cleared.
    pub async fn clear_refresh_token_by_value(&self, token: &str) -> Result<bool, AppError> {
        self.mutate(|doc| {
            let mut cleared = false;
            for user in doc.users.values_mut() {
                if user
                    .refresh_token
                    .as_ref()
                    .is_some_and(|t| t.refresh_token == token)
                {
                    user.refresh_token = None;
                    cleared = true;
                }
            }
            Ok(cleared)
        })
        .await
    }

    /// Get the user currently holding `token`.
    pub async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.read(|doc| {
            doc.users
                .values()
                .find(|u| {
                    u.refresh_token
                        .as_ref()
                        .is_some_and(|t| t.refresh_token == token)
                })
                .cloned()
        })
        .await
    }

    // ─── Chirp Operations ────────────────────────────────────────

    /// Store a new chirp. The author id is taken as given.
    pub async fn create_chirp(&self, body: &str, author_id: u64) -> Result<Chirp, AppError> {
        self.mutate(|doc| {
            let chirp = Chirp {
                id: next_id(&doc.chirps),
                body: body.to_string(),
                author_id,
            };
            doc.chirps.insert(chirp.id, chirp.clone());
            Ok(chirp)
        })
        .await
    }

    /// Get a chirp by id.
    pub async fn get_chirp(&self, id: u64) -> Result<Option<Chirp>, AppError> {
        self.read(|doc| doc.chirps.get(&id).cloned()).await
    }

    /// List chirps, optionally by author, ordered by id.
    pub async fn list_chirps(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, AppError> {
        self.read(|doc| {
            let matching = doc
                .chirps
                .values()
                .filter(|c| filter.author_id.is_none_or(|author| c.author_id == author))
                .cloned();

            // BTreeMap iteration is already ascending by id.
            match filter.order {
                SortOrder::Asc => matching.collect(),
                SortOrder::Desc => {
                    let mut chirps: Vec<Chirp> = matching.collect();
                    chirps.reverse();
                    chirps
                }
            }
        })
        .await
    }

    /// Remove a chirp.
    pub async fn delete_chirp(&self, id: u64) -> Result<(), AppError> {
        self.mutate(|doc| {
            doc.chirps
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(format!("Chirp {} not found", id)))
        })
        .await
    }

    /// Remove a chirp only if `author_id` owns it; ownership is checked
    /// under the same lock as the removal.
    pub async fn delete_chirp_authored_by(&self, id: u64, author_id: u64) -> Result<(), AppError> {
        self.mutate(|doc| {
            let chirp = doc
                .chirps
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("Chirp {} not found", id)))?;
            if chirp.author_id != author_id {
                return Err(AppError::Forbidden);
            }
            doc.chirps.remove(&id);
            Ok(())
        })
        .await
    }
}

async fn read_document(path: &Path) -> Result<Document, AppError> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::StorageUnavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_slice(&data).map_err(|e| {
        AppError::CorruptDocument(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write to `<path>.tmp`, then rename over `path`.
async fn write_atomic(path: &Path, document: &Document) -> Result<(), AppError> {
    let json = serde_json::to_vec(document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize document: {}", e)))?;

    let temp_path = temp_path_for(path);

    tokio::fs::write(&temp_path, &json).await.map_err(|e| {
        AppError::StorageUnavailable(format!("Failed to write temp file: {}", e))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        AppError::StorageUnavailable(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
