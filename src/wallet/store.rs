//! Proof Storage
//!
//! Flat JSON file holding the proofs the wallet has received, one record per
//! proof tagged with its mint. Proofs are deduplicated by secret.

use super::token::Proof;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

const PROOFS_FILE: &str = "proofs.json";
const PROOFS_TMP_FILE: &str = "proofs.json.tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProof {
    pub mint: String,
    #[serde(flatten)]
    pub proof: Proof,
}

/// File-backed proof store
pub struct ProofStore {
    proofs_path: PathBuf,
    // Readers share, load-modify-save cycles are exclusive
    lock: RwLock<()>,
}

impl ProofStore {
    pub fn with_path(base_dir: impl AsRef<Path>) -> Self {
        Self {
            proofs_path: base_dir.as_ref().join(PROOFS_FILE),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.proofs_path
    }

    /// Load all stored proofs; a missing file is an empty wallet
    pub async fn load(&self) -> io::Result<Vec<StoredProof>> {
        let _guard = self.lock.read().await;
        self.read_file().await
    }

    async fn read_file(&self) -> io::Result<Vec<StoredProof>> {
        match fs::read_to_string(&self.proofs_path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.proofs_path, "No proofs file found, wallet is empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Add proofs from `mint`, skipping secrets already stored.
    /// Returns the amount actually added.
    pub async fn add(&self, mint: &str, proofs: &[Proof]) -> io::Result<u64> {
        let _guard = self.lock.write().await;

        let mut stored = self.read_file().await?;
        let mut added = 0u64;

        for proof in proofs {
            if stored.iter().any(|s| s.proof.secret == proof.secret) {
                continue;
            }
            added = added.saturating_add(proof.amount);
            stored.push(StoredProof {
                mint: mint.to_string(),
                proof: proof.clone(),
            });
        }

        self.write_file(&stored).await?;

        info!(added, total_proofs = stored.len(), "Stored received proofs");
        Ok(added)
    }

    /// Replace the proofs file atomically: write a sibling temp file, then
    /// rename it over the old one. A crash leaves either version intact.
    async fn write_file(&self, stored: &[StoredProof]) -> io::Result<()> {
        let dir = self.proofs_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).await?;

        let tmp_path = dir.join(PROOFS_TMP_FILE);
        let content = serde_json::to_string_pretty(stored)?;
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.proofs_path).await
    }

    /// Sum of all stored proof amounts
    pub async fn balance(&self) -> io::Result<u64> {
        let stored = self.load().await?;
        Ok(stored
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.proof.amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::token::tests::sample_token;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn proofs(prefix: &str, count: usize) -> Vec<Proof> {
        (0..count)
            .map(|i| Proof {
                amount: 1,
                id: "009a1f293253e41e".to_string(),
                secret: format!("{prefix}-{i}"),
                c: "02a9acc1e48c25eeeb9289b5031cc57da9fe72f3fe2861d264bdc074209b107ba2".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProofStore::with_path(temp_dir.path().join("wallet"));

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.balance().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_deduplicates_by_secret() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProofStore::with_path(temp_dir.path().join("wallet"));
        let token = sample_token(&[2, 8]);
        let proofs: Vec<Proof> = token.proofs().cloned().collect();

        assert_eq!(store.add("https://mint.example.com", &proofs).await.unwrap(), 10);
        assert_eq!(store.add("https://mint.example.com", &proofs).await.unwrap(), 0);

        assert_eq!(store.balance().await.unwrap(), 10);
        let stored = store.load().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].mint, "https://mint.example.com");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProofStore::with_path(temp_dir.path());
        tokio::fs::write(store.path(), "not json").await.unwrap();

        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_add_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProofStore::with_path(temp_dir.path());

        store.add("https://mint.example.com", &proofs("a", 3)).await.unwrap();

        assert!(store.path().exists());
        assert!(!temp_dir.path().join(PROOFS_TMP_FILE).exists());
        assert_eq!(store.balance().await.unwrap(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_balance_during_concurrent_adds() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(ProofStore::with_path(temp_dir.path()));
        store.add("https://mint.example.com", &proofs("seed", 2000)).await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for round in 0..50 {
                    let batch = proofs(&format!("round{round}"), 1);
                    store.add("https://mint.example.com", &batch).await.unwrap();
                }
            })
        };

        let mut last = 0;
        while !writer.is_finished() {
            let balance = store.balance().await.expect("balance read a partial proofs file");
            assert!(balance >= last);
            last = balance;
        }
        writer.await.unwrap();

        assert_eq!(store.balance().await.unwrap(), 2050);
    }
}
