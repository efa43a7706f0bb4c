//! The SQLite mirror: entities, their annotations, and the per-network
//! processing status, all advanced inside one transaction per block.

use std::{str::FromStr, sync::Arc};

use ethereum_types::H256;
use libsql::{Builder, Connection, Transaction};
use tokio::sync::Mutex;
use tracing::info;

use golembase_wal::{
    iterator::WalBlock,
    record::{Create, Operation, Update},
};

use crate::error::EtlError;

// Change the version if DB_SCHEMA changes.
const MIGRATION_VERSION: u64 = 1;
const DB_SCHEMA: [&str; 6] = [
    "CREATE TABLE entities (key TEXT PRIMARY KEY, expires_at_block INT NOT NULL, payload BLOB)",
    "CREATE TABLE string_annotations (entity_key TEXT, annotation_key TEXT, value TEXT, PRIMARY KEY (entity_key, annotation_key))",
    "CREATE TABLE numeric_annotations (entity_key TEXT, annotation_key TEXT, value INT, PRIMARY KEY (entity_key, annotation_key))",
    "CREATE TABLE processing_status (network TEXT PRIMARY KEY, last_processed_block_number INT NOT NULL, last_processed_block_hash TEXT NOT NULL)",
    "CREATE TABLE migrations (version INT PRIMARY KEY)",
    "INSERT INTO migrations VALUES (1)",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingStatus {
    pub network: String,
    pub last_processed_block_number: u64,
    pub last_processed_block_hash: H256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirrorEntity {
    pub key: String,
    pub expires_at_block: u64,
    pub payload: Vec<u8>,
}

/// ### MirrorStore
/// - `read_conn`: connection used for read-only statements
/// - `write_conn`: connection used for writing, behind a mutex so there is
///   a single writer (writes through the read connection trip
///   `SQLite failure: database is locked`)
pub struct MirrorStore {
    read_conn: Connection,
    write_conn: Arc<Mutex<Connection>>,
}

fn hex_key(key: &H256) -> String {
    format!("{key:#x}")
}

fn to_i64(label: &str, value: u64) -> Result<i64, EtlError> {
    i64::try_from(value).map_err(|_| EtlError::Conversion(format!("{label} {value} exceeds i64")))
}

impl MirrorStore {
    pub async fn new(path: &str) -> Result<Self, EtlError> {
        let db = Builder::new_local(path).build().await?;
        let store = MirrorStore {
            read_conn: db.connect()?,
            write_conn: Arc::new(Mutex::new(db.connect()?)),
        };
        store.init_db().await?;

        let current = store.get_version().await?;
        if current != MIGRATION_VERSION {
            return Err(EtlError::VersionMismatch {
                current,
                expected: MIGRATION_VERSION,
            });
        }
        Ok(store)
    }

    async fn init_db(&self) -> Result<(), EtlError> {
        // WAL journal mode: readers do not block the writer and vice versa
        self.read_conn
            .query("PRAGMA journal_mode=WAL;", ())
            .await?;

        let mut rows = self
            .read_conn
            .query(
                "SELECT name FROM sqlite_schema WHERE type='table' AND name='entities'",
                (),
            )
            .await?;
        if rows.next().await?.is_none() {
            let conn = self.write_conn.lock().await;
            let tx = conn.transaction().await?;
            for statement in DB_SCHEMA {
                tx.execute(statement, ()).await?;
            }
            tx.commit().await?;
            info!("mirror schema created");
        }
        Ok(())
    }

    async fn get_version(&self) -> Result<u64, EtlError> {
        let mut rows = self
            .read_conn
            .query("SELECT MAX(version) FROM migrations", ())
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| EtlError::Conversion("migrations table is empty".to_string()))?;
        let version: i64 = row.get(0)?;
        Ok(version as u64)
    }

    pub async fn has_processing_status(&self, network: &str) -> Result<bool, EtlError> {
        let mut rows = self
            .read_conn
            .query(
                "SELECT 1 FROM processing_status WHERE network = ?1",
                [network],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    pub async fn get_processing_status(
        &self,
        network: &str,
    ) -> Result<ProcessingStatus, EtlError> {
        let mut rows = self
            .read_conn
            .query(
                "SELECT last_processed_block_number, last_processed_block_hash \
                 FROM processing_status WHERE network = ?1",
                [network],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| EtlError::MissingProcessingStatus(network.to_string()))?;

        let number: i64 = row.get(0)?;
        let hash: String = row.get(1)?;
        Ok(ProcessingStatus {
            network: network.to_string(),
            last_processed_block_number: number as u64,
            last_processed_block_hash: H256::from_str(hash.trim_start_matches("0x"))
                .map_err(|e| EtlError::Conversion(e.to_string()))?,
        })
    }

    pub async fn insert_processing_status(
        &self,
        status: ProcessingStatus,
    ) -> Result<(), EtlError> {
        let conn = self.write_conn.lock().await;
        conn.execute(
            "INSERT INTO processing_status \
             (network, last_processed_block_number, last_processed_block_hash) \
             VALUES (?1, ?2, ?3)",
            (
                status.network,
                to_i64("block number", status.last_processed_block_number)?,
                hex_key(&status.last_processed_block_hash),
            ),
        )
        .await?;
        Ok(())
    }

    /// Replays one WAL block into the mirror. The operations and the
    /// processing-status advance commit atomically; any failure leaves the
    /// mirror at the previous block.
    pub async fn apply_block(
        &self,
        network: &str,
        block: &mut WalBlock,
    ) -> Result<(), EtlError> {
        let conn = self.write_conn.lock().await;
        let tx = conn.transaction().await?;

        while let Some(operation) = block.next_operation()? {
            match operation {
                Operation::Create(create) => Self::insert_entity(&tx, &create).await?,
                Operation::Update(update) => {
                    Self::delete_entity(&tx, &hex_key(&update.entity_key)).await?;
                    let create = Create {
                        entity_key: update.entity_key,
                        expires_at_block: update.expires_at_block,
                        payload: update.payload,
                        string_annotations: update.string_annotations,
                        numeric_annotations: update.numeric_annotations,
                    };
                    Self::insert_entity(&tx, &create).await?;
                }
                Operation::Delete(entity_key) => {
                    Self::delete_entity(&tx, &hex_key(&entity_key)).await?;
                }
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO processing_status \
             (network, last_processed_block_number, last_processed_block_hash) \
             VALUES (?1, ?2, ?3)",
            (
                network,
                to_i64("block number", block.info().number)?,
                hex_key(&block.info().hash),
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_entity(tx: &Transaction, create: &Create) -> Result<(), EtlError> {
        let key = hex_key(&create.entity_key);
        tx.execute(
            "INSERT INTO entities (key, expires_at_block, payload) VALUES (?1, ?2, ?3)",
            (
                key.clone(),
                to_i64("expiry block", create.expires_at_block)?,
                create.payload.to_vec(),
            ),
        )
        .await?;

        for annotation in &create.string_annotations {
            tx.execute(
                "INSERT OR REPLACE INTO string_annotations \
                 (entity_key, annotation_key, value) VALUES (?1, ?2, ?3)",
                (key.clone(), annotation.key.clone(), annotation.value.clone()),
            )
            .await?;
        }
        for annotation in &create.numeric_annotations {
            tx.execute(
                "INSERT OR REPLACE INTO numeric_annotations \
                 (entity_key, annotation_key, value) VALUES (?1, ?2, ?3)",
                (
                    key.clone(),
                    annotation.key.clone(),
                    to_i64("numeric annotation", annotation.value)?,
                ),
            )
            .await?;
        }
        Ok(())
    }

    async fn delete_entity(tx: &Transaction, key: &str) -> Result<(), EtlError> {
        tx.execute("DELETE FROM entities WHERE key = ?1", [key]).await?;
        tx.execute(
            "DELETE FROM string_annotations WHERE entity_key = ?1",
            [key],
        )
        .await?;
        tx.execute(
            "DELETE FROM numeric_annotations WHERE entity_key = ?1",
            [key],
        )
        .await?;
        Ok(())
    }

    pub async fn get_entity(&self, key: &H256) -> Result<Option<MirrorEntity>, EtlError> {
        let mut rows = self
            .read_conn
            .query(
                "SELECT key, expires_at_block, payload FROM entities WHERE key = ?1",
                [hex_key(key)],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let number: i64 = row.get(1)?;
        Ok(Some(MirrorEntity {
            key: row.get(0)?,
            expires_at_block: number as u64,
            payload: row.get(2)?,
        }))
    }

    pub async fn string_annotations(
        &self,
        key: &H256,
    ) -> Result<Vec<(String, String)>, EtlError> {
        let mut rows = self
            .read_conn
            .query(
                "SELECT annotation_key, value FROM string_annotations \
                 WHERE entity_key = ?1 ORDER BY annotation_key",
                [hex_key(key)],
            )
            .await?;
        let mut annotations = Vec::new();
        while let Some(row) = rows.next().await? {
            annotations.push((row.get(0)?, row.get(1)?));
        }
        Ok(annotations)
    }
}
