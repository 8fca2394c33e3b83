//! `CooldownStore` — the durable, per-app last-scale-up/down clock.
//!
//! Two implementations: [`InMemoryCooldownStore`] for tests and
//! [`RedbCooldownStore`] for production, both behind the same trait so
//! the decision engine is indifferent to which one backs it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use fleetscale_core::{CooldownKind, CooldownRecord};

use crate::error::{CooldownError, CooldownResult};
use crate::tables::{LAST_SCALE_DOWN, LAST_SCALE_UP};

/// Durable per-app last-scale-up/down timestamps.
///
/// A missing record for `(app_name, kind)` means "no prior event". Reads
/// and writes are idempotent and last-writer-wins; the control loop is
/// single-threaded so concurrent writers are not expected.
pub trait CooldownStore: Send + Sync {
    /// Fetch the most recent record for `(app_name, kind)`, if any.
    fn get(&self, app_name: &str, kind: CooldownKind) -> CooldownResult<Option<CooldownRecord>>;

    /// Record a scale event of `kind` for `app_name` at `timestamp`.
    fn set(&self, app_name: &str, kind: CooldownKind, timestamp: u64) -> CooldownResult<()>;
}

/// In-memory cooldown store, for tests and for best-effort fallback
/// when a durable write fails.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCooldownStore {
    records: Arc<Mutex<HashMap<(String, CooldownKind), CooldownRecord>>>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CooldownStore for InMemoryCooldownStore {
    fn get(&self, app_name: &str, kind: CooldownKind) -> CooldownResult<Option<CooldownRecord>> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&(app_name.to_string(), kind)).copied())
    }

    fn set(&self, app_name: &str, kind: CooldownKind, timestamp: u64) -> CooldownResult<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert((app_name.to_string(), kind), CooldownRecord { timestamp });
        Ok(())
    }
}

/// Convert any `Display` error into a `CooldownError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| CooldownError::$variant(e.to_string())
    };
}

/// redb-backed cooldown store. Survives process restarts.
#[derive(Clone)]
pub struct RedbCooldownStore {
    db: Arc<Database>,
}

impl RedbCooldownStore {
    /// Open (or create) a persistent cooldown store at the given path.
    pub fn open(path: &Path) -> CooldownResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "cooldown store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory redb-backed store (for testing the
    /// redb code path without touching disk).
    pub fn open_in_memory() -> CooldownResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> CooldownResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(LAST_SCALE_UP).map_err(map_err!(Table))?;
        txn.open_table(LAST_SCALE_DOWN).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn table_for(kind: CooldownKind) -> redb::TableDefinition<'static, &'static str, &'static [u8]> {
        match kind {
            CooldownKind::Up => LAST_SCALE_UP,
            CooldownKind::Down => LAST_SCALE_DOWN,
        }
    }
}

impl CooldownStore for RedbCooldownStore {
    fn get(&self, app_name: &str, kind: CooldownKind) -> CooldownResult<Option<CooldownRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(Self::table_for(kind)).map_err(map_err!(Table))?;
        match table.get(app_name).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: CooldownRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn set(&self, app_name: &str, kind: CooldownKind, timestamp: u64) -> CooldownResult<()> {
        let record = CooldownRecord { timestamp };
        let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(Self::table_for(kind)).map_err(map_err!(Table))?;
            table
                .insert(app_name, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%app_name, ?kind, timestamp, "cooldown recorded");
        Ok(())
    }
}
