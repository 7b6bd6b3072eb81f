use opptrack_store::{BlobStore, ChangeEvent, Database, FsBlobStore, Table};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::debug;

use crate::client::{AttachmentOps, CompanyOps, OpportunityOps};
use crate::config::{CONFIG_FILE, Config};
use crate::view_state::{VIEW_STATE_FILE, ViewState};
use crate::watcher::StoreWatcher;
use crate::Result;

pub const DB_FILE: &str = "opptrack.db";

/// Entry point over one data directory: database, blob store, config and
/// view state.
pub struct Tracker {
    db: Database,
    blobs: Box<dyn BlobStore>,
    config: Config,
    data_dir: PathBuf,
}

impl Tracker {
    /// Create the data directory, schema and a default config file
    pub fn init(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
        }
        Self::open(data_dir)
    }

    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let config = Config::load_from(&data_dir.join(CONFIG_FILE))?;
        let db = Database::open(&data_dir.join(DB_FILE))?;

        let mut blobs = FsBlobStore::new(config.blob_dir(&data_dir));
        if let Some(base) = &config.storage.public_base_url {
            blobs = blobs.with_public_base_url(base.clone());
        }
        debug!(data_dir = %data_dir.display(), blobs = %blobs.root().display(), "tracker opened");

        Ok(Self::with_parts(db, Box::new(blobs), config, data_dir))
    }

    pub fn with_parts(
        db: Database,
        blobs: Box<dyn BlobStore>,
        config: Config,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            db,
            blobs,
            config,
            data_dir,
        }
    }

    pub fn companies(&self) -> CompanyOps<'_> {
        CompanyOps::new(&self.db)
    }

    pub fn opportunities(&self) -> OpportunityOps<'_> {
        OpportunityOps::new(&self.db, self.blobs.as_ref())
    }

    pub fn attachments(&self) -> AttachmentOps<'_> {
        AttachmentOps::new(&self.db, self.blobs.as_ref())
    }

    pub fn load_view_state(&self) -> ViewState {
        ViewState::load_from(&self.view_state_path())
    }

    pub fn save_view_state(&self, state: &ViewState) -> Result<()> {
        state.save_to(&self.view_state_path())
    }

    /// In-process change notifications for one table
    pub fn subscribe(&self, table: Table) -> Receiver<ChangeEvent> {
        self.db.subscribe(table)
    }

    /// Watch the database file for writes from other processes
    pub fn watch(&self) -> Result<StoreWatcher> {
        StoreWatcher::new(
            &self.database_path(),
            Duration::from_millis(self.config.watch.poll_interval_ms),
        )
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn view_state_path(&self) -> PathBuf {
        self.data_dir.join(VIEW_STATE_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
