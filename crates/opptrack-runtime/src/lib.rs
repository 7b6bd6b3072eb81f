// Application layer over the record and blob stores.
// Tracker is the entry point; each *Ops struct borrows it for one entity.
// View state, filters and the optimistic edit table are plain values owned
// by the caller.

pub mod client;
pub mod config;
pub mod edits;
pub mod error;
pub mod filter;
pub mod form;
pub mod view;
pub mod view_state;
pub mod watcher;

pub use client::{
    AttachmentOps, CompanyOps, DB_FILE, DeleteOutcome, DeleteReport, EditOutcome, OpportunityOps,
    Tracker,
};
pub use config::{Config, resolve_data_dir};
pub use edits::{EditState, EditTicket, OptimisticTable, PendingEdit, SettleOutcome};
pub use error::{Error, Result};
pub use filter::{FilterMode, Selection};
pub use form::OpportunityForm;
pub use view::{SortDirection, SortKey, Summary, TableSort, TimelineGroup};
pub use view_state::{VIEW_STATE_FILE, ViewState};
pub use watcher::{StoreWatcher, WaitResult};
