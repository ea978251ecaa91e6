//! Storage traits plus the SQLite and in-memory backends used by the
//! settlement engine.

mod error;
mod memory;
mod repository;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackOffice;
pub use repository::{
    BackOfficeStore, EntryStore, LedgerStore, ProductStore, ReturnDeltaStore, ReturnStore,
    SaleStore,
};
pub use sqlite::SqliteBackOffice;
