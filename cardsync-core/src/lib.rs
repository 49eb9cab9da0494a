//! cardsync-core: transit-card and ledger transaction types, translation, and
//! the balance-matching sync engine

pub mod ledger;
pub mod money;
pub mod source;
pub mod sync;
pub mod translate;

pub use ledger::{LedgerAccount, LedgerTransaction};
pub use money::{AmountError, Milliunits};
pub use source::{DateRange, SourceKind, SourceTransaction};
pub use sync::{Ledger, SyncEngine, SyncJob, SyncReport, TransactionSource, new_transactions, plan};
pub use translate::{IMPORT_ID_PREFIX, ImportIdScheme, Translator};
