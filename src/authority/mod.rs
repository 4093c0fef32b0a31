//! Authority data consulted while building records.
//!
//! - [`AuthorityTable`]: author code → biographical dates
//! - [`KnownTranslations`]: original-work identifiers of the prior catalog
//! - [`AuthorityResolver`]: the run-scoped context combining both, which also
//!   mints identifiers for works the catalog does not know

mod known;
mod resolver;
mod table;

pub use known::{KnownTranslations, WorkKey, ORIGINAL_WORK_TAG};
pub use resolver::{AuthorityResolver, DEFAULT_RETRY_LIMIT, IDENTIFIER_PREFIX};
pub use table::AuthorityTable;
