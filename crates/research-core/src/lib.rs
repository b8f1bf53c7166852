//! Research Core
//!
//! Shared data contracts for the research desk: stock records, the metric and
//! prediction key taxonomy, the error type, and the immutable catalog that
//! both engines read from.

pub mod catalog;
pub mod error;
pub mod keys;
pub mod types;

pub use catalog::Catalog;
pub use error::*;
pub use keys::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalog and records are shared across call sites without locks.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Catalog>();
        require_sync::<Catalog>();
        require_send::<Stock>();
        require_sync::<Stock>();
        require_send::<FilterKey>();
        require_sync::<FilterKey>();
        require_send::<ResearchError>();
        require_sync::<ResearchError>();
    }
}
