pub mod api;
pub mod csv_store;
pub mod errors;
pub mod model;

pub use api::{InMemoryOutcomeStore, OutcomeRecorder, StoreResult};
pub use csv_store::CsvOutcomeStore;
pub use errors::StoreError;
pub use model::{same_link, CANONICAL_HEADER};
