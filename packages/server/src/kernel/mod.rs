// External collaborators and their trait seams
pub mod deps;
pub mod extraction_client;
pub mod grants_client;
pub mod store;
pub mod test_dependencies;

pub use deps::*;
pub use extraction_client::{ExtractionError, OpenAiExtractor, ProjectDraft, ProjectExtractor};
pub use grants_client::{GrantsClient, GrantsDirectory, GrantsError};
pub use store::{HttpStore, Store, StoreError, StoreResult};
