pub mod book;
pub mod error;
pub mod patch;
pub mod update;
pub mod validate;

pub use book::{parse_create, BookPayload, BookRecord};
pub use error::ValidationError;
pub use patch::Patch;
pub use update::{apply_update, parse_update, BookUpdate};
