pub mod backend;
pub mod preferences;

pub use backend::{FileStorage, MemoryStorage, Storage};
pub use preferences::{PreferenceKey, PreferenceStore};
