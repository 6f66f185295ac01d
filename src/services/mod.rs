pub mod catalog;
pub mod details;
pub mod discovery;
pub mod profile;
pub mod search;

pub use catalog::{Catalog, CatalogApi, TmdbClient};
pub use discovery::{DiscoveryEngine, DiscoveryRequest};
pub use profile::UserProfile;
