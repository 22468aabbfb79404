pub mod resource;

pub use resource::{InMemoryFetcher, ResourceError, ResourceFetcher, SharedResourceData};
