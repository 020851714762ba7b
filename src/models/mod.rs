pub mod endpoint;

pub use endpoint::{EndpointChanges, EndpointRecord, EndpointSummary, NewEndpoint};
