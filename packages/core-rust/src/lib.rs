//! `stringsvc` core: the string service contract, endpoints, and message schemas.

pub mod endpoint;
pub mod error;
pub mod messages;
pub mod method;
pub mod service;

pub use endpoint::{Endpoint, EndpointSet};
pub use error::{ServiceError, TransportError};
pub use method::Method;
pub use service::{BasicService, StringService};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
