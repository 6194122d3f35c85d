//! API token model, credential sources, secret stores, and the memoizing resolver.
//!
//! Resolution walks an ordered list of [`CredentialSource`] strategies (environment, platform
//! secret store, plaintext file) and memoizes the first present value, or the confirmed
//! absence, for the lifetime of the [`CredentialResolver`].

pub mod resolver;
pub mod secret;
pub mod source;
pub mod store;

pub use resolver::*;
pub use secret::*;
pub use source::*;
pub use store::*;
