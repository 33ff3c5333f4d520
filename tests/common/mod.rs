//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{gemini_client, valid_key, MockProviderServer, Reply, TRUE_SPRING_ANSWER};
//!
//! #[tokio::test]
//! async fn test_analyze() {
//!     let server = MockProviderServer::spawn(Reply::gemini_text(TRUE_SPRING_ANSWER)).await;
//!     let client = gemini_client(&server, valid_key());
//!     // ...
//! }
//! ```

mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{gemini_client, openai_client, test_options, valid_key};
#[allow(unused_imports)]
pub use server::{MockProviderServer, RecordedRequest, Reply};
