//! Priced NBA statistics queries over the ESPN APIs.
//!
//! Each entrypoint resolves its identifiers, fans out to the upstream through
//! the fetch orchestrator and normalizes the payloads into a fixed output
//! shape. The [`Dispatcher`] routes invocations by name and publishes the
//! discovery document.

pub mod context;
pub mod dispatcher;
pub mod entrypoint;
pub mod error;
pub mod ops;
pub mod pricing;

pub use context::Context;
pub use dispatcher::{DiscoveryDocument, Dispatcher, EntrypointDescriptor};
pub use entrypoint::{decode_input, Entrypoint, EntrypointResult, ErasedEntrypoint, ValidateInput};
pub use error::{EntrypointError, Result, SetupError};
pub use pricing::{Price, PriceTier};
