//! Change queue adapters for the change hook.
//!
//! Implements the [`pipeline::ChangeQueue`] port twice:
//!
//! - [`HttpChangeQueue`] posts each change as JSON to the master's change
//!   endpoint and reads back the id the master assigned.
//! - [`InMemoryChangeQueue`] keeps changes in process. The binary uses it when
//!   no master is configured; tests use it to observe what was submitted.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, timeouts and response decoding all live
//! here. The [`pipeline`] crate sees only [`pipeline::ChangeQueue`] and
//! [`pipeline::QueueError`].
//!
//! ## Wire format
//!
//! `POST <url>` with the change record as a JSON object (the discard flag is
//! never sent). A 2xx response carries `{"changeid": <u64>}`; any other
//! status is a rejection whose body explains why.

pub mod http;
pub mod memory;

pub use http::{HttpChangeQueue, MasterClientError, MasterConfig, DEFAULT_TIMEOUT_SECS};
pub use memory::InMemoryChangeQueue;
