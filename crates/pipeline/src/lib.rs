//! Core domain of the change hook.
//!
//! This crate contains everything that decides what happens to an inbound
//! webhook: the canonical [`ChangeRecord`], the dialect plugin contract, the
//! plugin registry, routing, per-request handling, and the sequential
//! submission pipeline that feeds the master's change queue.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! The HTTP transport (`listener`), the concrete dialects (`dialects`) and the
//! change queue clients (`master-client`) plug into the traits defined here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`DialectName`, `ChangeId`, `RequestId`) |
//! | [`record`] | `ChangeRecord` and `Revision` |
//! | [`errors`] | Error taxonomy and status-code mapping |
//! | [`request`] | Transport-neutral `WebhookRequest` |
//! | [`plugin`] | `DialectPlugin`, `LegacyTranslator`, `LegacyAdapter` |
//! | [`registry`] | `PluginRegistry` |
//! | [`router`] | `DialectConfig` and `DialectRouter` |
//! | [`submission`] | `ChangeQueue` port and `SubmissionPipeline` |
//! | [`handler`] | `DialectRequestHandler` and `ChangeHook` |

pub mod errors;
pub mod handler;
pub mod identifiers;
pub mod plugin;
pub mod record;
pub mod registry;
pub mod request;
pub mod router;
pub mod submission;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{HookError, TranslationError};
pub use handler::{ChangeHook, DialectRequestHandler, HookResponse};
pub use identifiers::{ChangeId, DialectName, RequestId};
pub use plugin::{
    stream_empty, stream_error, stream_from, ChangeStream, DialectOptions, DialectPlugin,
    LegacyAdapter, LegacyTranslator,
};
pub use record::{ChangeRecord, RecordError, Revision};
pub use registry::PluginRegistry;
pub use request::{HttpMethod, WebhookRequest};
pub use router::{
    DialectConfig, DialectRoute, DialectRouter, DEFAULT_DIALECT, DIAGNOSTIC_DIALECTS,
    SYNC_CALL_PATH,
};
pub use submission::{ChangeQueue, QueueError, SubmissionPipeline, SubmissionReport};
