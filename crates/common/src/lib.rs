//! Shared utilities for editor services
//!
//! Philosophy:
//! - Errors carry structured causes, not just strings
//! - Configuration is read through typed accessors that fail early
//! - Waiting is always cancellable

pub mod env;
pub mod errors;
pub mod math;
pub mod object;
pub mod sleep;

pub use env::{Env, EnvError, EnvSource, ProcessEnv};
pub use errors::{ErrorCause, ErrorCauseObject, ErrorKind, UtilError};
pub use sleep::{sleep, sleep_millis, AbortController, AbortReason, AbortSignal};
