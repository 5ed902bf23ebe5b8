//! Panic payload helpers.
//!
//! Step handlers signal broken expectations with the usual assertion macros,
//! so the engine catches unwinding panics around every handler and hook and
//! turns the payload into a message.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly, while all other types are rendered
/// using their [`Debug`](core::fmt::Debug) implementation.
///
/// # Examples
///
/// ```
/// use trellis_bdd::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| format!("{payload:?}"))
}

/// Run `f`, converting an unwinding panic into its message.
///
/// The closure may hold `&mut` borrows of the world. A panic leaves that
/// world in whatever state the handler reached, which is what the caller
/// reports on, so unwind safety is asserted.
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
