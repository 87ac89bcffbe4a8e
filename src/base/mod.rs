//! Base types and error handling.
//!
//! Provides foundational types mirroring Chromium's `net/base/`:
//! - [`NetError`](neterror::NetError): Network error codes matching `net_error_list.h`,
//!   extended with resolver-specific errors
//! - [`IoResultExt`](context::IoResultExt): context helpers for IO results

pub mod context;
pub mod neterror;
