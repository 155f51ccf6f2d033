//! Calls to the remote services the caption flow depends on.

pub mod caption;
pub mod speech;
pub mod translate;
