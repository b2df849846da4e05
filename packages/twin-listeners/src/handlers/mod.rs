//! Response writers shared by both listeners.

pub mod response;

pub use response::*;
