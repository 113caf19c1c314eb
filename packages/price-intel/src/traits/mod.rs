//! Collaborator seams.
//!
//! The library never owns persistence or the remote API; applications
//! plug them in through these traits.

pub mod backend;
pub mod store;
