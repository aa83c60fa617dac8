//! Submodules for message transport integration tests.

mod negotiation;
mod rejection;
