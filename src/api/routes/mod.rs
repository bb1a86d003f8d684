//! API route modules.

pub mod controls;
