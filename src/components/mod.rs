//! View components.

pub mod topology;
