//! Persistence of the build context between tool invocations

pub mod context;
