//! Configuration module

pub mod policy;
pub mod scan;

pub use policy::*;
pub use scan::*;
