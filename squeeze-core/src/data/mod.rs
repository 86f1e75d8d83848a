//! Data management module
//!
//! Symbols, daily bars, and the collaborator traits that supply them.

pub mod bar;
pub mod provider;
pub mod symbol;
pub mod universe;

pub use bar::*;
pub use provider::*;
pub use symbol::*;
pub use universe::*;
