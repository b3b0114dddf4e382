//! skyroute CLI library.
//!
//! Terminal styling and output formatting shared by the `skyroute` binary.

pub mod output;
pub mod terminal;
