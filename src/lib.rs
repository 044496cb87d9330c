//! podfs library
//!
//! Core of a filesystem explorer for running pod containers: the tree model,
//! the favorites store, remote document content and local staging of edited
//! files. The `podfs` binary is one host for it.

pub mod config;
pub mod content;
pub mod favorites;
pub mod kube;
pub mod notify;
pub mod session;
pub mod staging;
pub mod tree;

pub use session::{Action, Explorer};
