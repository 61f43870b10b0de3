#![allow(clippy::collapsible_if, clippy::needless_lifetimes)]

/// Use mimalloc as the global allocator for all binaries.
/// Faster than glibc malloc for the many small per-line allocations
/// made by the set and edit tools.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod affix;
pub mod common;
pub mod difflist;
pub mod divide;
pub mod edit;
pub mod listing;
pub mod organize;
pub mod pop;
pub mod rename;
