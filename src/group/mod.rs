//! Group Module
//!
//! Cache namespaces, the registry that names them, the source loader
//! capability and per-key request coalescing.

mod cache_group;
mod flight;
mod getter;
mod registry;

pub use cache_group::Group;
pub use flight::Flight;
pub use getter::{Getter, GetterFunc};
pub use registry::GroupRegistry;
