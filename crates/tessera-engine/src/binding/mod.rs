//! Binding sets: concrete resources assigned to a pipeline's binding layout.
//!
//! A [`BindingSet`] can only be built from a [`Pipeline`](crate::pipeline::Pipeline) and borrowed
//! resource handles, so it cannot exist before the pipeline layout and every
//! resource it references.

mod layout;
mod set;

pub use layout::{BindingKind, BindingSlot};
pub use set::{check_entries, BindingEntry, BindingMismatch, BindingResource, BindingSet};
