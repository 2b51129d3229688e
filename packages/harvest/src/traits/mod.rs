//! Trait seams between the pipeline and its pluggable pieces.

mod provider;
mod renderer;
mod store;

pub use provider::ReasoningProvider;
pub use renderer::{PageRenderer, RenderedPage};
pub use store::{
    AuditStore, ContentStore, DocumentStore, EntityStore, HarvestStore, LinkStore, UpsertOutcome,
};
