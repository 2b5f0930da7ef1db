//! StackFlow Cloud
//!
//! Provisioning engine abstraction for StackFlow. A [`Synthesizer`] turns the
//! declared [`stackflow_core::ResourceGraph`] into a [`Template`], and the
//! [`AssemblyWriter`] stores the result for the engine's deploy workflow.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │  stackflow-core  │     │ stackflow-cloud  │     │ stack.out/       │
//! │  TopologyBuilder ├────►│  Synthesizer     ├────►│  *.template.json │
//! │  (ResourceGraph) │     │  (Template)      │     │  manifest.json   │
//! └──────────────────┘     └────────┬─────────┘     └──────────────────┘
//!                                   │
//!                         ┌─────────▼───────────┐
//!                         │ stackflow-cloud-aws │
//!                         │  (CloudFormation)   │
//!                         └─────────────────────┘
//! ```

pub mod assembly;
pub mod error;
pub mod synthesizer;
pub mod template;

// Re-exports
pub use assembly::{AssemblyManifest, AssemblyWriter, DEFAULT_OUT_DIR, StackArtifact};
pub use error::{CloudError, Result};
pub use synthesizer::Synthesizer;
pub use template::{
    Template, TemplateFormat, TemplateOutput, TemplateParameter, TemplateResource,
    TemplateSummary,
};
