//! Synthesizer trait definition

use crate::error::Result;
use crate::template::Template;
use stackflow_core::ResourceGraph;

/// Provisioning engine abstraction
///
/// Each engine (AWS CloudFormation, ...) implements this trait to turn the
/// declared resource graph into the document it deploys. Diffing against live
/// infrastructure and the actual API calls stay on the engine side.
pub trait Synthesizer: Send + Sync {
    /// Returns the engine name (e.g., "aws-cloudformation")
    fn name(&self) -> &str;

    /// Returns the engine display name for UI
    fn display_name(&self) -> &str;

    /// Render the resource graph into a template document
    fn synthesize(&self, graph: &ResourceGraph) -> Result<Template>;
}
