//! StackFlow AWS
//!
//! Renders a [`stackflow_core::ResourceGraph`] as an AWS CloudFormation
//! template. Deployment itself is left to CloudFormation.

mod compute;
mod context;
mod intrinsic;
mod load_balancer;
mod logical_id;
mod security_group;
mod synthesizer;

pub use synthesizer::CloudFormationSynthesizer;
