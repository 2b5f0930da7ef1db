//! CloudFormation synthesizer

use crate::compute::{render_access_host, render_instance_pool};
use crate::context::SynthContext;
use crate::intrinsic::get_att;
use crate::load_balancer::{open_listeners, render_load_balancer};
use crate::logical_id::logical_id;
use crate::security_group::render_rule;
use serde_json::json;
use stackflow_cloud::{CloudError, Result, Synthesizer, Template, TemplateOutput};
use stackflow_core::{Attribute, OutputBinding, Resource, ResourceGraph};

fn attribute_name(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::DnsName => "DNSName",
    }
}

fn render_output(ctx: &mut SynthContext<'_>, binding: &OutputBinding) -> Result<()> {
    let target = &binding.value.resource;
    match ctx.graph.get(target) {
        Some(Resource::LoadBalancer(_)) => {}
        Some(other) => {
            return Err(CloudError::UnresolvedReference(format!(
                "{} has no {:?} attribute ({})",
                target,
                binding.value.attribute,
                other.kind()
            )));
        }
        None => return Err(CloudError::UnresolvedReference(target.to_string())),
    }

    let resource_id = ctx.logical_id_of(target)?.to_string();
    let output = TemplateOutput {
        value: get_att(&resource_id, attribute_name(binding.value.attribute)),
        description: None,
        export: binding
            .export_name
            .as_ref()
            .map(|name| json!({ "Name": name })),
    };
    ctx.template
        .outputs
        .insert(logical_id(&[binding.name.as_str()])?, output);
    Ok(())
}

/// Renders a resource graph as an AWS CloudFormation template
#[derive(Debug, Clone, Default)]
pub struct CloudFormationSynthesizer;

impl CloudFormationSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Synthesizer for CloudFormationSynthesizer {
    fn name(&self) -> &str {
        "aws-cloudformation"
    }

    fn display_name(&self) -> &str {
        "AWS CloudFormation"
    }

    #[tracing::instrument(skip_all, fields(stack = %graph.stack_name))]
    fn synthesize(&self, graph: &ResourceGraph) -> Result<Template> {
        let mut ctx = SynthContext::new(graph);

        // Load balancers first so pools can pick up their target groups
        for lb in graph.load_balancers() {
            render_load_balancer(&mut ctx, lb)?;
        }
        for host in graph.access_hosts() {
            render_access_host(&mut ctx, host)?;
        }
        for pool in graph.instance_pools() {
            render_instance_pool(&mut ctx, pool)?;
        }

        for rule in graph.rules() {
            render_rule(&mut ctx, rule)?;
        }
        for lb in graph.load_balancers() {
            open_listeners(&mut ctx, lb)?;
        }

        for binding in graph.outputs() {
            render_output(&mut ctx, binding)?;
        }

        let template = ctx.finish();
        tracing::info!(summary = %template.summary(), "Synthesized template");
        Ok(template)
    }
}
