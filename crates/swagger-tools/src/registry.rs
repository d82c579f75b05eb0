//! Tool registry.
//!
//! Built once from a parsed specification plus a filter policy, then immutable. Both
//! front-ends list and resolve tools through the same registry instance, so they always agree
//! on names, descriptions, and schemas.

use crate::descriptor::ToolDescriptor;
use crate::error::{Result, SwaggerToolsError};
use crate::filter::FilterPolicy;
use crate::semantics::annotations_for_method;
use crate::spec::Specification;
use rmcp::model::{JsonObject, Tool};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable table of tool descriptors with a reverse name index.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build the registry by iterating every `(path, method)` pair of the spec.
    ///
    /// Paths iterate in lexicographic order and methods in the fixed order GET, POST, PUT,
    /// DELETE, PATCH, so the tool listing is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggerToolsError::Config`] when the spec declares no paths or two accepted
    /// operations derive the same tool name.
    pub fn build(spec: &Specification, policy: &FilterPolicy) -> Result<Self> {
        if spec.paths.is_empty() {
            return Err(SwaggerToolsError::Config(
                "Specification declares no paths".to_string(),
            ));
        }

        let mut descriptors: Vec<ToolDescriptor> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (path, item) in &spec.paths {
            for (method, operation) in item.operations() {
                if policy.should_exclude(method, path, operation) {
                    tracing::debug!("Filtered out {method} {path}");
                    continue;
                }

                let descriptor = ToolDescriptor::from_operation(method, path, operation)?;
                if index.contains_key(&descriptor.name) {
                    return Err(SwaggerToolsError::Config(format!(
                        "Duplicate tool name '{}' produced by {method} {path}",
                        descriptor.name
                    )));
                }

                index.insert(descriptor.name.clone(), descriptors.len());
                descriptors.push(descriptor);
            }
        }

        if descriptors.is_empty() {
            tracing::warn!("Filter policy excluded every operation; no tools registered");
        }

        Ok(Self { descriptors, index })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Read-only snapshot of every registered descriptor, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Resolve a tool name back to its descriptor.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|i| &self.descriptors[*i])
    }

    /// Project every descriptor into an MCP `Tool`.
    #[must_use]
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.descriptors
            .iter()
            .map(|d| {
                let schema = d
                    .input_schema
                    .as_object()
                    .cloned()
                    .unwrap_or_else(JsonObject::new);
                let mut tool =
                    Tool::new(d.name.clone(), d.description.clone(), Arc::new(schema));
                tool.annotations = Some(annotations_for_method(&d.method));
                tool
            })
            .collect()
    }
}
