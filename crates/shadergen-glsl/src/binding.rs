//! Descriptor set / binding slot allocation for resource-bearing blocks.
//!
//! Positional stage I/O (`layout (location = N)`) is numbered per block by the generator and never
//! goes through this module. Uniform buffers and samplers share one `(set, binding)` index space
//! per generation session:
//!
//! - the cursor starts at `(initial_set, 0)`,
//! - each allocation hands out the cursor and advances the binding slot,
//! - once a set holds `max_bindings_per_set` bindings the cursor moves to `(set + 1, 0)`.
//!
//! Allocation is monotonic. There is no way to release or reset a binding; a new session needs a
//! new context.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::ir::{StageKind, VariableBlock};
use crate::syntax::Syntax;
use crate::writer::SourceWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingLocation {
    pub set: u32,
    pub binding: u32,
}

impl fmt::Display for BindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set = {}, binding = {}", self.set, self.binding)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("descriptor binding space exhausted while allocating for block {block:?}")]
    Exhausted { block: String },
}

pub trait ResourceBindingContext: fmt::Debug + Send {
    /// Descriptor set index the session started from.
    fn initial_set(&self) -> u32;

    /// Allocate the next free `(set, binding)` pair. Never returns the same pair twice.
    fn next_binding_location(
        &mut self,
        block: &VariableBlock,
    ) -> Result<BindingLocation, BindingError>;

    /// Emit declarations for a uniform block.
    ///
    /// Value uniforms are packed into one std140 uniform block sharing a single binding; every
    /// opaque (sampler) uniform gets its own binding. The std140 block is named
    /// `<block>_<stage>`, made a valid identifier outside the reserved set.
    fn emit_resource_bindings(
        &mut self,
        syntax: &Syntax,
        block: &VariableBlock,
        stage: StageKind,
        out: &mut SourceWriter,
    ) -> Result<(), BindingError> {
        if block.is_empty() {
            return Ok(());
        }

        if block.iter().any(|v| !v.ty.is_resource()) {
            let location = self.next_binding_location(block)?;
            let block_name = syntax.make_identifier(
                &format!("{}_{}", block.name(), stage.name()),
                &mut HashMap::new(),
            );
            out.emit_line(
                &format!(
                    "layout (std140, {location}) {} {block_name}",
                    syntax.uniform_qualifier()
                ),
                false,
            );
            out.scope_begin();
            for variable in block.iter().filter(|v| !v.ty.is_resource()) {
                out.emit_line(&syntax.variable_declaration(variable, "", false), true);
            }
            out.scope_end(true, true);
        }

        for variable in block.iter().filter(|v| v.ty.is_resource()) {
            let location = self.next_binding_location(block)?;
            out.emit_line(
                &format!(
                    "layout ({location}) {}",
                    syntax.variable_declaration(variable, syntax.uniform_qualifier(), false)
                ),
                true,
            );
        }
        out.line_break();
        Ok(())
    }
}

/// Vulkan-style monotonic allocator.
#[derive(Debug, Clone)]
pub struct VkResourceBindingContext {
    initial_set: u32,
    max_bindings_per_set: u32,
    next: Option<BindingLocation>,
}

impl VkResourceBindingContext {
    pub fn new(initial_set: u32) -> Self {
        Self::with_max_bindings_per_set(initial_set, u32::MAX)
    }

    pub fn with_max_bindings_per_set(initial_set: u32, max_bindings_per_set: u32) -> Self {
        Self {
            initial_set,
            max_bindings_per_set: max_bindings_per_set.max(1),
            next: Some(BindingLocation {
                set: initial_set,
                binding: 0,
            }),
        }
    }

    fn advance(&self, location: BindingLocation) -> Option<BindingLocation> {
        match location.binding.checked_add(1) {
            Some(binding) if binding < self.max_bindings_per_set => Some(BindingLocation {
                set: location.set,
                binding,
            }),
            _ => location
                .set
                .checked_add(1)
                .map(|set| BindingLocation { set, binding: 0 }),
        }
    }
}

impl Default for VkResourceBindingContext {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ResourceBindingContext for VkResourceBindingContext {
    fn initial_set(&self) -> u32 {
        self.initial_set
    }

    fn next_binding_location(
        &mut self,
        block: &VariableBlock,
    ) -> Result<BindingLocation, BindingError> {
        let Some(location) = self.next else {
            return Err(BindingError::Exhausted {
                block: block.name().to_owned(),
            });
        };
        self.next = self.advance(location);
        trace!(block = block.name(), %location, "allocated resource binding");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ir::{DataType, Variable};

    fn block() -> VariableBlock {
        VariableBlock::new("PublicUniforms")
    }

    #[test]
    fn first_allocation_uses_initial_set() {
        let mut ctx = VkResourceBindingContext::new(2);
        assert_eq!(ctx.initial_set(), 2);
        assert_eq!(
            ctx.next_binding_location(&block()).unwrap(),
            BindingLocation { set: 2, binding: 0 }
        );
        assert_eq!(
            ctx.next_binding_location(&block()).unwrap(),
            BindingLocation { set: 2, binding: 1 }
        );
    }

    #[test]
    fn allocations_never_repeat_and_strictly_increase() {
        let mut ctx = VkResourceBindingContext::with_max_bindings_per_set(0, 3);
        let mut seen = HashSet::new();
        let mut prev = None;
        for _ in 0..20 {
            let loc = ctx.next_binding_location(&block()).unwrap();
            assert!(seen.insert(loc), "duplicate binding {loc}");
            if let Some(prev) = prev {
                assert!(loc > prev, "{loc} does not follow {prev}");
            }
            prev = Some(loc);
        }
        assert_eq!(prev, Some(BindingLocation { set: 6, binding: 1 }));
    }

    #[test]
    fn exhaustion_is_reported_and_sticky() {
        let mut ctx = VkResourceBindingContext::with_max_bindings_per_set(u32::MAX, 2);
        ctx.next_binding_location(&block()).unwrap();
        ctx.next_binding_location(&block()).unwrap();
        let err = ctx.next_binding_location(&block()).unwrap_err();
        assert_eq!(
            err,
            BindingError::Exhausted {
                block: "PublicUniforms".to_owned()
            }
        );
        assert!(ctx.next_binding_location(&block()).is_err());
    }

    #[test]
    fn uniform_block_emission_splits_values_and_samplers() {
        let uniforms = VariableBlock::new("PublicUniforms")
            .with_variable(Variable::new("u_albedo", DataType::Sampler2D))
            .with_variable(Variable::new("u_tint", DataType::Vec4).with_value("vec4(1.0)"))
            .with_variable(Variable::new("u_env", DataType::SamplerCube));

        let mut ctx = VkResourceBindingContext::new(1);
        let mut out = SourceWriter::new();
        ctx.emit_resource_bindings(&Syntax::vulkan(), &uniforms, StageKind::Pixel, &mut out)
            .unwrap();

        pretty_assertions::assert_eq!(
            out.as_str(),
            "layout (std140, set = 1, binding = 0) uniform PublicUniforms_pixel\n\
             {\n\
             \x20   vec4 u_tint;\n\
             };\n\
             layout (set = 1, binding = 1) uniform sampler2D u_albedo;\n\
             layout (set = 1, binding = 2) uniform samplerCube u_env;\n\
             \n"
        );
    }

    #[test]
    fn uniform_block_name_is_a_legal_unreserved_identifier() {
        let spaced = VariableBlock::new("Public Uniforms")
            .with_variable(Variable::new("u_time", DataType::Float));
        let lights = VariableBlock::new("Lights")
            .with_variable(Variable::new("u_count", DataType::Int));

        let mut syntax = Syntax::vulkan();
        syntax.register_reserved_words(["Lights_pixel"]).unwrap();
        let mut ctx = VkResourceBindingContext::new(0);
        let mut out = SourceWriter::new();
        ctx.emit_resource_bindings(&syntax, &spaced, StageKind::Pixel, &mut out)
            .unwrap();
        ctx.emit_resource_bindings(&syntax, &lights, StageKind::Pixel, &mut out)
            .unwrap();

        let text = out.as_str();
        assert!(
            text.contains("layout (std140, set = 0, binding = 0) uniform Public_Uniforms_pixel\n"),
            "{text}"
        );
        assert!(
            text.contains("layout (std140, set = 0, binding = 1) uniform Lights_pixel1\n"),
            "{text}"
        );
    }

    #[test]
    fn empty_uniform_block_allocates_nothing() {
        let mut ctx = VkResourceBindingContext::new(0);
        let mut out = SourceWriter::new();
        ctx.emit_resource_bindings(&Syntax::vulkan(), &block(), StageKind::Vertex, &mut out)
            .unwrap();
        assert!(out.as_str().is_empty());
        assert_eq!(
            ctx.next_binding_location(&block()).unwrap(),
            BindingLocation { set: 0, binding: 0 }
        );
    }
}
