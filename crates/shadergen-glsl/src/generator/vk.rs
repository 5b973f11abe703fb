use crate::binding::{ResourceBindingContext, VkResourceBindingContext};
use crate::error::GenError;
use crate::ir::Stage;
use crate::options::GenOptions;
use crate::syntax::Syntax;
use crate::writer::SourceWriter;

use super::ShaderGenerator;

/// GLSL 4.50 for Vulkan: explicit locations on all stage I/O and explicit `(set, binding)` on
/// every resource.
#[derive(Debug)]
pub struct VkShaderGenerator {
    syntax: Syntax,
    options: GenOptions,
    bindings: Box<dyn ResourceBindingContext>,
}

impl VkShaderGenerator {
    pub const TARGET: &'static str = "genglsl";
    pub const VERSION: &'static str = "450";

    pub fn new(options: GenOptions) -> Result<Self, GenError> {
        let bindings = VkResourceBindingContext::with_max_bindings_per_set(
            options.initial_descriptor_set,
            options.max_bindings_per_set,
        );
        Self::with_binding_context(options, Box::new(bindings))
    }

    /// Use a caller-supplied allocation policy instead of [`VkResourceBindingContext`].
    pub fn with_binding_context(
        options: GenOptions,
        bindings: Box<dyn ResourceBindingContext>,
    ) -> Result<Self, GenError> {
        let mut syntax = Syntax::vulkan();
        syntax.register_reserved_words(&options.reserved_words)?;
        Ok(Self {
            syntax,
            options,
            bindings,
        })
    }
}

impl ShaderGenerator for VkShaderGenerator {
    fn target(&self) -> &'static str {
        Self::TARGET
    }

    fn version(&self) -> &'static str {
        Self::VERSION
    }

    fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    fn options(&self) -> &GenOptions {
        &self.options
    }

    fn location_layout(&self, location: u32) -> Option<String> {
        Some(format!("layout (location = {location}) "))
    }

    fn resource_binding_context(&mut self) -> Option<&mut dyn ResourceBindingContext> {
        Some(&mut *self.bindings)
    }

    fn emit_resource_bindings(
        &mut self,
        stage: &Stage,
        out: &mut SourceWriter,
    ) -> Result<(), GenError> {
        for block in stage.uniform_blocks() {
            self.bindings
                .emit_resource_bindings(&self.syntax, block, stage.kind(), out)?;
        }
        Ok(())
    }
}
