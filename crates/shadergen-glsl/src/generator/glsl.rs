use crate::binding::ResourceBindingContext;
use crate::error::GenError;
use crate::ir::Stage;
use crate::options::GenOptions;
use crate::syntax::Syntax;
use crate::writer::SourceWriter;

use super::ShaderGenerator;

/// Desktop GLSL 4.00: stage I/O is matched by name and uniforms are loose declarations, so there
/// is no binding context.
#[derive(Debug, Clone)]
pub struct GlslShaderGenerator {
    syntax: Syntax,
    options: GenOptions,
}

impl GlslShaderGenerator {
    pub const TARGET: &'static str = "genglsl";
    pub const VERSION: &'static str = "400";

    pub fn new(options: GenOptions) -> Result<Self, GenError> {
        let mut syntax = Syntax::glsl();
        syntax.register_reserved_words(&options.reserved_words)?;
        Ok(Self { syntax, options })
    }
}

impl ShaderGenerator for GlslShaderGenerator {
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

    fn location_layout(&self, _location: u32) -> Option<String> {
        None
    }

    fn resource_binding_context(&mut self) -> Option<&mut dyn ResourceBindingContext> {
        None
    }

    fn emit_resource_bindings(
        &mut self,
        stage: &Stage,
        out: &mut SourceWriter,
    ) -> Result<(), GenError> {
        for block in stage.uniform_blocks().filter(|b| !b.is_empty()) {
            out.comment(&format!("Uniform block: {}", block.name()));
            for variable in block {
                out.emit_line(
                    &self.syntax.variable_declaration(
                        variable,
                        self.syntax.uniform_qualifier(),
                        !variable.ty.is_resource(),
                    ),
                    true,
                );
            }
            out.line_break();
        }
        Ok(())
    }
}
