//! Per-dialect source generators.
//!
//! A generator is one generation session: it owns the syntax rules and the resource binding
//! context, and emits every stage of a program in order. The binding context is never reset
//! between stages, so `(set, binding)` pairs are unique across the whole program.
//!
//! Each stage is emitted as:
//!
//! ```text
//! #version <version>             directives
//! <uniform declarations>         resources (binding context)
//! <vertex inputs>                inputs           (vertex stage only)
//! <VertexData interface block>   inter-stage data (out in vertex, in in pixel)
//! <pixel outputs>                outputs          (pixel stage only)
//! ```
//!
//! Every non-empty section ends with exactly one blank line. Other components splice sections
//! together relying on that framing.

mod glsl;
mod vk;

pub use glsl::GlslShaderGenerator;
pub use vk::VkShaderGenerator;

use tracing::{debug, trace};

use crate::binding::ResourceBindingContext;
use crate::error::GenError;
use crate::ir::{BlockRole, Program, Shader, Stage, StageKind, StageSource, VariableBlock};
use crate::options::GenOptions;
use crate::syntax::Syntax;
use crate::writer::SourceWriter;

/// Location shared by the `VertexData` interface block on both sides of the vertex/pixel boundary.
pub const VERTEX_DATA_LOCATION: u32 = 0;

/// Emission progress for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EmitPhase {
    NotStarted,
    Directives,
    Resources,
    Inputs,
    InterStageData,
    Outputs,
    Done,
}

fn enter(phase: &mut EmitPhase, next: EmitPhase, stage: StageKind) {
    let from = *phase;
    debug_assert!(from < next, "{from:?} -> {next:?} is out of order");
    trace!(%stage, ?from, to = ?next, "emit phase");
    *phase = next;
}

pub trait ShaderGenerator {
    /// Symbolic target identifier (e.g. `genglsl`).
    fn target(&self) -> &'static str;

    /// Dialect version token embedded in the `#version` directive.
    fn version(&self) -> &'static str;

    fn syntax(&self) -> &Syntax;

    fn options(&self) -> &GenOptions;

    /// `layout (...)` prefix for a positional declaration, or `None` if the dialect does not use
    /// explicit locations.
    fn location_layout(&self, location: u32) -> Option<String>;

    /// The session's binding allocator, for callers that bind resources outside this generator.
    fn resource_binding_context(&mut self) -> Option<&mut dyn ResourceBindingContext>;

    /// Emit declarations for the stage's uniform blocks.
    fn emit_resource_bindings(
        &mut self,
        stage: &Stage,
        out: &mut SourceWriter,
    ) -> Result<(), GenError>;

    fn emit_directives(&self, _stage: &Stage, out: &mut SourceWriter) {
        out.emit_line(&format!("#version {}", self.version()), false);
        out.line_break();
    }

    fn emit_inputs(&self, stage: &Stage, out: &mut SourceWriter) {
        match stage.kind() {
            StageKind::Vertex => self.emit_vertex_inputs(stage, out),
            StageKind::Pixel => self.emit_vertex_data(stage, out),
        }
    }

    fn emit_outputs(&self, stage: &Stage, out: &mut SourceWriter) {
        match stage.kind() {
            StageKind::Vertex => self.emit_vertex_data(stage, out),
            StageKind::Pixel => self.emit_pixel_outputs(stage, out),
        }
    }

    /// Access path prefix for `VertexData` members in expressions (`vd.`).
    fn vertex_data_prefix(&self, block: &VariableBlock) -> String {
        format!("{}.", block.instance())
    }

    /// Positional per-attribute inputs of the vertex stage. Empty blocks emit nothing.
    fn emit_vertex_inputs(&self, stage: &Stage, out: &mut SourceWriter) {
        let Some(inputs) = stage
            .input_block(BlockRole::VertexInputs)
            .filter(|b| !b.is_empty())
        else {
            return;
        };

        out.comment(&format!("Inputs block: {}", inputs.name()));
        let qualifier = self.syntax().input_qualifier();
        self.emit_positional_declarations(inputs, qualifier, out);
        out.line_break();
    }

    /// The inter-stage interface block: `out` in the vertex stage, `in` in the pixel stage.
    fn emit_vertex_data(&self, stage: &Stage, out: &mut SourceWriter) {
        let (block, qualifier) = match stage.kind() {
            StageKind::Vertex => (
                stage.output_block(BlockRole::VertexData),
                self.syntax().output_qualifier(),
            ),
            StageKind::Pixel => (
                stage.input_block(BlockRole::VertexData),
                self.syntax().input_qualifier(),
            ),
        };
        let Some(block) = block.filter(|b| !b.is_empty()) else {
            return;
        };

        let layout = self
            .location_layout(VERTEX_DATA_LOCATION)
            .unwrap_or_default();
        out.emit_string(&format!("{layout}{qualifier} {}", block.name()));
        out.line_break();
        out.scope_begin();
        self.emit_variable_declarations(block, "", out);
        out.scope_end(false, false);
        out.emit_string(&format!(" {};", block.instance()));
        out.line_break();
        out.line_break();
    }

    /// Render-target outputs of the pixel stage. Always emitted: this is the program's result.
    fn emit_pixel_outputs(&self, stage: &Stage, out: &mut SourceWriter) {
        out.comment("Pixel shader outputs");
        if let Some(outputs) = stage.output_block(BlockRole::PixelOutputs) {
            let qualifier = self.syntax().output_qualifier();
            self.emit_positional_declarations(outputs, qualifier, out);
        }
        out.line_break();
    }

    /// One declaration per variable, numbered from location 0 in block order.
    fn emit_positional_declarations(
        &self,
        block: &VariableBlock,
        qualifier: &str,
        out: &mut SourceWriter,
    ) {
        for (location, variable) in (0u32..).zip(block.iter()) {
            out.line_begin();
            if let Some(layout) = self.location_layout(location) {
                out.emit_string(&layout);
            }
            out.emit_string(
                &self
                    .syntax()
                    .variable_declaration(variable, qualifier, false),
            );
            out.line_end(true);
        }
    }

    fn emit_variable_declarations(
        &self,
        block: &VariableBlock,
        qualifier: &str,
        out: &mut SourceWriter,
    ) {
        for variable in block {
            out.emit_line(
                &self
                    .syntax()
                    .variable_declaration(variable, qualifier, false),
                true,
            );
        }
    }

    /// Emit one stage from scratch, continuing the session's binding allocation.
    fn generate_stage(&mut self, stage: &Stage) -> Result<String, GenError> {
        let kind = stage.kind();
        let mut phase = EmitPhase::NotStarted;
        let mut out = SourceWriter::new();

        enter(&mut phase, EmitPhase::Directives, kind);
        self.emit_directives(stage, &mut out);

        enter(&mut phase, EmitPhase::Resources, kind);
        self.emit_resource_bindings(stage, &mut out)?;

        // The inter-stage block is the pixel stage's input and the vertex stage's output, so
        // `emit_inputs`/`emit_outputs` map to different phases per stage.
        let (input_phase, output_phase) = match kind {
            StageKind::Vertex => (EmitPhase::Inputs, EmitPhase::InterStageData),
            StageKind::Pixel => (EmitPhase::InterStageData, EmitPhase::Outputs),
        };
        enter(&mut phase, input_phase, kind);
        self.emit_inputs(stage, &mut out);

        enter(&mut phase, output_phase, kind);
        self.emit_outputs(stage, &mut out);

        enter(&mut phase, EmitPhase::Done, kind);
        let source = out.into_string();
        debug!(dialect = self.target(), stage = %kind, bytes = source.len(), "generated stage");
        Ok(source)
    }

    /// Generate every stage of `program` in order.
    ///
    /// On error nothing is returned; the caller should drop the generator, since bindings handed
    /// out before the failure are not reclaimed.
    fn generate(&mut self, program: &Program) -> Result<Shader, GenError> {
        program.check_stages()?;
        if self.options().validate_inter_stage {
            program.validate_inter_stage()?;
        }

        let mut stages = Vec::with_capacity(program.stages().len());
        for stage in program.stages() {
            let source = self.generate_stage(stage)?;
            stages.push(StageSource {
                kind: stage.kind(),
                source,
            });
        }

        debug!(
            dialect = self.target(),
            program = %program.name,
            stages = stages.len(),
            "generated program"
        );
        Ok(Shader {
            name: program.name.clone(),
            target: self.target(),
            stages,
        })
    }
}
