//! Shader representation consumed by the generators.
//!
//! These types are produced upstream (by a shader-graph compiler) and are read-only from the point
//! of view of source emission. Blocks that are shared between stages (the inter-stage
//! `VertexData` block) are held behind an [`Arc`] so the producing and consuming stages emit from
//! the exact same definition.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int,
    UInt,
    Float,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
}

impl DataType {
    /// Opaque types cannot live inside a std140 uniform block and need their own binding.
    pub fn is_resource(self) -> bool {
        matches!(self, DataType::Sampler2D | DataType::SamplerCube)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: DataType,
    /// Initializer expression, already formatted in the target dialect.
    pub value: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Ordered collection of variables sharing a role.
///
/// Declaration order is significant: positional `location` qualifiers are derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBlock {
    name: String,
    instance: String,
    variables: Vec<Variable>,
}

impl VariableBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance: String::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn add(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

impl<'a> IntoIterator for &'a VariableBlock {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Vertex,
    Pixel,
}

impl StageKind {
    /// Stage name used when deriving per-stage identifiers (e.g. uniform block names).
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Pixel => "pixel",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a stage input/output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockRole {
    /// Per-vertex attributes consumed by the vertex stage.
    VertexInputs,
    /// Interpolated data written by the vertex stage and read by the pixel stage.
    VertexData,
    /// Render-target outputs of the pixel stage.
    PixelOutputs,
}

#[derive(Debug, Clone)]
pub struct Stage {
    kind: StageKind,
    inputs: BTreeMap<BlockRole, Arc<VariableBlock>>,
    outputs: BTreeMap<BlockRole, Arc<VariableBlock>>,
    uniforms: Vec<Arc<VariableBlock>>,
}

impl Stage {
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            uniforms: Vec::new(),
        }
    }

    pub fn with_input(mut self, role: BlockRole, block: impl Into<Arc<VariableBlock>>) -> Self {
        self.inputs.insert(role, block.into());
        self
    }

    pub fn with_output(mut self, role: BlockRole, block: impl Into<Arc<VariableBlock>>) -> Self {
        self.outputs.insert(role, block.into());
        self
    }

    pub fn with_uniforms(mut self, block: impl Into<Arc<VariableBlock>>) -> Self {
        self.uniforms.push(block.into());
        self
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn input_block(&self, role: BlockRole) -> Option<&VariableBlock> {
        self.inputs.get(&role).map(Arc::as_ref)
    }

    pub fn output_block(&self, role: BlockRole) -> Option<&VariableBlock> {
        self.outputs.get(&role).map(Arc::as_ref)
    }

    pub fn uniform_blocks(&self) -> impl Iterator<Item = &VariableBlock> {
        self.uniforms.iter().map(Arc::as_ref)
    }
}

/// An ordered set of stages making up one shader program.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    stages: Vec<Stage>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, kind: StageKind) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    /// A program has at most one stage of each kind.
    pub fn check_stages(&self) -> Result<(), GenError> {
        for (i, stage) in self.stages.iter().enumerate() {
            if self.stages[..i].iter().any(|s| s.kind == stage.kind) {
                return Err(GenError::DuplicateStage {
                    program: self.name.clone(),
                    stage: stage.kind,
                });
            }
        }
        Ok(())
    }

    /// Check that the vertex stage's `VertexData` output matches the pixel stage's input by block
    /// name, instance name and members.
    ///
    /// Programs missing either stage have no interface to check.
    pub fn validate_inter_stage(&self) -> Result<(), GenError> {
        let (Some(vs), Some(ps)) = (self.stage(StageKind::Vertex), self.stage(StageKind::Pixel))
        else {
            return Ok(());
        };
        let mismatch = |reason: String| GenError::InterStageMismatch {
            producer: StageKind::Vertex,
            consumer: StageKind::Pixel,
            reason,
        };

        let produced = vs
            .output_block(BlockRole::VertexData)
            .filter(|b| !b.is_empty());
        let consumed = ps
            .input_block(BlockRole::VertexData)
            .filter(|b| !b.is_empty());
        match (produced, consumed) {
            (None, None) => Ok(()),
            (Some(_), None) => Err(mismatch("pixel stage has no VertexData input".to_owned())),
            (None, Some(_)) => Err(mismatch("vertex stage has no VertexData output".to_owned())),
            (Some(out), Some(inp)) => {
                if out.name() != inp.name() {
                    return Err(mismatch(format!(
                        "block name {:?} != {:?}",
                        out.name(),
                        inp.name()
                    )));
                }
                if out.instance() != inp.instance() {
                    return Err(mismatch(format!(
                        "instance name {:?} != {:?}",
                        out.instance(),
                        inp.instance()
                    )));
                }
                if out.len() != inp.len() {
                    return Err(mismatch(format!(
                        "{} members != {} members",
                        out.len(),
                        inp.len()
                    )));
                }
                for (a, b) in out.iter().zip(inp.iter()) {
                    if a.name != b.name || a.ty != b.ty {
                        return Err(mismatch(format!(
                            "member {} {:?} != {} {:?}",
                            a.name, a.ty, b.name, b.ty
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Generated source for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSource {
    pub kind: StageKind,
    pub source: String,
}

/// Result of generating a whole program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub name: String,
    pub target: &'static str,
    pub stages: Vec<StageSource>,
}

impl Shader {
    pub fn source(&self, kind: StageKind) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.source.as_str())
    }
}
