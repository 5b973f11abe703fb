//! GLSL-family shader source emission with stage I/O location and descriptor binding assignment.
//!
//! The input is an already-built [`ir::Program`]: ordered stages whose variables are grouped into
//! role-keyed [`ir::VariableBlock`]s. A [`generator::ShaderGenerator`] turns it into per-stage
//! source text for one dialect:
//!
//! - [`generator::VkShaderGenerator`]: GLSL 450 for Vulkan, explicit `location`/`set`/`binding`.
//! - [`generator::GlslShaderGenerator`]: GLSL 400, name-matched stage I/O and loose uniforms.

pub mod binding;
pub mod error;
pub mod generator;
pub mod ir;
pub mod options;
pub mod syntax;
pub mod writer;

pub use binding::{BindingError, BindingLocation, ResourceBindingContext, VkResourceBindingContext};
pub use error::GenError;
pub use generator::{GlslShaderGenerator, ShaderGenerator, VkShaderGenerator};
pub use ir::{BlockRole, DataType, Program, Shader, Stage, StageKind, Variable, VariableBlock};
pub use options::GenOptions;
pub use syntax::{Syntax, SyntaxError};
pub use writer::SourceWriter;
