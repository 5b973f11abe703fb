use std::sync::Arc;

use pretty_assertions::assert_eq;
use shadergen_glsl::{
    BlockRole, DataType, GenOptions, GlslShaderGenerator, Program, ShaderGenerator, Stage,
    StageKind, Variable, VariableBlock, VkShaderGenerator,
};

fn program() -> Program {
    let vertex_data = Arc::new(
        VariableBlock::new("VertexData")
            .with_instance("vd")
            .with_variable(Variable::new("normalWorld", DataType::Vec3))
            .with_variable(Variable::new("texcoord_0", DataType::Vec2)),
    );
    let vs = Stage::new(StageKind::Vertex)
        .with_uniforms(
            VariableBlock::new("PrivateUniforms")
                .with_variable(Variable::new("u_worldMatrix", DataType::Mat4)),
        )
        .with_input(
            BlockRole::VertexInputs,
            VariableBlock::new("VertexInputs")
                .with_variable(Variable::new("i_position", DataType::Vec3))
                .with_variable(Variable::new("i_normal", DataType::Vec3)),
        )
        .with_output(BlockRole::VertexData, Arc::clone(&vertex_data));
    let ps = Stage::new(StageKind::Pixel)
        .with_uniforms(
            VariableBlock::new("PublicUniforms")
                .with_variable(Variable::new("u_roughness", DataType::Float).with_value("0.5")),
        )
        .with_input(BlockRole::VertexData, vertex_data)
        .with_output(
            BlockRole::PixelOutputs,
            VariableBlock::new("PixelOutputs")
                .with_variable(Variable::new("out1", DataType::Vec4)),
        );
    Program::new("standard_surface").with_stage(vs).with_stage(ps)
}

#[test]
fn plain_glsl_program() {
    let mut glsl = GlslShaderGenerator::new(GenOptions::default()).unwrap();
    let shader = glsl.generate(&program()).unwrap();

    assert_eq!(
        shader.source(StageKind::Vertex).unwrap(),
        "#version 400\n\
         \n\
         // Uniform block: PrivateUniforms\n\
         uniform mat4 u_worldMatrix;\n\
         \n\
         // Inputs block: VertexInputs\n\
         in vec3 i_position;\n\
         in vec3 i_normal;\n\
         \n\
         out VertexData\n\
         {\n\
         \x20   vec3 normalWorld;\n\
         \x20   vec2 texcoord_0;\n\
         } vd;\n\
         \n"
    );
    assert_eq!(
        shader.source(StageKind::Pixel).unwrap(),
        "#version 400\n\
         \n\
         // Uniform block: PublicUniforms\n\
         uniform float u_roughness = 0.5;\n\
         \n\
         in VertexData\n\
         {\n\
         \x20   vec3 normalWorld;\n\
         \x20   vec2 texcoord_0;\n\
         } vd;\n\
         \n\
         // Pixel shader outputs\n\
         out vec4 out1;\n\
         \n"
    );
}

#[test]
fn dialects_agree_on_everything_but_layout_and_bindings() {
    let program = program();
    let glsl = GlslShaderGenerator::new(GenOptions::default())
        .unwrap()
        .generate(&program)
        .unwrap();
    let vk = VkShaderGenerator::new(GenOptions::default())
        .unwrap()
        .generate(&program)
        .unwrap();

    // Strip the per-dialect decoration and compare the remaining declarations.
    fn io_lines(source: &str) -> Vec<String> {
        source
            .lines()
            .filter(|l| !l.starts_with("#version") && !l.starts_with("//"))
            .filter(|l| !l.contains("uniform") && !l.contains("u_"))
            .map(|l| match l.strip_prefix("layout (location = ") {
                Some(rest) => rest.split_once(") ").map(|(_, d)| d).unwrap_or(rest).to_owned(),
                None => l.to_owned(),
            })
            .filter(|l| !l.is_empty() && l != "{" && l != "};")
            .collect()
    }

    for kind in [StageKind::Vertex, StageKind::Pixel] {
        assert_eq!(
            io_lines(glsl.source(kind).unwrap()),
            io_lines(vk.source(kind).unwrap()),
            "{kind}"
        );
    }
}

#[test]
fn vertex_data_prefix_is_dialect_independent() {
    let block = VariableBlock::new("VertexData").with_instance("vd");
    let glsl = GlslShaderGenerator::new(GenOptions::default()).unwrap();
    let vk = VkShaderGenerator::new(GenOptions::default()).unwrap();
    assert_eq!(glsl.vertex_data_prefix(&block), "vd.");
    assert_eq!(vk.vertex_data_prefix(&block), "vd.");
}
