//! Dialect syntax rules: reserved words, qualifier keywords and type spellings.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::ir::{DataType, Variable};

/// Statement separator.
pub const SEMICOLON: &str = ";";

/// Keywords and built-ins shared by every GLSL profile we target.
const GLSL_RESERVED_WORDS: &[&str] = &[
    "attribute", "bool", "break", "buffer", "bvec2", "bvec3", "bvec4", "case", "centroid", "const",
    "continue", "default", "discard", "do", "double", "else", "false", "flat", "float", "for",
    "highp", "if", "in", "inout", "int", "invariant", "isampler2D", "ivec2", "ivec3", "ivec4",
    "layout", "lowp", "main", "mat2", "mat3", "mat4", "mediump", "noperspective", "out", "patch",
    "precision", "return", "sample", "sampler1D", "sampler2D", "sampler3D", "samplerCube",
    "shared", "smooth", "struct", "subroutine", "switch", "texture", "true", "uint", "uniform",
    "usampler2D", "uvec2", "uvec3", "uvec4", "varying", "vec2", "vec3", "vec4", "void", "volatile",
    "while",
];

/// Extra reserved words for the Vulkan GLSL profile (separate texture/sampler objects).
pub const VULKAN_RESERVED_WORDS: &[&str] = &["texture2D", "sampler"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("{role} qualifier must not be empty")]
    EmptyQualifier { role: &'static str },

    #[error("{role} qualifier {keyword:?} is not a valid identifier")]
    InvalidQualifier { role: &'static str, keyword: String },

    #[error("reserved word {0:?} is not a valid identifier")]
    InvalidReservedWord(String),
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_qualifier(role: &'static str, keyword: &str) -> Result<(), SyntaxError> {
    if keyword.is_empty() {
        return Err(SyntaxError::EmptyQualifier { role });
    }
    if !is_identifier(keyword) {
        return Err(SyntaxError::InvalidQualifier {
            role,
            keyword: keyword.to_owned(),
        });
    }
    Ok(())
}

/// Syntax rules of one GLSL dialect.
///
/// Holds the reserved-word set and the storage qualifiers used for stage inputs, stage outputs
/// and uniforms. The reserved set only grows; see [`Syntax::register_reserved_words`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    reserved: BTreeSet<String>,
    input_qualifier: String,
    output_qualifier: String,
    uniform_qualifier: String,
}

impl Syntax {
    /// Build a GLSL-family syntax with custom qualifier keywords.
    ///
    /// Each qualifier must be a non-empty identifier. The reserved set starts from the common
    /// GLSL keywords.
    pub fn new(
        input_qualifier: &str,
        output_qualifier: &str,
        uniform_qualifier: &str,
    ) -> Result<Self, SyntaxError> {
        check_qualifier("input", input_qualifier)?;
        check_qualifier("output", output_qualifier)?;
        check_qualifier("uniform", uniform_qualifier)?;
        Ok(Self {
            reserved: GLSL_RESERVED_WORDS.iter().map(|&w| w.to_owned()).collect(),
            input_qualifier: input_qualifier.to_owned(),
            output_qualifier: output_qualifier.to_owned(),
            uniform_qualifier: uniform_qualifier.to_owned(),
        })
    }

    /// Plain GLSL: `in`, `out` and `uniform` with the common GLSL reserved words.
    pub fn glsl() -> Self {
        Self {
            reserved: GLSL_RESERVED_WORDS.iter().map(|&w| w.to_owned()).collect(),
            input_qualifier: "in".to_owned(),
            output_qualifier: "out".to_owned(),
            uniform_qualifier: "uniform".to_owned(),
        }
    }

    /// [`Syntax::glsl`] plus the Vulkan-only reserved words ([`VULKAN_RESERVED_WORDS`]).
    pub fn vulkan() -> Self {
        let mut syntax = Self::glsl();
        syntax
            .reserved
            .extend(VULKAN_RESERVED_WORDS.iter().map(|&w| w.to_owned()));
        syntax
    }

    /// Merge `words` into the reserved set. Registering a word twice is a no-op.
    pub fn register_reserved_words<I, S>(&mut self, words: I) -> Result<(), SyntaxError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Validate everything first so a bad entry leaves the set untouched.
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_owned()).collect();
        if let Some(bad) = words.iter().find(|w| !is_identifier(w)) {
            return Err(SyntaxError::InvalidReservedWord(bad.clone()));
        }
        self.reserved.extend(words);
        Ok(())
    }

    pub fn reserved_words(&self) -> &BTreeSet<String> {
        &self.reserved
    }

    /// Whether `name` may not be used as a generated identifier.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Keyword for stage inputs (`in`).
    pub fn input_qualifier(&self) -> &str {
        &self.input_qualifier
    }

    /// Keyword for stage outputs (`out`).
    pub fn output_qualifier(&self) -> &str {
        &self.output_qualifier
    }

    /// Keyword for uniform declarations (`uniform`).
    pub fn uniform_qualifier(&self) -> &str {
        &self.uniform_qualifier
    }

    /// GLSL spelling of `ty`.
    pub fn type_name(&self, ty: DataType) -> &'static str {
        match ty {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::UInt => "uint",
            DataType::Float => "float",
            DataType::Vec2 => "vec2",
            DataType::Vec3 => "vec3",
            DataType::Vec4 => "vec4",
            DataType::IVec2 => "ivec2",
            DataType::IVec3 => "ivec3",
            DataType::IVec4 => "ivec4",
            DataType::Mat3 => "mat3",
            DataType::Mat4 => "mat4",
            DataType::Sampler2D => "sampler2D",
            DataType::SamplerCube => "samplerCube",
        }
    }

    /// `[qualifier ]type name[ = value]`, without the statement separator.
    pub fn variable_declaration(
        &self,
        variable: &Variable,
        qualifier: &str,
        assign_value: bool,
    ) -> String {
        let mut decl = String::new();
        if !qualifier.is_empty() {
            decl.push_str(qualifier);
            decl.push(' ');
        }
        decl.push_str(self.type_name(variable.ty));
        decl.push(' ');
        decl.push_str(&variable.name);
        if assign_value {
            if let Some(value) = &variable.value {
                decl.push_str(" = ");
                decl.push_str(value);
            }
        }
        decl
    }

    /// Replace characters that cannot appear in an identifier with `_`.
    ///
    /// A leading digit (or an empty name) gets a `_` prefix. Reserved words are not checked here;
    /// use [`Syntax::make_identifier`] for names that end up in the source.
    pub fn make_valid_name(&self, name: &str) -> String {
        let mut out: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
            out.insert(0, '_');
        }
        out
    }

    /// Produce a valid identifier that is neither reserved nor already in `taken`, and record it.
    ///
    /// Collisions get a numeric suffix counted per base name (`color`, `color1`, `color2`, ...).
    /// Generated uniform block names go through this; upstream code naming variables can share
    /// one `taken` map per scope.
    pub fn make_identifier(&self, name: &str, taken: &mut HashMap<String, u32>) -> String {
        let base = self.make_valid_name(name);
        let mut candidate = base.clone();
        while self.is_reserved(&candidate) || taken.contains_key(&candidate) {
            let counter = taken.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{base}{counter}");
        }
        taken.insert(candidate.clone(), 0);
        candidate
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::glsl()
    }
}
