/// Construction-time configuration of a generator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenOptions {
    /// Descriptor set the binding allocator starts from.
    pub initial_descriptor_set: u32,
    /// Dialect-specific reserved words merged into the syntax rules.
    pub reserved_words: Vec<String>,
    /// Bindings handed out from one descriptor set before moving on to the next.
    pub max_bindings_per_set: u32,
    /// Check that the vertex stage's `VertexData` output and the pixel stage's input agree before
    /// emitting anything. Upstream normally guarantees this, so it is off by default.
    pub validate_inter_stage: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            initial_descriptor_set: 0,
            reserved_words: Vec::new(),
            max_bindings_per_set: u32::MAX,
            validate_inter_stage: false,
        }
    }
}
