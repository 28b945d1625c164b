use std::borrow::Cow;

use crate::error::{GpuError, Result};

/// One shader stage: WGSL source exposing a single entry function.
#[derive(Debug, Clone)]
pub struct ShaderStage {
    pub label: String,
    pub source: Cow<'static, str>,
    pub entry_point: String,
}

impl ShaderStage {
    pub fn wgsl(
        label: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            entry_point: entry_point.into(),
        }
    }

    /// Parses and validates the source, returning the IR on success.
    ///
    /// wgpu reports invalid modules through the device's uncaptured-error
    /// path; checking up front turns a bad shader into a typed error instead.
    pub(crate) fn compile(&self) -> Result<naga::Module> {
        let compile_error = |message: String| GpuError::ShaderCompile {
            label: self.label.clone(),
            message,
        };

        let module = naga::front::wgsl::parse_str(&self.source)
            .map_err(|e| compile_error(e.emit_to_string(&self.source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(&self.source)))?;

        Ok(module)
    }

    /// Looks up this stage's entry function in `module`.
    pub(crate) fn entry<'m>(
        &self,
        module: &'m naga::Module,
        stage: naga::ShaderStage,
    ) -> Option<&'m naga::EntryPoint> {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point && ep.stage == stage)
    }
}

/// `@location(n)` inputs of an entry function, including those nested one
/// level deep in a struct argument.
pub(crate) fn input_locations(module: &naga::Module, entry: &naga::EntryPoint) -> Vec<u32> {
    let mut out = Vec::new();
    for arg in &entry.function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => out.push(*location),
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    out.extend(members.iter().filter_map(|m| match &m.binding {
                        Some(naga::Binding::Location { location, .. }) => Some(*location),
                        _ => None,
                    }));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VsIn, @builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(in.position, 1.0);
}
"#;

    #[test]
    fn compiles_valid_wgsl() {
        let stage = ShaderStage::wgsl("vs", VS, "vs_main");
        let module = stage.compile().expect("valid shader");
        assert!(stage.entry(&module, naga::ShaderStage::Vertex).is_some());
    }

    #[test]
    fn reports_syntax_error_as_compile_error() {
        let stage = ShaderStage::wgsl("broken", "@vertex fn vs_main( -> {", "vs_main");
        match stage.compile() {
            Err(GpuError::ShaderCompile { label, message }) => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("expected ShaderCompile, got {other:?}"),
        }
    }

    #[test]
    fn reports_type_error_as_compile_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let stage = ShaderStage::wgsl("fs", src, "fs_main");
        assert!(matches!(stage.compile(), Err(GpuError::ShaderCompile { .. })));
    }

    #[test]
    fn entry_lookup_respects_stage() {
        let stage = ShaderStage::wgsl("vs", VS, "vs_main");
        let module = stage.compile().expect("valid shader");
        assert!(stage.entry(&module, naga::ShaderStage::Fragment).is_none());
    }

    #[test]
    fn collects_struct_member_locations() {
        let stage = ShaderStage::wgsl("vs", VS, "vs_main");
        let module = stage.compile().expect("valid shader");
        let entry = stage
            .entry(&module, naga::ShaderStage::Vertex)
            .expect("entry point");
        let mut locs = input_locations(&module, entry);
        locs.sort_unstable();
        assert_eq!(locs, vec![0, 1]);
    }
}
