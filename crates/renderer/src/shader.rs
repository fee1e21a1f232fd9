//! GLSL front half of the pipeline builder.
//!
//! Both stages are parsed and validated with naga before any GPU object
//! exists, so a broken shader is reported with a readable diagnostic instead
//! of a device validation panic. The fragment module is then reflected to
//! find where each uniform lives.

use std::borrow::Cow;

use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::{self, AddressSpace, ScalarKind, TypeInner, VectorSize};

use crate::error::{RendererError, StageKind};
use crate::uniforms::{UniformBindings, UniformKind, UniformSlot};

/// Pass-through vertex stage for the full-screen quad.
pub const OCEAN_VERTEX: &str = include_str!("../shaders/ocean.vert");
/// Per-pixel seascape.
pub const OCEAN_FRAGMENT: &str = include_str!("../shaders/ocean.frag");

/// A stage that parsed and validated cleanly.
pub struct CompiledStage {
    kind: StageKind,
    source: String,
    module: naga::Module,
}

impl CompiledStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn wgpu_source(&self) -> wgpu::ShaderSource<'_> {
        wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(self.source.as_str()),
            stage: self.kind.naga_stage(),
            defines: &[],
        }
    }
}

/// Parses and validates one GLSL 450 stage.
pub fn compile_stage(stage: StageKind, source: &str) -> Result<CompiledStage, RendererError> {
    let mut frontend = glsl::Frontend::default();
    let module = frontend
        .parse(&glsl::Options::from(stage.naga_stage()), source)
        .map_err(|errors| RendererError::Compile {
            stage,
            log: errors.emit_to_string(source),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|err| RendererError::Compile {
            stage,
            log: err.emit_to_string(source),
        })?;

    tracing::debug!(
        %stage,
        functions = module.functions.len(),
        globals = module.global_variables.len(),
        "compiled shader stage"
    );

    Ok(CompiledStage {
        kind: stage,
        source: source.to_owned(),
        module,
    })
}

/// Resolves uniform slots from the block bound at group 0, binding 0.
///
/// Members with a type the host never writes are left out, which makes them
/// missing locations rather than errors.
pub fn reflect_uniforms(module: &naga::Module) -> UniformBindings {
    let block = module.global_variables.iter().find_map(|(_, var)| {
        let binding = var.binding.as_ref()?;
        let is_block =
            var.space == AddressSpace::Uniform && binding.group == 0 && binding.binding == 0;
        is_block.then_some(var.ty)
    });
    let Some(ty) = block else {
        tracing::warn!("fragment stage declares no uniform block");
        return UniformBindings::default();
    };
    let TypeInner::Struct { members, span } = &module.types[ty].inner else {
        tracing::warn!("uniform binding is not a block");
        return UniformBindings::default();
    };

    let mut bindings = UniformBindings::new(*span);
    for member in members {
        let Some(name) = member.name.as_deref() else {
            continue;
        };
        match uniform_kind(&module.types[member.ty].inner) {
            Some(kind) => bindings.insert(
                name,
                UniformSlot {
                    offset: member.offset,
                    kind,
                },
            ),
            None => tracing::debug!(name, "skipping uniform with unsupported type"),
        }
    }
    bindings
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    match *inner {
        TypeInner::Scalar(scalar) if scalar.width == 4 => match scalar.kind {
            ScalarKind::Float => Some(UniformKind::Float),
            ScalarKind::Sint => Some(UniformKind::Int),
            _ => None,
        },
        TypeInner::Vector { size, scalar }
            if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
        {
            match size {
                VectorSize::Tri => Some(UniformKind::Vec3),
                VectorSize::Quad => Some(UniformKind::Vec4),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::names;

    #[test]
    fn embedded_stages_compile() {
        let vertex = compile_stage(StageKind::Vertex, OCEAN_VERTEX).expect("vertex stage");
        let fragment = compile_stage(StageKind::Fragment, OCEAN_FRAGMENT).expect("fragment stage");
        assert_eq!(vertex.kind(), StageKind::Vertex);
        assert_eq!(fragment.kind(), StageKind::Fragment);
        assert_eq!(fragment.module().entry_points.len(), 1);
    }

    #[test]
    fn reflection_resolves_every_ocean_uniform() {
        let fragment = compile_stage(StageKind::Fragment, OCEAN_FRAGMENT).unwrap();
        let bindings = reflect_uniforms(fragment.module());

        assert!(bindings.missing(&names::ALL).is_empty());
        assert_eq!(
            bindings.slot(names::RESOLUTION),
            Some(UniformSlot {
                offset: 0,
                kind: UniformKind::Vec3
            })
        );
        assert_eq!(bindings.slot(names::TIME).map(|slot| slot.offset), Some(12));
        assert_eq!(bindings.slot(names::POINTER).map(|slot| slot.offset), Some(16));
        assert_eq!(
            bindings.slot(names::STEP_BUDGET).map(|slot| slot.kind),
            Some(UniformKind::Int)
        );
        assert_eq!(bindings.block_size() % 16, 0);
    }

    #[test]
    fn broken_fragment_reports_compile_diagnostic() {
        let source = "#version 450\n\
            layout(location = 0) out vec4 fragColor;\n\
            void main() {\n\
                fragColor = vec4(undeclared_value, 1.0);\n\
            }\n";

        match compile_stage(StageKind::Fragment, source) {
            Err(RendererError::Compile { stage, log }) => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(!log.trim().is_empty());
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("broken shader compiled"),
        }
    }

    #[test]
    fn undeclared_uniform_has_no_slot() {
        let source = "#version 450\n\
            layout(location = 0) out vec4 fragColor;\n\
            layout(std140, set = 0, binding = 0) uniform OceanParams { float iTime; } ocean;\n\
            void main() {\n\
                fragColor = vec4(ocean.iTime);\n\
            }\n";

        let fragment = compile_stage(StageKind::Fragment, source).unwrap();
        let bindings = reflect_uniforms(fragment.module());
        assert_eq!(bindings.len(), 1);
        assert!(bindings.slot(names::TIME).is_some());
        assert!(bindings.slot(names::RESOLUTION).is_none());
    }
}
