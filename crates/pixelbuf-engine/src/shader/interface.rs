use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, Handle, ImageClass, ImageDimension, Module, Scalar, ScalarKind,
    ShaderStage, Type, TypeInner,
};

use super::error::{ShaderError, Stage};
use super::source::StageText;

// ── binding contract ──────────────────────────────────────────────────────

/// Bind group holding the frame texture and its sampler.
pub const TEXTURE_GROUP: u32 = 0;
pub const TEXTURE_BINDING: u32 = 0;
pub const SAMPLER_BINDING: u32 = 1;

/// Bind group holding integer uniforms, one binding each.
pub const UNIFORM_GROUP: u32 = 1;

/// Vertex attribute locations fed by the quad mesh.
const POSITION_LOCATION: u32 = 0;
const TEX_COORDS_LOCATION: u32 = 1;

/// Output location written to the color target.
const COLOR_LOCATION: u32 = 0;

// ── compile ───────────────────────────────────────────────────────────────

/// One parsed and validated stage.
#[derive(Debug)]
pub struct CompiledStage {
    stage: Stage,
    module: Module,
}

impl CompiledStage {
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// Parses and validates one stage.
///
/// The error carries the compiler's annotated message, the equivalent of a
/// driver info log.
pub fn compile(source: &StageText<'_>) -> Result<CompiledStage, ShaderError> {
    let stage = source.stage;
    let text = source.text.as_ref();

    let module = naga::front::wgsl::parse_str(text).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(text),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(text),
        })?;

    Ok(CompiledStage { stage, module })
}

// ── link ──────────────────────────────────────────────────────────────────

/// Signedness of an integer uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntKind {
    Signed,
    Unsigned,
}

/// Integer uniform declared as `@group(1) @binding(n) var<uniform> name: i32|u32`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub binding: u32,
    pub kind: IntKind,
}

/// What the two stages agree on once linked.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProgramInterface {
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Sorted by binding.
    pub uniforms: Vec<UniformDecl>,
}

impl ProgramInterface {
    /// Checks a vertex/fragment pair against each other and the quad contract.
    pub fn link(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<Self, ShaderError> {
        if vertex.stage != Stage::Vertex || fragment.stage != Stage::Fragment {
            return Err(ShaderError::link("stages passed in the wrong order"));
        }

        let vs = &vertex.module;
        let fs = &fragment.module;

        let vs_entry = vs
            .entry_points
            .iter()
            .find(|ep| ep.stage == ShaderStage::Vertex)
            .ok_or_else(|| ShaderError::link("vertex source has no @vertex entry point"))?;
        let fs_entry = fs
            .entry_points
            .iter()
            .find(|ep| ep.stage == ShaderStage::Fragment)
            .ok_or_else(|| ShaderError::link("fragment source has no @fragment entry point"))?;

        // Vertex inputs must come from the quad's two float attributes.
        let mut vs_inputs = Vec::new();
        for arg in &vs_entry.function.arguments {
            collect_locations(vs, arg.ty, arg.binding.as_ref(), &mut vs_inputs);
        }
        for (location, ty) in vs_inputs {
            if location != POSITION_LOCATION && location != TEX_COORDS_LOCATION {
                return Err(ShaderError::link(format!(
                    "vertex input @location({location}) is not provided by the quad \
                     (0 = position, 1 = tex_coords)"
                )));
            }
            if vs.types[ty].inner.scalar_kind() != Some(ScalarKind::Float) {
                return Err(ShaderError::link(format!(
                    "vertex input @location({location}) must be a float type"
                )));
            }
        }

        let mut vs_outputs = Vec::new();
        if let Some(result) = &vs_entry.function.result {
            collect_locations(vs, result.ty, result.binding.as_ref(), &mut vs_outputs);
        }

        let mut fs_inputs = Vec::new();
        for arg in &fs_entry.function.arguments {
            collect_locations(fs, arg.ty, arg.binding.as_ref(), &mut fs_inputs);
        }
        for &(location, fs_ty) in &fs_inputs {
            let Some(&(_, vs_ty)) = vs_outputs.iter().find(|(l, _)| *l == location) else {
                return Err(ShaderError::link(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            };
            if vs.types[vs_ty].inner != fs.types[fs_ty].inner {
                return Err(ShaderError::link(format!(
                    "@location({location}) is written as {} but read as {}",
                    type_name(vs, vs_ty),
                    type_name(fs, fs_ty)
                )));
            }
        }

        let mut fs_outputs = Vec::new();
        if let Some(result) = &fs_entry.function.result {
            collect_locations(fs, result.ty, result.binding.as_ref(), &mut fs_outputs);
        }
        let Some(&(_, color_ty)) = fs_outputs.iter().find(|(l, _)| *l == COLOR_LOCATION) else {
            return Err(ShaderError::link(format!(
                "fragment stage does not write @location({COLOR_LOCATION})"
            )));
        };
        // The color target is a normalized format.
        if fs.types[color_ty].inner.scalar_kind() != Some(ScalarKind::Float) {
            return Err(ShaderError::link(format!(
                "fragment output @location({COLOR_LOCATION}) is {}, the color target needs floats",
                type_name(fs, color_ty)
            )));
        }

        let mut uniforms = Vec::new();
        check_resources(vs, &mut uniforms)?;
        check_resources(fs, &mut uniforms)?;
        uniforms.sort_by_key(|u| u.binding);

        Ok(Self {
            vertex_entry: vs_entry.name.clone(),
            fragment_entry: fs_entry.name.clone(),
            uniforms,
        })
    }
}

/// WGSL-ish spelling of a varying or output type, for link messages.
fn type_name(module: &Module, ty: Handle<Type>) -> String {
    match &module.types[ty].inner {
        TypeInner::Scalar(scalar) => scalar_name(*scalar),
        TypeInner::Vector { size, scalar } => format!("vec{}<{}>", *size as u8, scalar_name(*scalar)),
        other => format!("{other:?}"),
    }
}

fn scalar_name(scalar: Scalar) -> String {
    let prefix = match scalar.kind {
        ScalarKind::Float => "f",
        ScalarKind::Sint => "i",
        ScalarKind::Uint => "u",
        ScalarKind::Bool => return "bool".to_string(),
        other => return format!("{other:?}"),
    };
    format!("{prefix}{}", scalar.width as u32 * 8)
}

/// Flattens an entry-point argument or result into `(location, type)` pairs.
///
/// Struct members carry their own bindings; built-ins are skipped.
fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, Handle<Type>)>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push((*location, ty)),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn check_resources(module: &Module, uniforms: &mut Vec<UniformDecl>) -> Result<(), ShaderError> {
    for (_, global) in module.global_variables.iter() {
        let Some(rb) = &global.binding else { continue };
        let inner = &module.types[global.ty].inner;
        let slot = format!("@group({}) @binding({})", rb.group, rb.binding);

        match (rb.group, rb.binding) {
            (TEXTURE_GROUP, TEXTURE_BINDING) => {
                let ok = matches!(
                    inner,
                    TypeInner::Image {
                        dim: ImageDimension::D2,
                        arrayed: false,
                        class: ImageClass::Sampled { kind: ScalarKind::Float, multi: false },
                        ..
                    }
                );
                if !ok {
                    return Err(ShaderError::link(format!("{slot} must be a texture_2d<f32>")));
                }
            }
            (TEXTURE_GROUP, SAMPLER_BINDING) => {
                if !matches!(inner, TypeInner::Sampler { comparison: false, .. }) {
                    return Err(ShaderError::link(format!("{slot} must be a filtering sampler")));
                }
            }
            (UNIFORM_GROUP, binding) => {
                let decl = uniform_decl(global.name.as_deref(), global.space, inner, binding)
                    .ok_or_else(|| {
                        ShaderError::link(format!(
                            "{slot} must be a named var<uniform> of type i32 or u32"
                        ))
                    })?;

                match uniforms.iter().find(|u| u.binding == binding) {
                    Some(existing) if *existing != decl => {
                        return Err(ShaderError::link(format!(
                            "{slot} is declared as `{}` and `{}`",
                            existing.name, decl.name
                        )));
                    }
                    Some(_) => {}
                    None => uniforms.push(decl),
                }
            }
            _ => {
                return Err(ShaderError::link(format!("unsupported resource binding {slot}")));
            }
        }
    }
    Ok(())
}

fn uniform_decl(
    name: Option<&str>,
    space: AddressSpace,
    inner: &TypeInner,
    binding: u32,
) -> Option<UniformDecl> {
    if space != AddressSpace::Uniform {
        return None;
    }
    let kind = match inner {
        TypeInner::Scalar(s) if s.width == 4 && s.kind == ScalarKind::Sint => IntKind::Signed,
        TypeInner::Scalar(s) if s.width == 4 && s.kind == ScalarKind::Uint => IntKind::Unsigned,
        _ => return None,
    };
    Some(UniformDecl {
        name: name?.to_string(),
        binding,
        kind,
    })
}
