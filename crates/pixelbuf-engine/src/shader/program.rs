use crate::logging::{DiagnosticLevel, Diagnostics};
use crate::mesh::QuadVertex;

use super::error::ShaderError;
use super::interface::{compile, ProgramInterface, UniformDecl, UNIFORM_GROUP};
use super::source::ShaderSource;

/// Uniform buffers are padded to the smallest size every backend accepts.
const UNIFORM_BUFFER_SIZE: u64 = 16;

/// What a program's pipeline renders into and reads from.
pub struct PipelineTargets<'a> {
    /// Format of the color attachment (usually the surface format).
    pub color_format: wgpu::TextureFormat,
    /// Layout of bind group 0: the frame texture and its sampler.
    pub texture_layout: &'a wgpu::BindGroupLayout,
}

/// A linked vertex + fragment program, or an inert placeholder.
///
/// Construction never fails: load, compile and link errors are logged and
/// leave the program inert. An inert program ignores [`activate`] (with a
/// warning) and [`set_uniform_int`].
///
/// [`activate`]: ShaderProgram::activate
/// [`set_uniform_int`]: ShaderProgram::set_uniform_int
pub struct ShaderProgram {
    linked: Option<LinkedProgram>,
    diagnostics: Diagnostics,
}

struct LinkedProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: Vec<UniformSlot>,
}

struct UniformSlot {
    decl: UniformDecl,
    buffer: wgpu::Buffer,
}

impl ShaderProgram {
    /// Loads, compiles and links `source` into a render pipeline.
    pub fn new(
        device: &wgpu::Device,
        source: &ShaderSource,
        targets: &PipelineTargets<'_>,
        level: DiagnosticLevel,
    ) -> Self {
        let diagnostics = Diagnostics::new(level);

        match build(device, source, targets, &diagnostics) {
            Ok(linked) => {
                diagnostics.trace(format_args!(
                    "shader program `{}` linked with {} uniform(s)",
                    linked.label,
                    linked.uniforms.len()
                ));
                Self {
                    linked: Some(linked),
                    diagnostics,
                }
            }
            Err(err) => {
                log::error!("{err}");
                Self::inert(level)
            }
        }
    }

    /// A program that draws nothing.
    pub fn inert(level: DiagnosticLevel) -> Self {
        Self {
            linked: None,
            diagnostics: Diagnostics::new(level),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.linked.is_some()
    }

    /// Names of the integer uniforms the program declares.
    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.linked
            .iter()
            .flat_map(|l| l.uniforms.iter().map(|u| u.decl.name.as_str()))
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniform_names().any(|n| n == name)
    }

    /// Number of warnings this program has emitted.
    #[inline]
    pub fn diagnostic_count(&self) -> u32 {
        self.diagnostics.emitted()
    }

    /// Binds the pipeline and the uniform group on `pass`.
    ///
    /// Returns `false` without touching the pass when the program is inert;
    /// that case is always reported, whatever the diagnostic level.
    /// The caller binds group 0 (the frame texture) itself.
    pub fn activate(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(linked) = &self.linked else {
            self.diagnostics
                .warn_always(format_args!("attempted to use an uninitialized shader program"));
            return false;
        };

        pass.set_pipeline(&linked.pipeline);
        pass.set_bind_group(UNIFORM_GROUP, &linked.uniform_bind_group, &[]);
        true
    }

    /// Writes an integer uniform by name.
    ///
    /// Returns whether a uniform was written. Unknown names and inert
    /// programs are reported in verbose mode and ignored in quiet mode.
    /// The value is stored bit-for-bit, so `u32` uniforms see negative
    /// values as their two's complement.
    pub fn set_uniform_int(&self, queue: &wgpu::Queue, name: &str, value: i32) -> bool {
        let Some(linked) = &self.linked else {
            self.diagnostics.warn(format_args!(
                "attempted to set uniform `{name}` on an uninitialized shader program"
            ));
            return false;
        };

        let Some(slot) = linked.uniforms.iter().find(|u| u.decl.name == name) else {
            self.diagnostics.warn(format_args!(
                "uniform `{name}` not found in shader program `{}`; it may be misspelled or unused",
                linked.label
            ));
            return false;
        };

        queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&value));
        true
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Some(linked) = &self.linked {
            self.diagnostics
                .trace(format_args!("shader program `{}` released", linked.label));
        }
    }
}

fn build(
    device: &wgpu::Device,
    source: &ShaderSource,
    targets: &PipelineTargets<'_>,
    diagnostics: &Diagnostics,
) -> Result<LinkedProgram, ShaderError> {
    let (vs_text, fs_text) = source.load()?;
    diagnostics.trace(format_args!(
        "loaded shaders: {} and {}",
        vs_text.origin, fs_text.origin
    ));

    let vs = compile(&vs_text)?;
    diagnostics.trace(format_args!("vertex shader compiled"));
    let fs = compile(&fs_text)?;
    diagnostics.trace(format_args!("fragment shader compiled"));

    let interface = ProgramInterface::link(&vs, &fs)?;
    let label = format!("{}+{}", vs_text.origin, fs_text.origin);

    // wgpu validates the pipeline again; its errors land here, not in the
    // device's uncaptured-error handler.
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pixelbuf vertex shader"),
        source: wgpu::ShaderSource::Wgsl(vs_text.text.clone()),
    });
    let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pixelbuf fragment shader"),
        source: wgpu::ShaderSource::Wgsl(fs_text.text.clone()),
    });

    let uniform_entries: Vec<wgpu::BindGroupLayoutEntry> = interface
        .uniforms
        .iter()
        .map(|u| wgpu::BindGroupLayoutEntry {
            binding: u.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(4),
            },
            count: None,
        })
        .collect();

    let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("pixelbuf uniform bgl"),
        entries: &uniform_entries,
    });

    let uniforms: Vec<UniformSlot> = interface
        .uniforms
        .iter()
        .map(|decl| UniformSlot {
            buffer: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pixelbuf int uniform"),
                size: UNIFORM_BUFFER_SIZE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            decl: decl.clone(),
        })
        .collect();

    let uniform_bind_entries: Vec<wgpu::BindGroupEntry<'_>> = uniforms
        .iter()
        .map(|slot| wgpu::BindGroupEntry {
            binding: slot.decl.binding,
            resource: slot.buffer.as_entire_binding(),
        })
        .collect();

    let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("pixelbuf uniform bind group"),
        layout: &uniform_layout,
        entries: &uniform_bind_entries,
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pixelbuf quad pipeline layout"),
        bind_group_layouts: &[targets.texture_layout, &uniform_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pixelbuf quad pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &vs_module,
            entry_point: Some(interface.vertex_entry.as_str()),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fs_module,
            entry_point: Some(interface.fragment_entry.as_str()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: targets.color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(ShaderError::link(err.to_string()));
    }

    diagnostics.trace(format_args!("shader program `{label}` pipeline created"));

    Ok(LinkedProgram {
        label,
        pipeline,
        uniform_bind_group,
        uniforms,
    })
}
