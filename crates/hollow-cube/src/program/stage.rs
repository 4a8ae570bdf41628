use std::borrow::Cow;
use std::fmt;

use super::ProgramError;

/// Pipeline stage a WGSL source is compiled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// Entry point every source for this stage must declare.
    pub const fn entry_point(self) -> &'static str {
        match self {
            StageKind::Vertex => "vs_main",
            StageKind::Fragment => "fs_main",
        }
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        })
    }
}

/// One parsed and validated shader stage.
pub struct ShaderStage {
    kind: StageKind,
    source: String,
    module: naga::Module,
    entry_index: usize,
}

impl ShaderStage {
    /// Parses and validates `source`, and checks that it declares this stage's entry point.
    pub fn compile(kind: StageKind, source: &str) -> Result<Self, ProgramError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ProgramError::compile(kind, e.emit_to_string(source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| ProgramError::compile(kind, error_chain(&e)))?;

        let entry_index = module
            .entry_points
            .iter()
            .position(|ep| ep.stage == kind.naga_stage() && ep.name == kind.entry_point())
            .ok_or_else(|| {
                ProgramError::compile(
                    kind,
                    format!("no @{kind} entry point named `{}`", kind.entry_point()),
                )
            })?;

        log::debug!("compiled {kind} stage ({} bytes of WGSL)", source.len());

        Ok(Self {
            kind,
            source: source.to_owned(),
            module,
            entry_index,
        })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    /// Value of a module-scope `const NAME: f32`.
    pub fn constant_f32(&self, name: &str) -> Option<f32> {
        let (_, constant) = self
            .module
            .constants
            .iter()
            .find(|(_, c)| c.name.as_deref() == Some(name))?;

        match self.module.global_expressions[constant.init] {
            naga::Expression::Literal(naga::Literal::F32(v)) => Some(v),
            naga::Expression::Literal(naga::Literal::AbstractFloat(v)) => Some(v as f32),
            _ => None,
        }
    }

    /// Hands the validated source to the device.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = format!("hollow cube {} shader", self.kind);
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&self.source)),
        })
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
