use super::{ProgramError, ShaderStage};

/// Bind group slot of a named uniform.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub group: u32,
    pub binding: u32,
}

/// Shader location of a named per-vertex attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub location: u32,
}

/// Names resolved by a successful link.
#[derive(Debug, Default)]
pub(crate) struct Interface {
    uniforms: Vec<(String, UniformSlot)>,
    attributes: Vec<(String, AttributeSlot)>,
}

impl Interface {
    pub(crate) fn uniform(&self, name: &str) -> Option<UniformSlot> {
        lookup(&self.uniforms, name)
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<AttributeSlot> {
        lookup(&self.attributes, name)
    }
}

fn lookup<T: Copy>(entries: &[(String, T)], name: &str) -> Option<T> {
    entries.iter().find(|(n, _)| n == name).map(|(_, slot)| *slot)
}

/// An entry-point input or output with its binding, flattened out of structs.
struct Io {
    name: String,
    binding: naga::Binding,
    ty: naga::TypeInner,
}

impl Io {
    fn location(&self) -> Option<u32> {
        match self.binding {
            naga::Binding::Location { location, .. } => Some(location),
            _ => None,
        }
    }
}

fn flatten(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<Io>,
) {
    let inner = &module.types[ty].inner;
    match (binding, inner) {
        (Some(binding), _) => out.push(Io {
            name: name.unwrap_or_default().to_owned(),
            binding: binding.clone(),
            ty: inner.clone(),
        }),
        (None, naga::TypeInner::Struct { members, .. }) => {
            for member in members {
                flatten(
                    module,
                    member.name.as_deref(),
                    member.ty,
                    member.binding.as_ref(),
                    out,
                );
            }
        }
        (None, _) => {}
    }
}

fn inputs(stage: &ShaderStage) -> Vec<Io> {
    let mut out = Vec::new();
    for arg in &stage.entry().function.arguments {
        flatten(
            stage.module(),
            arg.name.as_deref(),
            arg.ty,
            arg.binding.as_ref(),
            &mut out,
        );
    }
    out
}

fn outputs(stage: &ShaderStage) -> Vec<Io> {
    let mut out = Vec::new();
    if let Some(result) = &stage.entry().function.result {
        flatten(
            stage.module(),
            None,
            result.ty,
            result.binding.as_ref(),
            &mut out,
        );
    }
    out
}

fn uniforms(stage: &ShaderStage) -> Vec<(String, UniformSlot)> {
    stage
        .module()
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let name = var.name.clone()?;
            let binding = var.binding.as_ref()?;
            Some((
                name,
                UniformSlot {
                    group: binding.group,
                    binding: binding.binding,
                },
            ))
        })
        .collect()
}

/// Matches the vertex outputs against the fragment inputs and resolves the
/// required uniform and attribute names.
pub(crate) fn link(
    vertex: &ShaderStage,
    fragment: &ShaderStage,
    required_uniforms: &[&str],
    required_attributes: &[&str],
) -> Result<Interface, ProgramError> {
    let varyings = outputs(vertex);

    let writes_position = varyings.iter().any(|io| {
        matches!(
            io.binding,
            naga::Binding::BuiltIn(naga::BuiltIn::Position { .. })
        )
    });
    if !writes_position {
        return Err(ProgramError::link(
            "vertex stage does not write @builtin(position)",
        ));
    }

    for input in inputs(fragment) {
        let Some(location) = input.location() else {
            continue;
        };
        let Some(output) = varyings.iter().find(|o| o.location() == Some(location)) else {
            return Err(ProgramError::link(format!(
                "fragment input `{}` at location {location} is not written by the vertex stage",
                input.name
            )));
        };
        if output.ty != input.ty {
            return Err(ProgramError::link(format!(
                "location {location}: vertex writes `{}` as {:?}, fragment reads `{}` as {:?}",
                output.name, output.ty, input.name, input.ty
            )));
        }
    }

    let mut interface = Interface::default();

    for (name, slot) in uniforms(vertex).into_iter().chain(uniforms(fragment)) {
        match interface.uniform(&name) {
            Some(existing) if existing != slot => {
                return Err(ProgramError::link(format!(
                    "uniform `{name}` is bound at {existing:?} in one stage and {slot:?} in the other"
                )));
            }
            Some(_) => {}
            None => interface.uniforms.push((name, slot)),
        }
    }

    for io in inputs(vertex) {
        if let Some(location) = io.location() {
            interface
                .attributes
                .push((io.name, AttributeSlot { location }));
        }
    }

    for name in required_uniforms {
        if interface.uniform(name).is_none() {
            return Err(ProgramError::link(format!("uniform `{name}` is not declared")));
        }
    }
    for name in required_attributes {
        if interface.attribute(name).is_none() {
            return Err(ProgramError::link(format!(
                "attribute `{name}` is not a vertex input"
            )));
        }
    }

    Ok(interface)
}
