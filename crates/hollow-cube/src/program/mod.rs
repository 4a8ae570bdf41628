//! Shader program: two WGSL stages compiled and linked up front, before any
//! device exists, so a broken shader aborts startup with a readable error.

mod error;
#[cfg(test)]
mod eval;
mod link;
mod stage;

pub use error::ProgramError;
pub use link::{AttributeSlot, UniformSlot};
pub use stage::{ShaderStage, StageKind};

use link::Interface;

pub const VERTEX_SOURCE: &str = include_str!("../shaders/cube.vert.wgsl");
pub const FRAGMENT_SOURCE: &str = include_str!("../shaders/cube.frag.wgsl");

/// Uniforms the cube renderer uploads.
pub const UNIFORM_NAMES: [&str; 3] = ["model", "view", "projection"];
/// Per-vertex attributes the cube mesh provides.
pub const ATTRIBUTE_NAMES: [&str; 2] = ["position", "color"];

/// A linked vertex + fragment pair and the slots its names resolved to.
pub struct Program {
    vertex: ShaderStage,
    fragment: ShaderStage,
    interface: Interface,
}

impl Program {
    /// Compiles both stages and links them.
    ///
    /// Compilation errors name the failing stage. Linking fails when the stage
    /// interfaces disagree or when a required uniform or attribute is missing.
    pub fn link(
        vertex_source: &str,
        fragment_source: &str,
        uniforms: &[&str],
        attributes: &[&str],
    ) -> Result<Self, ProgramError> {
        let vertex = ShaderStage::compile(StageKind::Vertex, vertex_source)?;
        let fragment = ShaderStage::compile(StageKind::Fragment, fragment_source)?;
        let interface = link::link(&vertex, &fragment, uniforms, attributes)?;

        log::info!(
            "linked shader program ({} uniforms, {} attributes)",
            uniforms.len(),
            attributes.len()
        );

        Ok(Self {
            vertex,
            fragment,
            interface,
        })
    }

    /// The hollow cube program built from the embedded shaders.
    pub fn cube() -> Result<Self, ProgramError> {
        Self::link(
            VERTEX_SOURCE,
            FRAGMENT_SOURCE,
            &UNIFORM_NAMES,
            &ATTRIBUTE_NAMES,
        )
    }

    pub fn uniform(&self, name: &str) -> Option<UniformSlot> {
        self.interface.uniform(name)
    }

    pub fn attribute(&self, name: &str) -> Option<AttributeSlot> {
        self.interface.attribute(name)
    }

    pub fn vertex(&self) -> &ShaderStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &ShaderStage {
        &self.fragment
    }

    /// Device modules for the vertex and fragment stages.
    pub fn create_modules(&self, device: &wgpu::Device) -> (wgpu::ShaderModule, wgpu::ShaderModule) {
        (
            self.vertex.create_module(device),
            self.fragment.create_module(device),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::EdgeBands;
    use glam::Vec3;

    const MINIMAL_FRAGMENT: &str = r#"
        @fragment
        fn fs_main(@location(0) v_position: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(v_position, 1.0);
        }
    "#;

    fn link_with_cube_vertex(fragment: &str) -> Result<Program, ProgramError> {
        Program::link(VERTEX_SOURCE, fragment, &UNIFORM_NAMES, &ATTRIBUTE_NAMES)
    }

    #[test]
    fn cube_program_links_and_resolves_every_name() {
        let program = Program::cube().expect("embedded shaders link");

        assert_eq!(program.uniform("model"), Some(UniformSlot { group: 0, binding: 0 }));
        assert_eq!(program.uniform("view"), Some(UniformSlot { group: 0, binding: 1 }));
        assert_eq!(
            program.uniform("projection"),
            Some(UniformSlot { group: 0, binding: 2 })
        );
        assert_eq!(program.attribute("position"), Some(AttributeSlot { location: 0 }));
        assert_eq!(program.attribute("color"), Some(AttributeSlot { location: 1 }));

        assert_eq!(program.uniform("normal_matrix"), None);
        assert_eq!(program.attribute("uv"), None);

        assert_eq!(program.vertex().kind(), StageKind::Vertex);
        assert_eq!(program.fragment().kind(), StageKind::Fragment);
    }

    #[test]
    fn fragment_thresholds_match_cpu_bands() {
        let program = Program::cube().unwrap();
        let bands = EdgeBands::default();
        let fragment = program.fragment();

        assert_eq!(fragment.constant_f32("B1"), Some(bands.b1));
        assert_eq!(fragment.constant_f32("B2"), Some(bands.b2));
        assert_eq!(fragment.constant_f32("B3"), Some(bands.b3));
    }

    /// Points on and inside the cube covering every band, including exact
    /// threshold values.
    fn sample_points() -> Vec<Vec3> {
        let mut points = vec![
            Vec3::ONE,
            Vec3::ZERO,
            Vec3::new(0.72, 0.72, 0.9),
            Vec3::new(0.85, 0.0, 1.0),
            Vec3::new(0.97, 0.1, 1.0),
            Vec3::new(0.70, 0.70, 1.0),
            Vec3::new(0.75, 0.75, 1.0),
            Vec3::new(0.95, 0.95, 1.0),
        ];
        let steps: Vec<f32> = (0..=40).map(|i| -1.0 + i as f32 * 0.05).collect();
        for &a in &steps {
            for &b in &steps {
                points.push(Vec3::new(a, b, 1.0));
                points.push(Vec3::new(-1.0, a, b));
                points.push(Vec3::new(a, -1.0, b));
                points.push(Vec3::new(a, b, a * b));
            }
        }
        points
    }

    #[test]
    fn fragment_stage_agrees_with_cpu_bands() {
        let program = Program::cube().unwrap();
        let bands = EdgeBands::default();
        let color = [0.2, 0.4, 0.6, 1.0];

        for p in sample_points() {
            assert_eq!(
                eval::run_fragment(program.fragment(), p.to_array(), color),
                bands.shade(p, color),
                "at {p:?}"
            );
        }
    }

    #[test]
    fn swapped_logical_operator_changes_the_output() {
        let swapped = FRAGMENT_SOURCE.replace(
            "(xy < B1) && (xz < B1) && (yz < B1)",
            "(xy < B1) || (xz < B1) || (yz < B1)",
        );
        assert_ne!(swapped, FRAGMENT_SOURCE);
        let fragment = ShaderStage::compile(StageKind::Fragment, &swapped).unwrap();

        // Frame band on the CPU; the swapped shader discards it.
        let p = Vec3::new(0.72, 0.5, 1.0);
        let color = [1.0; 4];
        assert_eq!(EdgeBands::default().shade(p, color), Some(crate::fragment::BLACK));
        assert_eq!(eval::run_fragment(&fragment, p.to_array(), color), None);
    }

    #[test]
    fn syntax_error_is_reported_against_its_stage() {
        let broken = VERTEX_SOURCE.replace("return out;", "return out");
        let err = Program::link(&broken, FRAGMENT_SOURCE, &UNIFORM_NAMES, &ATTRIBUTE_NAMES)
            .err()
            .unwrap();
        assert!(
            matches!(
                err,
                ProgramError::ShaderCompile {
                    stage: StageKind::Vertex,
                    ..
                }
            ),
            "{err}"
        );

        let err = link_with_cube_vertex("@fragment fn fs_main( -> @location(0) vec4<f32> {}")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ProgramError::ShaderCompile {
                stage: StageKind::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn type_error_fails_validation() {
        let fragment = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let x: f32 = vec2<f32>(1.0, 2.0);
                return vec4<f32>(x);
            }
        "#;
        let err = link_with_cube_vertex(fragment).err().unwrap();
        assert!(matches!(
            err,
            ProgramError::ShaderCompile {
                stage: StageKind::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let renamed = FRAGMENT_SOURCE.replace("fn fs_main", "fn main");
        let err = link_with_cube_vertex(&renamed).err().unwrap();
        match err {
            ProgramError::ShaderCompile { stage, message } => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(message.contains("fs_main"), "{message}");
            }
            other => panic!("expected compile error, got {other}"),
        }
    }

    #[test]
    fn subset_of_varyings_links() {
        assert!(link_with_cube_vertex(MINIMAL_FRAGMENT).is_ok());
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let fragment = r#"
            @fragment
            fn fs_main(@location(2) normal: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(normal, 1.0);
            }
        "#;
        let err = link_with_cube_vertex(fragment).err().unwrap();
        match err {
            ProgramError::ShaderLink { reason } => assert!(reason.contains("location 2"), "{reason}"),
            other => panic!("expected link error, got {other}"),
        }
    }

    #[test]
    fn mismatched_varying_type_fails_to_link() {
        let fragment = r#"
            @fragment
            fn fs_main(@location(0) v_position: vec4<f32>) -> @location(0) vec4<f32> {
                return v_position;
            }
        "#;
        let err = link_with_cube_vertex(fragment).err().unwrap();
        assert!(matches!(err, ProgramError::ShaderLink { .. }), "{err}");
    }

    #[test]
    fn missing_uniform_fails_to_link() {
        let vertex = r#"
            @group(0) @binding(0) var<uniform> model: mat4x4<f32>;
            @group(0) @binding(1) var<uniform> view: mat4x4<f32>;

            struct VertexOutput {
                @builtin(position) clip_position: vec4<f32>,
                @location(0) v_position: vec3<f32>,
            };

            @vertex
            fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
                var out: VertexOutput;
                out.v_position = position;
                out.clip_position = view * model * vec4<f32>(position, 1.0);
                return out;
            }
        "#;
        let err = Program::link(vertex, MINIMAL_FRAGMENT, &UNIFORM_NAMES, &ATTRIBUTE_NAMES)
            .err()
            .unwrap();
        match err {
            ProgramError::ShaderLink { reason } => assert!(reason.contains("projection"), "{reason}"),
            other => panic!("expected link error, got {other}"),
        }
    }

    #[test]
    fn missing_attribute_fails_to_link() {
        let without_color = VERTEX_SOURCE
            .replace("@location(1) color: vec4<f32>,", "")
            .replace("out.v_color = attrs.color;", "out.v_color = vec4<f32>(1.0);");
        let err = Program::link(
            &without_color,
            FRAGMENT_SOURCE,
            &UNIFORM_NAMES,
            &ATTRIBUTE_NAMES,
        )
        .err()
        .unwrap();
        match err {
            ProgramError::ShaderLink { reason } => assert!(reason.contains("color"), "{reason}"),
            other => panic!("expected link error, got {other}"),
        }
    }

    #[test]
    fn conflicting_uniform_slots_fail_to_link() {
        let fragment = r#"
            @group(0) @binding(5) var<uniform> model: mat4x4<f32>;

            @fragment
            fn fs_main(@location(0) v_position: vec3<f32>) -> @location(0) vec4<f32> {
                return model * vec4<f32>(v_position, 1.0);
            }
        "#;
        let err = link_with_cube_vertex(fragment).err().unwrap();
        match err {
            ProgramError::ShaderLink { reason } => assert!(reason.contains("model"), "{reason}"),
            other => panic!("expected link error, got {other}"),
        }
    }
}
