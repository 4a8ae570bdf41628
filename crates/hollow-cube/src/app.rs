use anyhow::{Context, Result};

use hollow_engine::core::{App, AppControl, FrameCtx, InitCtx};
use hollow_engine::render::RenderCtx;

use crate::config::CubeConfig;
use crate::geometry::colored_cube;
use crate::program::Program;
use crate::renderer::CubeRenderer;
use crate::scene::CubeScene;

/// Wires the cube scene and renderer to the engine callbacks.
pub struct CubeApp {
    program: Program,
    scene: CubeScene,
    renderer: Option<CubeRenderer>,
}

impl CubeApp {
    /// Compiles and links the shaders. Runs before any window exists, so a bad
    /// shader fails startup without flashing a window.
    pub fn new(config: &CubeConfig) -> Result<Self> {
        let program = Program::cube()
            .inspect_err(|err| log::error!("{err}"))
            .context("failed to build the hollow cube shader program")?;

        Ok(Self {
            program,
            scene: CubeScene::new(config.initial, config.step),
            renderer: None,
        })
    }
}

impl App for CubeApp {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        ctx.gpu.enable_depth_test();

        let gpu = &*ctx.gpu;
        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.size());
        let renderer = CubeRenderer::new(&rctx, gpu.depth_format(), &self.program, colored_cube())
            .context("failed to create the cube renderer")?;

        // Projection follows in the first on_resize. The identity model keeps the
        // buffer defined; every draw advances and re-uploads it first, so it is
        // never what reaches the screen.
        let uniforms = self.scene.uniforms();
        renderer.write_view(gpu.queue(), &uniforms.view);
        renderer.write_model(gpu.queue(), &uniforms.model);

        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut InitCtx<'_, '_>, width: u32, height: u32) {
        let projection = self.scene.resize(width, height);
        if let Some(renderer) = &self.renderer {
            renderer.write_projection(ctx.gpu.queue(), &projection);
        }
        log::debug!("projection updated for {width}x{height}");
    }

    fn on_draw(&mut self, ctx: &mut FrameCtx<'_, '_>, _dt: f32) -> AppControl {
        let Some(renderer) = &self.renderer else {
            log::error!("draw before init; stopping");
            return AppControl::Exit;
        };

        let model = self.scene.advance();
        renderer.write_model(ctx.gpu.queue(), &model);

        let t = self.scene.transform();
        log::trace!(
            "frame {}: theta {} phi {}",
            ctx.time.frame_index,
            t.theta,
            t.phi
        );

        ctx.render(|_, target| renderer.draw(target))
    }
}
