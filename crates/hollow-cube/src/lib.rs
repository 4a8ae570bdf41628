//! Hollow wireframe cube.
//!
//! A closed, vertex-colored cube whose fragment stage discards each face's
//! interior and paints black bands near the edges, spun one degree per frame
//! about Z and Y. Everything except `renderer` and `app` runs without a GPU.

pub mod app;
pub mod config;
pub mod fragment;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod scene;
pub mod transform;
pub mod uniforms;

pub use app::CubeApp;
pub use config::CubeConfig;
