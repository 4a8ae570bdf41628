use anyhow::Result;

use hollow_cube::{CubeApp, CubeConfig};
use hollow_engine::device::GpuInit;
use hollow_engine::logging::{init_logging, LoggingConfig};
use hollow_engine::window::Runtime;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = CubeConfig::default();
    let app = CubeApp::new(&config)?;

    Runtime::run(
        config.runtime_config(),
        GpuInit::default(),
        config.pacing(),
        app,
    )
}
