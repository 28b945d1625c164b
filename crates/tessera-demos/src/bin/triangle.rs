use tessera_demos::triangle::TriangleDemo;
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tessera · triangle".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), TriangleDemo::new())
}
