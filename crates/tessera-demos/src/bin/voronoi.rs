use tessera_demos::voronoi::{VoronoiConfig, VoronoiDemo, SEED_ENV};
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

// Usage: voronoi [IMAGE]
fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let seed = std::env::var(SEED_ENV).ok();
    let demo_config = VoronoiConfig::from_args(std::env::args(), seed.as_deref())?;

    let config = RuntimeConfig {
        title: "tessera · voronoi".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), VoronoiDemo::new(demo_config))
}
