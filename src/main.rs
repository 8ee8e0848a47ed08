use bounce::app;
use bounce::config::Variant;

fn main() -> anyhow::Result<()> {
    app::init_logging();
    app::run(Variant::MultiBall)
}
