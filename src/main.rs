// src/main.rs

use anyhow::Result;

fn main() -> Result<()> {
    let env = env_logger::Env::new()
        .filter_or("DECLPACK_LOG", "warn")
        .write_style("DECLPACK_LOG_STYLE");
    env_logger::Builder::from_env(env).format_timestamp(None).init();

    declpack::commands::run_cli()
}
