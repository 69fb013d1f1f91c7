mod app;
mod config;
mod input;
mod model;
mod render;
mod sim;
mod storage;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    app::run()
}
