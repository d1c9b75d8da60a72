use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = filesort::cli::parse();
    app::run(args)
}
