use clap::Parser;
use log::error;

use spincube::logging::init_logging;
use spincube::StopHandle;

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    let args = Args::parse();

    init_logging(args.logging_config());

    let config = match args.viewer_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    let app = match App::new(&config, StopHandle::new()) {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    app.run();
}
