//! XQ Keeper - API test suite launcher
//!
//! Forwards its arguments to the `xq-runner` test runner with
//! `API_BASE_URL` resolved from `--base-url`, the environment or the default.

use xq_keeper::cli::{self, Launcher, MissingRunner, ProcessLauncher};
use xq_keeper::common::{config::BASE_URL_ENV, logging, paths};

#[tokio::main]
async fn main() {
    logging::init_cli();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let env_base_url = std::env::var(BASE_URL_ENV).ok();

    let launcher: Box<dyn Launcher> = match cli::locate_runner() {
        Ok(program) => Box::new(ProcessLauncher::new(program, paths::package_root())),
        Err(e) => Box::new(MissingRunner::new(&e)),
    };

    let code = cli::run(&args, env_base_url.as_deref(), launcher.as_ref()).await;
    std::process::exit(code);
}
