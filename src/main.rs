mod cli;
mod env_loader;
mod error;
mod logging;
mod medel;

fn main() {
    env_loader::load_dotenv();
    logging::init();

    if let Err(err) = cli::run() {
        let stage = err
            .downcast_ref::<error::MedelError>()
            .map(error::MedelError::stage)
            .unwrap_or("startup");
        tracing::error!(stage, "run failed: {err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
