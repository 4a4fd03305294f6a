use dojo_runtime::{DEFAULT_FILTER, LogFormat, init_logging};

fn main() {
    init_logging(LogFormat::from_env(), DEFAULT_FILTER);
    let code = dojo_cli::run(
        std::env::args(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    std::process::exit(code);
}
