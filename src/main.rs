use dealerpilot::config::{self, Config, Invocation};

fn main() {
    let config = match Config::resolve() {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", config::usage());
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            std::process::exit(1);
        }
    };

    dealerpilot::telemetry::init_tracing(&config.log_filter);
    dealerpilot::cli::run(&config);
}
