use clap::Parser;
use pos_ui_suite::cli::commands::{cmd_list, cmd_run};
use pos_ui_suite::cli::config::{Cli, Commands, RunOverrides, load_config};
use pos_ui_suite::trace::logger::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            format,
            output,
            filter,
            headless,
            base_url,
            webdriver_url,
        } => {
            // Resolve settings: CLI > config file > defaults
            let overrides = RunOverrides {
                format,
                output,
                headless,
                base_url,
                webdriver_url,
            };
            let config = load_config(cli.config.as_deref()).apply(&overrides);

            let all_passed = cmd_run(&config, filter.as_deref())?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::List { filter } => cmd_list(filter.as_deref()),
    }

    Ok(())
}
