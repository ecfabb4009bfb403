mod commands;
mod source;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, check, interfaces, plan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg = commands.to_config()?;
    print::banner(cfg.no_banner, cfg.quiet);

    let all_passed: bool = match &commands.command {
        Commands::Check(selection) => {
            print::header("checking links", cfg.quiet);
            check::check(&selection.source, &cfg).await?
        }
        Commands::Interfaces { selection, raw } => {
            interfaces::interfaces(&selection.source, *raw, &cfg).await?
        }
        Commands::Plan(selection) => plan::plan(&selection.source, &cfg).await?,
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }

    Ok(if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
