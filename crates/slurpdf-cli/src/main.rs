mod cli;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Text {
            ref file,
            pages,
            ref format,
            skip_failed_pages,
        } => text_cmd::run(file, pages, format, skip_failed_pages),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
