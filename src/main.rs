use anyhow::Context;
use clap::Parser;
use img_budget::batch::{print_outcome, reduce_batch};
use img_budget::cli::{Args, Commands};
use img_budget::info::show_image_info;
use img_budget::logger::{set_verbosity, Verbosity};
use img_budget::options::ReduceOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            img_budget::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Reduce {
            input,
            output,
            budget,
            filesize,
            recursive,
            format,
            colorbits,
        } => {
            let options = ReduceOptions::new(budget, filesize, recursive, format, colorbits)?;
            let outcome = reduce_batch(&input, &output, &options)
                .with_context(|| format!("batch reduction of {} failed", input))?;
            print_outcome(&outcome);
        }
        Commands::Info { input, filesize } => {
            show_image_info(&input, filesize)?;
        }
    }

    Ok(())
}
