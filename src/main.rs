use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossword::render::{render_grid, save};
use crossword::{Crossword, CrosswordCreator};

/// Fill a crossword grid from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: `_` marks an open cell, anything else a block
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let debug_enabled = std::env::var("CROSSWORD_DEBUG").is_ok();
    crossword::logging::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let crossword = Crossword::from_files(&cli.structure, &cli.words)?;
    let mut creator = CrosswordCreator::new(&crossword);
    let assignment = creator.solve();

    eprintln!("{:?}", creator.statistics());

    match assignment {
        None => println!("No solution."),
        Some(assignment) => {
            println!("{}", render_grid(&crossword, &assignment));

            if let Some(output) = &cli.output {
                save(&crossword, &assignment, output)?;
                log::info!("Wrote fill to {}", output.display());
            }
        }
    }

    Ok(())
}
