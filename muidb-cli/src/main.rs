use std::{error::Error as _, path::PathBuf, process};

use clap::{Parser, Subcommand};
use env_logger::Env;

use muidb_cli::{
    CliError,
    about::print_about,
    commands::{run_add_output, run_export, run_export_file, run_import_file, run_info, run_verify},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show item, language and review-state counts of a database.
    Info {
        /// The .muidb file to inspect
        muidb: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge a RESX or XLIFF file into a database, creating it if missing.
    ImportFile {
        /// The .muidb file to update
        muidb: PathBuf,

        /// Source format: resx or xliff
        #[arg(short = 't', long = "type")]
        format: String,

        /// The source file to import
        #[arg(short, long = "in")]
        input: PathBuf,

        /// Language of the texts in the source file
        #[arg(short, long)]
        lang: String,

        /// List every added and updated id
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write every output file configured in the database.
    Export {
        /// The .muidb file to export
        muidb: PathBuf,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a single language of the database to a file.
    ExportFile {
        /// The .muidb file to export
        muidb: PathBuf,

        /// Target format (only resx can be written)
        #[arg(short = 't', long = "type")]
        format: String,

        /// The file to write
        #[arg(short, long = "out")]
        output: PathBuf,

        /// Language to project
        #[arg(short, long)]
        lang: String,

        /// Leave item comments out of the output
        #[arg(long)]
        no_comments: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Check the database for inconsistencies and save the normalized result.
    Verify {
        /// The .muidb file to check
        muidb: PathBuf,
    },

    /// Register an output file for `export`.
    AddOutput {
        /// The .muidb file to update
        muidb: PathBuf,

        /// File name, relative to the database directory
        #[arg(short, long)]
        name: String,

        /// Language written to that file
        #[arg(short, long)]
        lang: String,
    },

    /// Show attribution and license information.
    About,
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::ImportFile { verbose, .. }
            | Commands::Export { verbose, .. }
            | Commands::ExportFile { verbose, .. } => *verbose,
            _ => false,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(commands: Commands) -> Result<(), CliError> {
    match commands {
        Commands::Info { muidb, json } => run_info(&muidb, json),
        Commands::ImportFile {
            muidb,
            format,
            input,
            lang,
            verbose,
        } => run_import_file(&muidb, &format, &input, &lang, verbose),
        Commands::Export { muidb, verbose } => run_export(&muidb, verbose),
        Commands::ExportFile {
            muidb,
            format,
            output,
            lang,
            no_comments,
            verbose,
        } => run_export_file(&muidb, &format, &output, &lang, !no_comments, verbose),
        Commands::Verify { muidb } => run_verify(&muidb),
        Commands::AddOutput { muidb, name, lang } => run_add_output(&muidb, &name, &lang),
        Commands::About => {
            print_about();
            Ok(())
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported through this path too.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(args.commands.verbose());

    if let Err(e) = run(args.commands) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
