mod error;
mod input;
mod parser;
mod retime;
mod serialiser;
mod srt;
mod timing;

use crate::parser::Parser;
use crate::retime::{FrameRate, RetimeOpts};

use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser as ClapParser};
use log::{info, warn, LevelFilter};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Rescale and shift the timestamps of SRT subtitles")]
#[command(group(ArgGroup::new("rate").args(["ntsc", "pal"])))]
#[command(group(ArgGroup::new("verbosity").args(["verbose", "quiet"])))]
struct Cli {
    #[arg(
        value_name = "INFILE",
        help = "The file to read from, or '-' for standard input."
    )]
    infile: String,
    #[arg(
        value_name = "OUTFILE",
        help = "The file to write to, or '-' for standard output."
    )]
    outfile: String,
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_offset,
        help = "Offset in seconds, added after rate scaling."
    )]
    offset_seconds: f64,
    #[arg(
        short = 'e',
        long,
        value_name = "LABEL",
        help = "Set source encoding (output will always be UTF-8)."
    )]
    source_encoding: Option<String>,
    #[arg(long, help = "Scale times by the NTSC rate (x1.040959).")]
    ntsc: bool,
    #[arg(long, help = "Scale times by the PAL rate (x0.959041).")]
    pal: bool,
    #[arg(short, long, help = "Also log per-block details.")]
    verbose: bool,
    #[arg(short, long, help = "Only log fatal errors.")]
    quiet: bool,
}

fn parse_offset(value: &str) -> Result<f64, String> {
    let offset: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if offset.is_finite() {
        Ok(offset)
    } else {
        Err(format!("'{}' is not a finite number of seconds", value))
    }
}

impl Cli {
    fn frame_rate(&self) -> Option<FrameRate> {
        if self.ntsc {
            Some(FrameRate::Ntsc)
        } else if self.pal {
            Some(FrameRate::Pal)
        } else {
            None
        }
    }

    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let encoding = input::resolve_encoding(cli.source_encoding.as_deref())?;
    let data = input::read_input(&cli.infile, encoding)?;

    let opts = RetimeOpts::new(cli.frame_rate(), cli.offset_seconds);
    let parsed = Parser::new(opts).parse(&data);
    for diagnostic in &parsed.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        "Retimed {} subtitles ({} diagnostics, rate {}, offset {}s)",
        parsed.subs.len(),
        parsed.diagnostics.len(),
        opts.rate,
        opts.offset_secs
    );

    if cli.outfile == "-" {
        serialiser::serialise(parsed.subs, io::stdout().lock())?;
    } else {
        let dst = std::fs::File::create(&cli.outfile)
            .context(format!("Failed to create output file: '{}'", cli.outfile))?;
        serialiser::serialise(parsed.subs, dst)?;
    }

    Ok(())
}
