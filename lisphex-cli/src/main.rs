use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lisphex_core::{compile, dump, records};

#[derive(Parser, Debug)]
#[command(version, about = "Compile an S-expression into a lisp machine memory image")]
struct Cli {
    /// Source file; reads stdin when omitted
    #[arg(short, long)]
    input: Option<String>,

    #[arg(short, long)]
    output: String,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "hex",
        help = "Output format: hex (checksummed records), words (decimal listing)"
    )]
    emit: String,

    #[arg(long, help = "Print a decoded listing of the image to stdout")]
    dump: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let source = match cli.input {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read input file {path}"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    // File inputs normally end in a newline; the expression grammar
    // separates tokens with plain spaces only.
    let image = compile(source.trim())?;

    let rendered = match cli.emit.as_str() {
        "hex" => records::render_hex(&image),
        "words" => records::render_words(&image),
        other => return Err(anyhow::anyhow!("unsupported emit format: {other}")),
    };
    write_output(&cli.output, rendered.as_bytes())?;

    if cli.dump {
        print!("{}", dump::render_dump(&image));
    }

    Ok(())
}

fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    Ok(())
}
