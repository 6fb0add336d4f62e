//! Argument parsing and execution for the aranges dump tool.
//!
//! The input file holds raw `.debug_aranges` section bytes, as carved out
//! of an object file by `objcopy -O binary --only-section` or similar.

use std::path::PathBuf;
use std::process::ExitCode;

use aranges::{DebugAranges, Endian};
use thiserror::Error;

const USAGE: &str = "Usage: aranges [OPTIONS] <FILE>

Decode a raw .debug_aranges section image.

  -B, --big-endian   treat multi-byte fields as big-endian (default: little)
      --find ADDR    print the CU offset covering ADDR instead of dumping
  -h, --help         show this help";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Lib(#[from] aranges::Error),
}

#[derive(Debug)]
pub struct Args {
    pub input: PathBuf,
    pub endian: Endian,
    pub find: Option<u64>,
}

impl Args {
    pub fn parse_from<I: IntoIterator<Item = String>>(argv: I) -> Result<Self, CliError> {
        let mut input: Option<PathBuf> = None;
        let mut endian = Endian::Little;
        let mut find = None;

        let mut iter = argv.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-B" | "--big-endian" => endian = Endian::Big,
                "--find" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Usage("--find requires an address".into()))?;
                    find = Some(parse_address(&value)?);
                }
                _ if arg.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option '{arg}'")));
                }
                _ => {
                    if input.replace(PathBuf::from(&arg)).is_some() {
                        return Err(CliError::Usage("more than one input file".into()));
                    }
                }
            }
        }

        let input = input.ok_or_else(|| CliError::Usage("missing input file".into()))?;
        Ok(Self {
            input,
            endian,
            find,
        })
    }

    pub fn execute(&self) -> Result<ExitCode, CliError> {
        let aranges = DebugAranges::from_file(&self.input, self.endian)?;

        for error in aranges.errors() {
            eprintln!("warning: skipped set: {error}");
        }

        if let Some(address) = self.find {
            return Ok(match aranges.find_address(address) {
                Some(cu_offset) => {
                    println!("{cu_offset:#010X}");
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("address {address:#X} not covered by any set");
                    ExitCode::FAILURE
                }
            });
        }

        for set in aranges.sets() {
            let header = set.header();
            println!(
                "set at {:#010X}: length {:#010X}, version {}, cu_offset {:#010X}, addr_size {}, seg_size {}",
                set.offset().unwrap_or(0),
                header.length,
                header.version,
                header.cu_offset,
                header.addr_size,
                header.seg_size,
            );
            for descriptor in set.descriptors() {
                println!(
                    "  [{:#018X}, {:#018X})",
                    descriptor.address,
                    descriptor.end_address(),
                );
            }
        }

        if aranges.errors().is_empty() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parse an address from hex (0x prefix) or decimal.
fn parse_address(s: &str) -> Result<u64, CliError> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| CliError::Usage(format!("invalid address '{s}': {e}")))
}

pub fn run() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let args = match Args::parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match args.execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
