//! A CLI tool for inspecting the contents of a DICOM file
//! by printing it in a human readable format,
//! or extracting the values of a chosen set of attributes.
use clap::Parser;
use minidicom_core::dictionary::DataDictionary as _;
use minidicom_core::{DataSet, Tag};
use minidicom_dictionary_std::StandardDataDictionary;
use minidicom_parser::handler::format_value;
use minidicom_parser::{DicomReader, DumpReadHandler, TagsReadHandler};
use owo_colors::{OwoColorize, Stream};
use snafu::{Report, ResultExt, Whatever};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Exit code for when an error emerged while reading a DICOM file.
const ERROR_READ: i32 = -2;

/// Dump the contents of DICOM files
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The DICOM file(s) to read
    #[clap(required = true)]
    files: Vec<PathBuf>,
    /// Print only the elements with these tags
    /// (`GGGG,EEEE` or `GGGGEEEE`, may be given multiple times)
    #[clap(short = 't', long = "tag", value_parser = parse_tag)]
    tags: Vec<Tag>,
    /// Verbose output
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
}

fn parse_tag(s: &str) -> Result<Tag, &'static str> {
    let s = s.trim_start_matches('(').trim_end_matches(')');
    let (group, element) = match s.split_once(',') {
        Some(parts) => parts,
        None if s.len() == 8 => s.split_at(4),
        _ => return Err("tag must be of the form GGGG,EEEE or GGGGEEEE"),
    };
    let group = u16::from_str_radix(group.trim(), 16).map_err(|_| "invalid group number")?;
    let element = u16::from_str_radix(element.trim(), 16).map_err(|_| "invalid element number")?;
    Ok(Tag(group, element))
}

fn main() {
    run().unwrap_or_else(|e| {
        eprintln!("{}", Report::from_error(e));
        std::process::exit(ERROR_READ);
    });
}

fn run() -> Result<(), Whatever> {
    let app = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if app.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            })
            .finish(),
    )
    .whatever_context("could not set up the logging subscriber")?;

    let mut errors: i32 = 0;
    for path in &app.files {
        if app.files.len() > 1 {
            println!("# {}", path.display());
        }
        let outcome = if app.tags.is_empty() {
            dump_file(path)
        } else {
            extract_tags(path, &app.tags)
        };
        if let Err(e) = outcome {
            eprintln!("{}", Report::from_error(e));
            errors += 1;
        }
    }

    if errors > 0 {
        std::process::exit(ERROR_READ);
    }
    Ok(())
}

/// Print every record of the file as it is decoded.
fn dump_file(path: &Path) -> Result<(), minidicom_parser::read::Error> {
    let handler = DumpReadHandler::new(std::io::stdout());
    DicomReader::new(handler).read_file(path)
}

/// Decode only the wanted attributes and print their values,
/// without materializing the rest of the file.
fn extract_tags(path: &Path, tags: &[Tag]) -> Result<(), minidicom_parser::read::Error> {
    let mut root = DataSet::default();
    {
        let mut handler = TagsReadHandler::new(&mut root);
        for &tag in tags {
            handler.add_tag(tag);
        }
        DicomReader::new(handler).read_file(path)?;
    }

    for &tag in tags {
        let name = StandardDataDictionary
            .name_of(tag)
            .unwrap_or("(unregistered)");
        match root.get(tag) {
            Some(element) => println!(
                "{} {} {}",
                tag.if_supports_color(Stream::Stdout, |t| t.cyan()),
                name.if_supports_color(Stream::Stdout, |t| t.bold()),
                format_value(element),
            ),
            None => println!(
                "{} {} (absent)",
                tag.if_supports_color(Stream::Stdout, |t| t.cyan()),
                name.if_supports_color(Stream::Stdout, |t| t.bold()),
            ),
        }
    }
    Ok(())
}
