use anyhow::{bail, Context};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::{
    fs::{create_dir_all, File},
    io::{stdout, Write},
    path::PathBuf,
};
use structopt::StructOpt;
use wololo::drs::{merge_archive, RemapRule, ResourceIndex};
use wololo::{DRSReader, DRSWriter};

#[derive(StructOpt)]
struct Cli {
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(name = "list")]
    /// List the resources in <file>
    List(List),
    #[structopt(name = "get")]
    /// Get a single resource by ID.
    Get(Get),
    #[structopt(name = "extract")]
    /// Extract the entire archive to a directory.
    Extract(Extract),
    #[structopt(name = "merge")]
    /// Add the .slp and .wav files in a directory to an archive.
    Merge(Merge),
}

#[derive(StructOpt)]
struct List {
    #[structopt(parse(from_os_str))]
    /// Path to the .drs archive.
    archive: PathBuf,
}

#[derive(StructOpt)]
struct Get {
    /// Path to the .drs archive.
    #[structopt(parse(from_os_str))]
    archive: PathBuf,
    /// The ID of the resource.
    #[structopt(name = "resource")]
    resource_id: u32,
}

#[derive(StructOpt)]
struct Extract {
    /// Path to the .drs archive.
    #[structopt(parse(from_os_str))]
    archive: PathBuf,
    /// Only extract resources from this table.
    #[structopt(long, short = "t")]
    table: Option<String>,
    /// Output directory to place the resources in.
    #[structopt(long, short = "o", parse(from_os_str))]
    out: PathBuf,
}

#[derive(StructOpt)]
struct Merge {
    /// Path to the .drs archive.
    #[structopt(parse(from_os_str))]
    archive: PathBuf,
    /// Directory with `<id>.slp` and `<id>.wav` files to add.
    #[structopt(parse(from_os_str))]
    files: PathBuf,
    /// Path to place the merged .drs archive.
    #[structopt(long, short = "o", parse(from_os_str))]
    output: PathBuf,
    /// Replace overridden files instead of keeping them under shifted IDs.
    #[structopt(long)]
    no_remap: bool,
}

fn list(args: List) -> anyhow::Result<()> {
    let drs = DRSReader::open(&args.archive)?;

    for table in drs.read_tables()? {
        for resource in drs.read_files(&table)? {
            println!("{}.{}", resource.id, table.resource_ext());
        }
    }

    Ok(())
}

fn get(args: Get) -> anyhow::Result<()> {
    let drs = DRSReader::open(&args.archive)?;

    for table in drs.read_tables()? {
        if let Some(resource) = drs.get_resource(table.resource_type, args.resource_id)? {
            stdout().write_all(drs.resource_bytes(&resource)?)?;
            return Ok(());
        }
    }

    bail!("Archive does not contain resource {}", args.resource_id)
}

fn extract(args: Extract) -> anyhow::Result<()> {
    let drs = DRSReader::open(&args.archive)?;

    create_dir_all(&args.out)?;

    for table in drs.read_tables()? {
        let table_ext = table.resource_ext();
        if let Some(ref filter_ext) = args.table {
            if &table_ext != filter_ext {
                continue;
            }
        }

        for resource in drs.read_files(&table)? {
            let path = args.out.join(format!("{}.{}", resource.id, table_ext));
            let mut outfile =
                File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            outfile.write_all(drs.resource_bytes(&resource)?)?;
        }
    }

    Ok(())
}

fn merge(args: Merge) -> anyhow::Result<()> {
    let drs = DRSReader::open(&args.archive)?;
    let overrides = ResourceIndex::from_dir(&args.files)?;
    let rule = if args.no_remap {
        RemapRule::none()
    } else {
        RemapRule::default()
    };

    let mut writer = DRSWriter::new(File::create(&args.output)?);
    let stats = merge_archive(&drs, &mut writer, &overrides, &rule)?;
    writer.commit()?;

    println!(
        "{} files copied ({} kept under a new ID), {} added",
        stats.copied, stats.remapped, stats.overrides
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG")
        .ok()
        .and_then(|value| match value.as_str() {
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            _ => None,
        })
        .unwrap_or(LevelFilter::Warn);
    TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let args = Cli::from_args();

    match args.command {
        Command::List(args) => list(args),
        Command::Get(args) => get(args),
        Command::Extract(args) => extract(args),
        Command::Merge(args) => merge(args),
    }
}
