use anyhow::Context;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::{fs, fs::File, path::PathBuf};
use structopt::StructOpt;
use wololo::drs::{merge_archive, RemapRule};
use wololo::patch::{parse_flag_offsets, validate_references, FlagOffset};
use wololo::{DRSReader, DRSWriter, DatFile, PatchContext, Pipeline};

#[derive(StructOpt)]
struct Cli {
    /// Data file snapshot to patch.
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Where to save the patched data file.
    #[structopt(parse(from_os_str))]
    output: PathBuf,
    /// Directories with the SLP files of graphics that get copied, in search order.
    #[structopt(long, short = "g", parse(from_os_str), number_of_values = 1)]
    graphics: Vec<PathBuf>,
    /// Flag offset table to apply before separating architectures.
    #[structopt(long, parse(from_os_str))]
    flags: Option<PathBuf>,
    /// Flag offset table to apply after separating architectures.
    #[structopt(long, parse(from_os_str))]
    civ_flags: Option<PathBuf>,
    /// Graphics archive to add the new SLP files to.
    #[structopt(long, parse(from_os_str), requires = "drs-out")]
    drs: Option<PathBuf>,
    /// Where to save the updated graphics archive.
    #[structopt(long, parse(from_os_str))]
    drs_out: Option<PathBuf>,
}

fn read_flags(path: Option<&PathBuf>) -> anyhow::Result<Vec<FlagOffset>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(parse_flag_offsets(&text)?)
        }
        None => Ok(vec![]),
    }
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
    let dat = DatFile::load(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut ctx = args
        .graphics
        .iter()
        .fold(PatchContext::new(dat), |ctx, dir| ctx.with_graphics_dir(dir))
        .with_flags(
            read_flags(args.flags.as_ref())?,
            read_flags(args.civ_flags.as_ref())?,
        );

    Pipeline::default().run(&mut ctx)?;
    validate_references(&ctx.dat)?;

    let (dat, overrides) = ctx.into_parts();
    dat.save(&args.output)?;
    println!("saved {}", args.output.display());

    match (&args.drs, &args.drs_out) {
        (Some(input), Some(output)) => {
            let drs = DRSReader::open(input)?;
            let mut writer = DRSWriter::new(File::create(output)?);
            let stats = merge_archive(&drs, &mut writer, &overrides, &RemapRule::default())?;
            writer.commit()?;
            println!("added {} graphics to {}", stats.overrides, output.display());
        }
        _ if !overrides.is_empty() => {
            println!("{} new graphics were not saved, pass --drs and --drs-out", overrides.len());
        }
        _ => {}
    }
    Ok(())
}
