use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::{fs, path::PathBuf};
use structopt::StructOpt;
use wololo::drs::index_by_name;
use wololo::rms::{text, ConvertOptions, MapConverter, TerrainCatalog};

#[derive(StructOpt)]
struct Cli {
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(name = "file")]
    /// Convert a single map script, and print the result.
    File(ConvertFile),
    #[structopt(name = "dir")]
    /// Convert every map script in a directory.
    Dir(ConvertDir),
}

#[derive(StructOpt)]
struct ConvertFile {
    /// Path to the map script.
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Directory with the HD Edition terrain graphics.
    #[structopt(long, short = "g", parse(from_os_str))]
    graphics: PathBuf,
}

#[derive(StructOpt)]
struct ConvertDir {
    /// Directory with HD Edition map scripts.
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Directory to place the converted maps in.
    #[structopt(parse(from_os_str))]
    output: PathBuf,
    /// Directory with the HD Edition terrain graphics. Searched recursively.
    #[structopt(long, short = "g", parse(from_os_str))]
    graphics: PathBuf,
    /// Replace maps that were converted before.
    #[structopt(long)]
    replace: bool,
}

fn convert_file(args: ConvertFile) -> anyhow::Result<()> {
    let catalog = TerrainCatalog::default();
    let converter = MapConverter::new(&catalog, args.graphics.as_path())?;
    let source = fs::read(&args.input)?;
    let conversion = converter.convert_text(&text::decode(&source))?;
    println!("{}", conversion.script);
    for name in conversion.images.keys() {
        eprintln!("needs {}", name);
    }
    Ok(())
}

fn convert_dir(args: ConvertDir) -> anyhow::Result<()> {
    let graphics = index_by_name(&args.graphics, "slp")?;
    let catalog = TerrainCatalog::default();
    let converter = MapConverter::new(&catalog, &graphics)?;
    fs::create_dir_all(&args.output)?;
    let stats = converter.convert_dir(
        &args.input,
        &args.output,
        ConvertOptions {
            replace: args.replace,
        },
    )?;
    println!(
        "{} converted, {} copied, {} skipped",
        stats.converted, stats.copied, stats.skipped
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

    match Cli::from_args().command {
        Command::File(args) => convert_file(args),
        Command::Dir(args) => convert_dir(args),
    }
}
