mod cat;
mod device;
mod dump;
mod info;
mod list;

use clap::Parser;

#[derive(Debug, clap::Args)]
struct List {
    /// Specify path to list, default to root directory
    #[clap(default_value = "/")]
    path: String,
}

#[derive(Debug, clap::Args)]
struct Cat {
    /// Specify path to concatenate
    path: String,
}

#[derive(Debug, clap::Args)]
struct Dump {
    /// Specify path to hex dump
    path: String,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// Show boot sector and geometry of volume
    Info,
    /// List file and directory in specified path
    #[clap(name = "ls")]
    List(List),
    /// Concatenate file and print on the standard output
    Cat(Cat),
    /// Print file as hex dump
    Dump(Dump),
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long)]
    quiet: bool,
    #[clap(short, action = clap::ArgAction::Count)]
    verbosity: u8,
    /// Disk image or block device formatted with FAT12/16/32
    #[clap(short, long)]
    device: String,
    /// Byte offset of volume within device
    #[clap(long)]
    offset: Option<u64>,
    /// MBR partition index of volume
    #[clap(short, long)]
    partition: Option<usize>,
    #[clap(subcommand)]
    action: Action,
}

fn main() {
    let args = Args::parse();
    let level = match (args.quiet, args.verbosity) {
        (true, _) => log::LevelFilter::Off,
        (_, 0) => log::LevelFilter::Info,
        (_, 1) => log::LevelFilter::Debug,
        (_, _) => log::LevelFilter::Trace,
    };
    log::set_max_level(level);
    env_logger::builder().filter(None, level).target(env_logger::Target::Stderr).init();

    let fs = match device::open(&args.device, args.offset, args.partition) {
        Ok(fs) => fs,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };

    let result = match args.action {
        Action::Info => info::info(&fs),
        Action::List(args) => list::list(&fs, &args.path),
        Action::Cat(args) => cat::cat(&fs, &args.path),
        Action::Dump(args) => dump::dump(&fs, &args.path),
    };
    if let Some(error) = result.err() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
