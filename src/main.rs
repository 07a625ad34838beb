use std::io::Write;

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;

use bwt_index::{FMIndex, IndexOpt, DEFAULT_OCC_BLOCK};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "bwt-index",
    author,
    version,
    about = "Burrows-Wheeler transform, FM-index exact search and inversion",
    arg_required_else_help = true
)]
struct Cli {
    /// Log verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Sentinel symbol terminating the sequence (ASCII)
    #[arg(long, default_value_t = '$', global = true)]
    sentinel: char,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, PartialEq, Eq)]
#[group(required = true, multiple = false)]
struct Source {
    /// Sequence given on the command line
    #[arg(value_name = "SEQ")]
    seq: Option<String>,
    /// Read the sequence from a file instead (whitespace is stripped)
    #[arg(short, long)]
    input: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Burrows-Wheeler transform of a sequence
    Transform {
        #[command(flatten)]
        source: Source,
        /// Append the sentinel instead of requiring it in the input
        #[arg(long)]
        append_sentinel: bool,
        /// Also print the suffix array
        #[arg(long)]
        sa: bool,
    },
    /// Find every start offset of each pattern (exact match)
    Search {
        /// SEQ followed by the patterns to look up; only patterns when --input is given
        #[arg(value_name = "SEQ|PATTERN", required = true)]
        args: Vec<String>,
        /// Read the sequence from a file instead (whitespace is stripped)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        append_sentinel: bool,
        /// Occ sampling interval (1 = full table)
        #[arg(long = "occ-block", default_value_t = DEFAULT_OCC_BLOCK)]
        occ_block: usize,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Recover the original sequence from its transform
    Invert {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    let sentinel = u8::try_from(cli.sentinel)
        .map_err(|_| anyhow!("sentinel '{}' is not a single-byte symbol", cli.sentinel))?;

    match cli.command {
        Commands::Transform { source, append_sentinel, sa } => {
            let seq = read_sequence(&source, sentinel, append_sentinel)?;
            run_transform(&seq, sentinel, sa)
        }
        Commands::Search { args, input, append_sentinel, occ_block, threads } => {
            let (source, patterns) = split_search_args(input, args)?;
            let seq = read_sequence(&source, sentinel, append_sentinel)?;
            let opt = IndexOpt { sentinel, occ_block, alphabet: None };
            run_search(&seq, &patterns, &opt, threads)
        }
        Commands::Invert { source } => {
            let bwt = read_sequence(&source, sentinel, false)?;
            run_invert(&bwt, sentinel)
        }
    }
}

/// 日志写到 stderr，带时间戳与模块路径
fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                record.level(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.module_path().unwrap_or("-"),
                record.args()
            )
        })
        .try_init();
}

fn read_sequence(source: &Source, sentinel: u8, append_sentinel: bool) -> Result<Vec<u8>> {
    let raw = match (&source.seq, &source.input) {
        (Some(s), _) => s.as_bytes().to_vec(),
        (None, Some(path)) => std::fs::read(path)
            .map_err(|e| anyhow!("cannot read sequence file '{}': {}", path, e))?,
        (None, None) => bail!("either SEQ or --input is required"),
    };
    let mut seq: Vec<u8> = raw.into_iter().filter(|b| !b.is_ascii_whitespace()).collect();
    if append_sentinel {
        seq.push(sentinel);
    }
    log::info!("sequence: {} symbols", seq.len());
    Ok(seq)
}

/// search 的位置参数：无 --input 时第一个是序列，其余是模式串
fn split_search_args(input: Option<String>, mut args: Vec<String>) -> Result<(Source, Vec<String>)> {
    let source = match input {
        Some(path) => Source { seq: None, input: Some(path) },
        None if args.is_empty() => bail!("missing SEQ"),
        None => Source { seq: Some(args.remove(0)), input: None },
    };
    if args.is_empty() {
        bail!("at least one PATTERN is required");
    }
    Ok((source, args))
}

fn format_hits(pattern: &str, positions: &[usize]) -> String {
    let list: Vec<String> = positions.iter().map(usize::to_string).collect();
    format!("{}\t{}", pattern, list.join(","))
}

fn run_transform(seq: &[u8], sentinel: u8, show_sa: bool) -> Result<()> {
    let idx = FMIndex::build(seq, &IndexOpt { sentinel, ..IndexOpt::default() })?;
    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    out.write_all(&idx.transform())?;
    writeln!(out)?;
    if show_sa {
        let sa: Vec<String> = idx.suffix_array().iter().map(u32::to_string).collect();
        writeln!(out, "{}", sa.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn run_search(seq: &[u8], patterns: &[String], opt: &IndexOpt, threads: usize) -> Result<()> {
    let idx = FMIndex::build(seq, opt)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow!("cannot start {} search threads: {}", threads, e))?;
    let hits = pool.install(|| idx.search_many(patterns));
    log::info!("searched {} patterns with {} threads", patterns.len(), pool.current_num_threads());

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    for (pat, pos) in patterns.iter().zip(&hits) {
        writeln!(out, "{}", format_hits(pat, pos))?;
    }
    out.flush()?;
    Ok(())
}

fn run_invert(bwt: &[u8], sentinel: u8) -> Result<()> {
    let seq = bwt_index::invert(bwt, sentinel)?;
    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    out.write_all(&seq)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
