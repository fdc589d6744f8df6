use bucket_td::heuristic_elimination_order::OrderingStrategy;
use bucket_td::io::{InputFormat, OutputFormat};
use bucket_td::logging::{build_pace_logger_for_level, level_for};
use bucket_td::signals;
use bucket_td::Solver;
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{stdin, stdout, BufReader, BufWriter};
use std::path::PathBuf;
use structopt::StructOpt;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bucket-td-cli",
    about = "Computes tree decompositions of hypergraphs by bucket elimination."
)]
struct Opt {
    /// Input file. `stdin` if not specified.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Output file. `stdout` if not specified.
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Input format.
    #[structopt(long = "input", default_value = "gr", possible_values = InputFormat::VARIANTS)]
    input_format: InputFormat,

    /// Output format.
    #[structopt(long = "output", default_value = "td", possible_values = OutputFormat::VARIANTS)]
    output_format: OutputFormat,

    /// Elimination ordering heuristic.
    #[structopt(long, default_value = "min-fill", possible_values = OrderingStrategy::VARIANTS)]
    strategy: OrderingStrategy,

    /// Seed for tie-breaking between equally good vertices.
    #[structopt(long)]
    seed: Option<u64>,

    /// Number of decompositions to compute; 0 runs until interrupted.
    #[structopt(long, default_value = "1")]
    iterations: usize,

    /// Stop after this many iterations without improvement.
    #[structopt(long)]
    patience: Option<usize>,

    /// Keep bags that are subsets of a neighboring bag.
    #[structopt(long)]
    no_compress: bool,

    /// Print the width of every improved decomposition as a comment line.
    #[structopt(long)]
    print_opt_progress: bool,

    /// Log debug output.
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();
    if let Err(e) = build_pace_logger_for_level(level_for(opt.verbose)) {
        eprintln!("c could not install logger: {}", e);
    }
    if let Err(e) = signals::initialize() {
        warn!("could not install ctrl-c handler: {}", e);
    }

    let graph = match &opt.input {
        Some(path) => opt.input_format.read(BufReader::new(File::open(path)?))?,
        None => {
            let stdin = stdin();
            let reader = stdin.lock();
            opt.input_format.read(reader)?
        }
    };
    info!(
        "read hypergraph with {} vertices and {} hyperedges",
        graph.num_vertices(),
        graph.num_edges()
    );

    let iterations = match opt.iterations {
        0 => None,
        n => Some(n),
    };
    let print_opt_progress = opt.print_opt_progress;
    let td = Solver::default()
        .strategy(opt.strategy)
        .seed(opt.seed)
        .iterations(iterations)
        .patience(opt.patience)
        .compress(!opt.no_compress)
        .solve_with_progress(&graph, |iteration, td| {
            if print_opt_progress {
                println!("c iteration {}: width {}", iteration, td.width());
            }
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    match opt.output {
        Some(path) => {
            let writer = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            opt.output_format.write(&td, &graph, BufWriter::new(writer))
        }
        None => {
            let stdout = stdout();
            let writer = stdout.lock();
            opt.output_format.write(&td, &graph, writer)
        }
    }
}
