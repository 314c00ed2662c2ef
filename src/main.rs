use anyhow::Result;
use clap::Parser;
use filmograph_network::config::Config;
use filmograph_network::data::loader;
use filmograph_network::pipeline;
use filmograph_network::storage::{self, EgoSelection, ExportOptions};

#[derive(Parser, Debug)]
#[clap(
    name = "filmograph-network",
    about = "Collaboration network and community analysis of film credits"
)]
struct Cli {
    /// Path to input CSV or Parquet file of participation records
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "network_results")]
    output_dir: String,

    /// Modularity resolution (higher values give smaller communities)
    #[clap(long, default_value = "1.0")]
    resolution: f64,

    /// Maximum aggregation levels in community detection
    #[clap(long, default_value = "10")]
    max_levels: usize,

    /// Maximum local-moving passes per level
    #[clap(long, default_value = "100")]
    max_passes: usize,

    /// Only the first N credited participants of a movie generate collaborations
    #[clap(long)]
    max_cast_size: Option<usize>,

    /// Movies embedded per link in network_data.json
    #[clap(long, default_value = "5")]
    link_movie_sample: usize,

    /// Movies embedded per link in ego documents (default: all)
    #[clap(long)]
    ego_movie_cap: Option<usize>,

    /// Size of top-K lists in the summary
    #[clap(long, default_value = "5")]
    top_k: usize,

    /// Export ego networks only for these person ids (repeatable)
    #[clap(long)]
    center: Vec<String>,

    /// Skip ego network export
    #[clap(long)]
    skip_ego: bool,

    /// Skip GraphML export
    #[clap(long)]
    skip_graphml: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            max_cast_size: self.max_cast_size,
            link_movie_sample: self.link_movie_sample,
            ego_movie_cap: self.ego_movie_cap,
            top_k: self.top_k,
            ..Config::new(self.resolution, self.max_levels, self.max_passes)
        }
    }

    fn export_options(&self, config: &Config) -> ExportOptions {
        let ego = if self.skip_ego {
            EgoSelection::Skip
        } else if !self.center.is_empty() {
            EgoSelection::Centers(self.center.clone())
        } else {
            EgoSelection::All
        };

        ExportOptions {
            graphml: !self.skip_graphml,
            ego,
            ..ExportOptions::from_config(config)
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = args.config();
    config.validate()?;

    log::info!("Starting collaboration network analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let records = loader::load_participation_records(&args.input)?;

    // 2. Index, build, detect communities, compute statistics
    let analysis = pipeline::run(&records, &config)?;
    analysis.stats.log_summary();

    // 3. Save results
    let options = args.export_options(&config);
    storage::save_results(&analysis.graph, &analysis.stats, &options, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
