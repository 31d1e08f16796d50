//! `mrreduce` - run reduce partitions from the command line.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ironreduce::driver::{ExecMode, JobSpec, run_job};
use ironreduce::logging::init_logging;
use ironreduce::ordering::KeyOrderKind;
use ironreduce::reducers::{Count, DistinctJoin, Indexer, Join, Reducer, SumI64};
use ironreduce::{PartitionDescriptor, ReduceConfig, ReduceTask, do_reduce};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Merge, sort, group and reduce intermediate files
#[derive(Parser)]
#[command(name = "mrreduce")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce a single partition
    Partition {
        /// Job name used in file names
        #[arg(long)]
        job: String,

        /// Partition index
        #[arg(short, long)]
        partition: usize,

        /// Number of source (map) files for the partition
        #[arg(short = 'n', long)]
        sources: usize,

        /// Output file (defaults to mrtmp.<job>-res-<partition> in the input dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Reduce every partition of a job
    Job {
        /// Job name used in file names
        #[arg(long)]
        job: String,

        /// Number of source (map) files per partition
        #[arg(short = 'n', long)]
        sources: usize,

        /// Number of reduce partitions
        #[arg(short = 'r', long)]
        partitions: usize,

        /// Directory for result files (defaults to the input dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run partitions concurrently
        #[arg(long)]
        parallel: bool,

        /// Worker threads when running in parallel
        #[arg(long, requires = "parallel")]
        threads: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Directory holding the intermediate files (overrides IRONREDUCE_INPUT_DIR)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Aggregation applied to each key's values
    #[arg(long, value_enum, default_value_t = ReducerKind::Join)]
    reducer: ReducerKind,

    /// Separator for the join and distinct reducers
    #[arg(long, default_value = ",")]
    separator: String,

    /// Key order: numeric, lexicographic or numeric-then-lexicographic
    /// (overrides IRONREDUCE_KEY_ORDER)
    #[arg(long)]
    key_order: Option<KeyOrderKind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReducerKind {
    Count,
    Join,
    Sum,
    Distinct,
    Indexer,
}

impl CommonArgs {
    fn config(&self) -> Result<ReduceConfig> {
        let mut cfg = ReduceConfig::from_env().context("read configuration from environment")?;
        if let Some(dir) = &self.input_dir {
            cfg.input_dir = dir.clone();
        }
        if let Some(order) = self.key_order {
            cfg.key_order = order;
        }
        Ok(cfg)
    }

    fn reducer(&self) -> Box<dyn Reducer> {
        match self.reducer {
            ReducerKind::Count => Box::new(Count),
            ReducerKind::Join => Box::new(Join::new(self.separator.clone())),
            ReducerKind::Sum => Box::new(SumI64),
            ReducerKind::Distinct => Box::new(DistinctJoin::new(self.separator.clone())),
            ReducerKind::Indexer => Box::new(Indexer),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    match cli.command {
        Commands::Partition {
            job,
            partition,
            sources,
            output,
            common,
        } => {
            let cfg = common.config()?;
            let output = output.unwrap_or_else(|| {
                PartitionDescriptor::new(job.clone(), sources, partition).result_path(&cfg.input_dir)
            });
            let task = ReduceTask::new(job, partition, sources, output);
            let summary = do_reduce(&task, &cfg, common.reducer().as_ref())?;
            info!(
                "partition {} done: {} records, {} keys -> {}",
                summary.partition,
                summary.input_records,
                summary.output_records,
                summary.output.display()
            );
        }
        Commands::Job {
            job,
            sources,
            partitions,
            output_dir,
            parallel,
            threads,
            common,
        } => {
            let cfg = common.config()?;
            let spec = JobSpec::new(job, sources, partitions)
                .with_output_dir(output_dir.unwrap_or_else(|| cfg.input_dir.clone()))
                .with_input_dir(cfg.input_dir.clone());
            let mode = if parallel {
                ExecMode::Parallel { threads }
            } else {
                ExecMode::Sequential
            };
            let report = run_job(&spec, cfg.key_order.policy(), common.reducer().as_ref(), mode)?;

            let failed: Vec<_> = report.failures().collect();
            for (partition, e) in &failed {
                error!("partition {partition} failed: {e}");
            }
            if !failed.is_empty() {
                bail!("{} of {} partitions failed", failed.len(), partitions);
            }
            info!("all {partitions} partitions done");
        }
    }
    Ok(())
}
