use clap::{Args, Parser, Subcommand};
use classic_bloom_rs::{
    BloomError, BloomFilter, BloomFilterConfigBuilder, BloomFilterStats,
    BloomParams, BulkBloomFilterOps, Key,
    common::{bits2hr, format_probability, parse_lines},
    document::{DocumentMetadata, FilterDocument},
    expected_false_positive_rate, optimal_num_hashes,
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the suggested bit-vector size and hash count for a capacity
    Suggest {
        /// Expected number of distinct elements
        #[arg(short, long)]
        capacity: usize,

        /// Target false positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,
    },

    /// Create an empty filter document
    Create {
        /// Path of the document to write
        #[arg(short, long)]
        output: PathBuf,

        /// Expected number of distinct elements
        #[arg(short, long, default_value = "10000")]
        capacity: usize,

        /// Target false positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,

        /// Explicit bit-vector size; overrides the suggested one
        #[arg(short = 'm', long)]
        bits: Option<usize>,

        /// Explicit hash count; overrides the suggested one
        #[arg(short = 'k', long)]
        hashes: Option<usize>,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Insert values into a filter document
    Add {
        /// Filter document
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Test values against a filter document
    Check {
        /// Filter document
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Display shape, fill and estimates of a filter document
    Info {
        /// Filter document
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Combine two filter documents with the same shape
    Merge {
        /// First filter document
        left: PathBuf,

        /// Second filter document
        right: PathBuf,

        /// Path of the document to write
        #[arg(short, long)]
        output: PathBuf,

        /// Intersect instead of taking the union
        #[arg(long)]
        intersection: bool,
    },
}

#[derive(Args)]
struct ValueArgs {
    /// Read newline-separated values from a file, `-` for stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Treat every value as a 64-bit integer key instead of text
    #[arg(long)]
    integers: bool,

    /// Values given directly on the command line
    values: Vec<String>,
}

impl ValueArgs {
    fn read_text(&self) -> io::Result<String> {
        match &self.input {
            Some(path) if path == Path::new("-") => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            Some(path) => std::fs::read_to_string(path),
            None => Ok(self.values.join("\n")),
        }
    }
}

fn parse_integers(values: &[String]) -> Result<Vec<i64>, BloomError> {
    values
        .iter()
        .map(|value| {
            value.parse::<i64>().map_err(|e| {
                BloomError::InvalidParameter(format!(
                    "'{value}' is not an integer: {e}"
                ))
            })
        })
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Suggest { capacity, fpr } => {
            let filter = BloomFilter::with_target_error(*capacity, *fpr)?;
            let m = filter.bit_vector_size();
            let k = filter.num_hashes();
            println!("Suggested parameters for {capacity} elements at {fpr}:");
            println!("  Bit vector size (m): {m}");
            println!("  Hash functions (k): {k}");
            println!("  Memory: {}", bits2hr(m));
            println!(
                "  Projected false positive rate: {}",
                format_probability(expected_false_positive_rate(m, k, *capacity))
            );
        }
        Commands::Create {
            output,
            capacity,
            fpr,
            bits,
            hashes,
            force,
        } => {
            if output.exists() && !*force {
                println!("Error: Document already exists at {}", output.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }

            let config = BloomFilterConfigBuilder::default()
                .capacity(*capacity)
                .false_positive_rate(*fpr)
                .build()?;
            config.validate()?;

            let suggested = BloomParams::from(&config);
            let m = bits.unwrap_or(suggested.bit_vector_size);
            let k = hashes.unwrap_or_else(|| optimal_num_hashes(*capacity, m));
            let filter = BloomFilter::new(m, k)?;

            let metadata = DocumentMetadata {
                insert_count: 0,
                target_error: Some(*fpr),
                expected_count: Some(*capacity),
            };
            FilterDocument::new(&filter, metadata).save(output)?;

            println!("Created new Bloom filter document at {}", output.display());
            println!("  Bit vector size: {}", filter.bit_vector_size());
            println!("  Hash functions: {}", filter.num_hashes());
            println!("  Memory: {}", bits2hr(filter.bit_vector_size()));
        }
        Commands::Add { file, values } => {
            handle_add(file, values)?;
        }
        Commands::Check { file, values } => {
            handle_check(file, values)?;
        }
        Commands::Info { file } => {
            handle_info(file)?;
        }
        Commands::Merge {
            left,
            right,
            output,
            intersection,
        } => {
            let left_document = FilterDocument::load(left)?;
            let right_document = FilterDocument::load(right)?;
            let left_filter = left_document.to_filter()?;
            let right_filter = right_document.to_filter()?;
            let merged = if *intersection {
                BloomFilter::intersection(&left_filter, &right_filter)?
            } else {
                BloomFilter::union(&left_filter, &right_filter)?
            };

            let metadata = DocumentMetadata::merged(
                &left_document.metadata,
                &right_document.metadata,
                *intersection,
            );
            FilterDocument::new(&merged, metadata).save(output)?;
            println!(
                "Wrote {} of {} and {} to {} ({} bits set)",
                if *intersection { "intersection" } else { "union" },
                left.display(),
                right.display(),
                output.display(),
                merged.count_bits()
            );
        }
    }

    Ok(())
}

fn handle_add(
    file: &Path,
    args: &ValueArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut document = FilterDocument::load(file)?;
    let mut filter = document.to_filter()?;

    let parsed = parse_lines(&args.read_text()?, true);
    if parsed.values.is_empty() {
        println!("No values to add. Provide at least one non-empty line.");
        return Ok(());
    }

    let started = Instant::now();
    if args.integers {
        filter.insert_bulk(parse_integers(&parsed.values)?)?;
    } else {
        filter.insert_bulk(parsed.values.iter())?;
    }
    let elapsed = started.elapsed();

    let added = parsed.values.len();
    document.update(&filter, added as u64);
    document.save(file)?;

    info!(
        added,
        skipped_empty = parsed.skipped_empty,
        skipped_duplicates = parsed.skipped_duplicates,
        elapsed_ms = elapsed.as_millis() as u64,
        "Added values"
    );
    println!(
        "Added {added} unique value(s); skipped {} empty and {} duplicates.",
        parsed.skipped_empty, parsed.skipped_duplicates
    );
    println!("  Total inserted: {}", document.metadata.insert_count);
    Ok(())
}

fn handle_check(
    file: &Path,
    args: &ValueArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = FilterDocument::load(file)?.to_filter()?;

    let parsed = parse_lines(&args.read_text()?, false);
    if parsed.values.is_empty() {
        println!("Provide at least one non-empty value to test.");
        return Ok(());
    }

    let results = if args.integers {
        let keys = parse_integers(&parsed.values)?;
        filter.contains_bulk(keys.iter().map(|&value| Key::Integer(value)))?
    } else {
        filter.contains_bulk(parsed.values.iter())?
    };

    for (value, present) in parsed.values.iter().zip(results) {
        let verdict = if present {
            "possibly in set"
        } else {
            "definitely not in set"
        };
        println!("{value}: {verdict}");
    }
    Ok(())
}

fn handle_info(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = FilterDocument::load(file)?;
    let filter = document.to_filter()?;
    let metadata = &document.metadata;

    println!("Bloom Filter Document: {}", file.display());
    println!("  Version: {}", document.version);
    println!("  Bit vector size: {}", filter.bit_vector_size());
    println!("  Hash functions: {}", filter.num_hashes());
    println!("  Memory: {}", bits2hr(filter.bit_vector_size()));
    println!("  Set bits: {}", filter.count_bits());
    println!("  Fill ratio: {:.4}", filter.fill_ratio());
    println!("  Values inserted: {}", metadata.insert_count);
    println!("  Estimated distinct count: {:.1}", filter.estimated_count());
    println!(
        "  Estimated false positive rate: {}",
        format_probability(filter.estimated_false_positive_rate())
    );
    if let Some(target) = metadata.target_error {
        println!("  Target false positive rate: {target}");
    }
    if let Some(expected) = metadata.expected_count {
        println!("  Expected count: {expected}");
        println!(
            "  Projected false positive rate at expected count: {}",
            format_probability(expected_false_positive_rate(
                filter.bit_vector_size(),
                filter.num_hashes(),
                expected
            ))
        );
    }
    Ok(())
}
