//! vna-tdr command-line interface.
//!
//! Run the TDR pipeline on exported VNA sweep files:
//! ```sh
//! vna-tdr time-domain sweep.s2p
//! vna-tdr estimate --reference air.s2p --dut sample.s2p --distance-mm 10
//! vna-tdr track --reference air.s2p --distance-mm 10 day1.s2p day2.s2p
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use vna_tdr::data::loader;
use vna_tdr::{aggregate, estimate, locate_peak, transform, ColumnMapping, PermittivityConfig};

#[derive(Parser)]
#[command(name = "vna-tdr")]
#[command(about = "Time-domain reflectometry permittivity estimation from VNA sweeps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one sweep to its time-domain impulse response (CSV output).
    TimeDomain {
        /// Sweep file to convert.
        file: PathBuf,
        /// Write CSV here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Estimate εᵣ from one DUT sweep against a reference sweep.
    Estimate {
        /// Reference sweep (e.g. the empty fixture).
        #[arg(short, long)]
        reference: PathBuf,
        /// Device-under-test sweep.
        #[arg(short, long)]
        dut: PathBuf,
        #[command(flatten)]
        physical: PhysicalArgs,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Track εᵣ across a batch of DUT files, ordered by file timestamp.
    Track {
        /// Reference sweep shared by the whole batch.
        #[arg(short, long)]
        reference: PathBuf,
        /// DUT sweep files, any order; output is timestamp-sorted.
        #[arg(required = true)]
        duts: Vec<PathBuf>,
        /// Emit the series as JSON instead of CSV.
        #[arg(long)]
        json: bool,
        /// Write the series here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        physical: PhysicalArgs,
        #[command(flatten)]
        sweep: SweepArgs,
    },
}

/// Which S-parameter columns to read and how to grid the transform.
#[derive(Args)]
struct SweepArgs {
    /// S-parameter columns to read from the sweep files.
    #[arg(long, value_enum, default_value_t = Columns::S21)]
    columns: Columns,
    /// Span of the output time grid in nanoseconds.
    #[arg(long, default_value_t = 50.0)]
    time_window_ns: f64,
    /// Number of samples on the output time grid.
    #[arg(long, default_value_t = 100_001)]
    points: usize,
}

#[derive(Args)]
struct PhysicalArgs {
    /// Path length between the ports in millimetres.
    #[arg(long)]
    distance_mm: f64,
    /// εᵣ of the reference medium (1.0 for air).
    #[arg(long, default_value_t = 1.0)]
    reference_permittivity: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Columns {
    S11,
    S21,
}

impl From<Columns> for ColumnMapping {
    fn from(c: Columns) -> Self {
        match c {
            Columns::S11 => ColumnMapping::S11,
            Columns::S21 => ColumnMapping::S21,
        }
    }
}

impl SweepArgs {
    fn config(&self, physical: &PhysicalArgs) -> PermittivityConfig {
        PermittivityConfig {
            distance_mm: physical.distance_mm,
            reference_permittivity: physical.reference_permittivity,
            time_window_ns: self.time_window_ns,
            num_points: self.points,
        }
    }
}

// ---------------------------------------------------------------------------
// Export row shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CurveRow {
    time_ns: f64,
    magnitude: f64,
}

#[derive(Serialize)]
struct SeriesRow {
    timestamp: String,
    epsilon_r: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::TimeDomain {
            file,
            output,
            sweep,
        } => {
            let spectrum = loader::load_sweep(&file, sweep.columns.into())?;
            let signal = transform(&spectrum, sweep.time_window_ns, sweep.points)?;
            let peak = locate_peak(&signal)?;
            info!(
                "peak at {:.3} ns, magnitude {:.4}",
                peak.time * 1e9,
                peak.magnitude
            );

            let rows = signal
                .times
                .iter()
                .zip(&signal.amplitudes)
                .map(|(&t, a)| CurveRow {
                    time_ns: t * 1e9,
                    magnitude: a.norm(),
                });
            write_csv(rows, output)?;
        }

        Commands::Estimate {
            reference,
            dut,
            physical,
            sweep,
        } => {
            let columns: ColumnMapping = sweep.columns.into();
            let ref_spectrum = loader::load_sweep(&reference, columns)?;
            let dut_spectrum = loader::load_sweep(&dut, columns)?;
            let config = sweep.config(&physical);

            let eps = estimate(&dut_spectrum, &ref_spectrum, &config)?;
            println!("εᵣ = {eps:.3}");
        }

        Commands::Track {
            reference,
            duts,
            json,
            output,
            physical,
            sweep,
        } => {
            let columns: ColumnMapping = sweep.columns.into();
            let ref_spectrum = loader::load_sweep(&reference, columns)?;
            let sources = loader::load_batch(&duts, columns)?;
            let config = sweep.config(&physical);

            let series = aggregate(&ref_spectrum, &sources, &config)?;
            info!("tracked {} measurements", series.len());

            let rows: Vec<SeriesRow> = series
                .iter()
                .map(|r| SeriesRow {
                    timestamp: r.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    epsilon_r: r.epsilon_r,
                })
                .collect();

            if json {
                let mut out = open_output(output)?;
                serde_json::to_writer_pretty(&mut out, &rows).context("writing JSON series")?;
                writeln!(out)?;
            } else {
                write_csv(rows.into_iter(), output)?;
            }
        }
    }

    Ok(())
}

fn open_output(path: Option<PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file =
                File::create(&p).with_context(|| format!("creating output file {}", p.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn write_csv<T: Serialize>(rows: impl Iterator<Item = T>, path: Option<PathBuf>) -> Result<()> {
    let out = open_output(path)?;
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}
