use clap::{Parser, Subcommand, ValueEnum};
use sched_core::generate::GenSpec;
use std::path::PathBuf;
use types::{Algorithm, SolveParams};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Weekly course timetabling for university groups", long_about = None)]
pub struct Args {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a timetable for an instance
    Solve(SolveArgs),
    /// Check an instance for structural errors without solving it
    Validate {
        /// Instance JSON; stdin when omitted or `-`
        input: Option<PathBuf>,
    },
    /// Re-check a produced timetable against its instance
    Verify {
        input: PathBuf,
        output: PathBuf,
    },
    /// Print the JSON Schema of the solver input or output
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Input)]
        kind: SchemaKind,
    },
    /// Write a synthetic instance
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
pub struct SolveArgs {
    /// Instance JSON; stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Where to write the result; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, env = "TIMETABLE__SOLVER__ALGORITHM")]
    pub algorithm: Option<AlgorithmArg>,

    /// Wall-clock budget for the search
    #[arg(long, env = "TIMETABLE__SOLVER__TIME_LIMIT_MS")]
    pub time_limit_ms: Option<u64>,

    /// Advise on (group, day) pairs with fewer classes than this
    #[arg(long)]
    pub min_daily_classes: Option<u32>,

    #[arg(long)]
    pub pretty: bool,
}

impl SolveArgs {
    /// Flags given on the command line win over params carried in the file.
    pub fn apply(&self, params: &mut SolveParams) {
        if let Some(a) = self.algorithm {
            params.algorithm = a.into();
        }
        if let Some(ms) = self.time_limit_ms {
            params.time_limit_ms = Some(ms);
        }
        if let Some(min) = self.min_daily_classes {
            params.min_daily_classes = Some(min);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Backtracking,
    Greedy,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(a: AlgorithmArg) -> Self {
        match a {
            AlgorithmArg::Backtracking => Algorithm::Backtracking,
            AlgorithmArg::Greedy => Algorithm::Greedy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    Input,
    Output,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Emit the fixed ten-term catalogue instead of a random campus
    #[arg(long, conflicts_with = "seed")]
    pub large: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 2)]
    pub terms: u32,

    #[arg(long, default_value_t = 1)]
    pub groups_per_term: u32,

    #[arg(long, default_value_t = 3)]
    pub subjects_per_term: u32,

    #[arg(long, default_value_t = 4)]
    pub teachers: u32,

    #[arg(long, default_value_t = 2)]
    pub teachers_per_subject: u32,

    /// Share of teaching cells marked available, 0.0 to 1.0
    #[arg(long, default_value_t = 0.8)]
    pub availability: f64,

    #[arg(long, default_value_t = 15)]
    pub max_weekly_hours: u32,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub pretty: bool,
}

impl GenerateArgs {
    pub fn spec(&self) -> GenSpec {
        GenSpec {
            terms: self.terms,
            groups_per_term: self.groups_per_term,
            subjects_per_term: self.subjects_per_term,
            teachers: self.teachers,
            teachers_per_subject: self.teachers_per_subject,
            availability: self.availability,
            max_weekly_hours: self.max_weekly_hours,
        }
    }
}
