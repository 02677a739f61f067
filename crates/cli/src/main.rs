mod cli;
mod dispatch;
mod io;
mod telemetry;

use clap::Parser;
use cli::{Args, Command, GenerateArgs, SchemaKind, SolveArgs};
use dispatch::DispatchSolver;
use sched_core::{generate, validate, verify::verify, Solver, ValidationError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use types::{SolveEnvelope, SolverInput, SolverOutput};

#[derive(Serialize)]
struct ValidationReport {
    ok: bool,
    errors: Vec<String>,
}

async fn run_solve(args: SolveArgs) -> anyhow::Result<ExitCode> {
    let mut env: SolveEnvelope = io::read_json(args.input.as_ref())?;
    args.apply(&mut env.params);

    let solver = DispatchSolver::new();
    let token = solver.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping search");
            token.stop();
        }
    });

    let out = solver.solve(env).await?;
    info!(
        status = ?out.status,
        blocks = out.block_count(),
        warnings = out.warnings.len(),
        "solve finished"
    );
    io::write_json(&out, args.output.as_ref(), args.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn run_validate(input: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let inp: SolverInput = io::read_json(input.as_ref())?;
    let report = match validate(&inp) {
        Ok(()) => ValidationReport {
            ok: true,
            errors: vec![],
        },
        Err(ValidationError::Invalid(errors)) => ValidationReport { ok: false, errors },
    };
    io::write_json(&report, None, true)?;
    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_verify(input: PathBuf, output: PathBuf) -> anyhow::Result<ExitCode> {
    let inp: SolverInput = io::read_json(Some(&input))?;
    let out: SolverOutput = io::read_json(Some(&output))?;
    let errors = verify(&inp, &out);
    let report = ValidationReport {
        ok: errors.is_empty(),
        errors,
    };
    io::write_json(&report, None, true)?;
    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_schema(kind: SchemaKind) -> anyhow::Result<ExitCode> {
    let schema = match kind {
        SchemaKind::Input => schemars::schema_for!(SolveEnvelope),
        SchemaKind::Output => schemars::schema_for!(SolverOutput),
    };
    io::write_json(&schema, None, true)?;
    Ok(ExitCode::SUCCESS)
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let inp = if args.large {
        generate::large_seed()
    } else {
        generate::campus(args.seed.unwrap_or(0), &args.spec())
    };
    info!(
        groups = inp.groups.len(),
        subjects = inp.curriculum.len(),
        teachers = inp.teachers.len(),
        "generated instance"
    );
    io::write_json(&inp, args.output.as_ref(), args.pretty)?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    telemetry::init(args.log_json);

    match args.command {
        Command::Solve(a) => run_solve(a).await,
        Command::Validate { input } => run_validate(input),
        Command::Verify { input, output } => run_verify(input, output),
        Command::Schema { kind } => run_schema(kind),
        Command::Generate(a) => run_generate(a),
    }
}
