use bf_core::Real;
use bf_fem::{
    AssemblyContext, ElementFe, FemError, VariableRegistry, central_difference_jacobian,
    forward_difference_jacobian,
};
use bf_physics::{
    AssemblyRequest, AveragedTurbine, BladeElement, InputFile, Pass, Physics, PhysicsError,
    PhysicsModel, PhysicsRegistry, assemble_elements, assemble_nonlocal,
};
use clap::{Args, Parser, Subcommand};
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bladeflow")]
#[command(about = "BladeFlow CLI - averaged turbine element evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an input file by building every enabled physics
    Validate {
        /// Path to the input YAML file
        input: PathBuf,
    },
    /// Evaluate residual and Jacobian at a single point
    Element {
        #[command(flatten)]
        state: PointState,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compare the analytic Jacobian with central differences of the residual
    Check {
        #[command(flatten)]
        state: PointState,
        /// Relative perturbation size
        #[arg(long, default_value_t = 1e-7)]
        delta: f64,
        /// Allowed error, relative to the largest Jacobian entry
        #[arg(long, default_value_t = 1e-5)]
        tol: f64,
        /// One-sided differences (half the residual evaluations, first order)
        #[arg(long)]
        forward: bool,
    },
}

#[derive(Args)]
struct PointState {
    /// Path to the input YAML file
    input: PathBuf,
    /// Velocity components u,v[,w]; their count sets the mesh dimension
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
    velocity: Vec<f64>,
    /// Rotor speed; defaults to the turbine's initial speed
    #[arg(long, allow_negative_numbers = true)]
    speed: Option<f64>,
    /// Evaluation point x,y[,z]
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, default_value = "0,0,0")]
    point: Vec<f64>,
    /// Evaluation time
    #[arg(long, default_value_t = 0.0)]
    time: f64,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Fem(#[from] FemError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Jacobian check failed: max error {max_error:e} exceeds {allowed:e}")]
    CheckFailed { max_error: Real, allowed: Real },
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Element { state, json } => cmd_element(&state, json),
        Commands::Check {
            state,
            delta,
            tol,
            forward,
        } => cmd_check(&state, delta, tol, forward),
    }
}

fn load_models(path: &Path) -> CliResult<Vec<PhysicsModel>> {
    let input = InputFile::from_path(path)?;
    let registry = PhysicsRegistry::default();
    let mut models = registry.build_enabled(&input)?;
    if models.is_empty() {
        models.push(registry.build(AveragedTurbine::KIND, &input)?);
    }
    Ok(models)
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating input: {}", path.display());
    let models = load_models(path)?;
    for model in &models {
        match model.as_averaged_turbine() {
            Some(t) => println!(
                "  {} (I = {} kg·m², initial speed = {} rad/s)",
                t.name(),
                t.params().moment_of_inertia.value,
                t.initial_speed().value
            ),
            None => println!("  {}", model.name()),
        }
    }
    println!("✓ Input is valid");
    Ok(())
}

/// One physics system evaluated on a single point with φ = 1, JxW = 1.
struct PointSystem {
    models: Vec<PhysicsModel>,
    ctx: AssemblyContext,
    labels: Vec<String>,
    velocity: Vector3<Real>,
    speed: Real,
}

impl PointSystem {
    fn new(state: &PointState) -> CliResult<Self> {
        let dim = state.velocity.len();
        if !(2..=3).contains(&dim) {
            return Err(CliError::Usage(format!(
                "--velocity needs 2 or 3 components, got {dim}"
            )));
        }
        let point = match state.point.as_slice() {
            &[x, y] => Point3::new(x, y, 0.0),
            &[x, y, z] => Point3::new(x, y, z),
            other => {
                return Err(CliError::Usage(format!(
                    "--point needs 2 or 3 components, got {}",
                    other.len()
                )));
            }
        };

        let mut models = load_models(&state.input)?;
        let mut registry = VariableRegistry::new(dim)?;
        for model in &mut models {
            model.register_variables(&mut registry)?;
            model.mark_time_evolving(&mut registry)?;
        }

        let turbine = models
            .iter()
            .find_map(PhysicsModel::as_averaged_turbine)
            .ok_or_else(|| CliError::Usage("no averaged turbine enabled".into()))?;
        let flow = turbine
            .flow_vars()
            .ok_or_else(|| CliError::Usage("turbine variables not registered".into()))?
            .clone();
        let fan = turbine
            .fan_speed_var()
            .ok_or_else(|| CliError::Usage("turbine variables not registered".into()))?;
        let speed = state.speed.unwrap_or(turbine.initial_speed().value);

        let mut ctx = AssemblyContext::new(&registry, ElementFe::single_point(point));
        ctx.set_time(state.time);
        let mut velocity = Vector3::zeros();
        for (c, (&var, &value)) in flow.components().iter().zip(&state.velocity).enumerate() {
            ctx.set_solution(var, &[value])?;
            velocity[c] = value;
        }
        ctx.set_solution(fan, &[speed])?;

        let labels = registry.iter().map(|(_, v)| v.name.clone()).collect();
        info!(dim, speed, "single-point system ready");
        Ok(Self {
            models,
            ctx,
            labels,
            velocity,
            speed,
        })
    }

    fn turbine(&self) -> Option<&AveragedTurbine> {
        self.models.iter().find_map(PhysicsModel::as_averaged_turbine)
    }

    /// Time-derivative pass: element plus nonlocal terms into `ctx`.
    fn assemble_into(&self, ctx: &mut AssemblyContext, compute_jacobian: bool) -> CliResult<()> {
        let request = AssemblyRequest {
            pass: Pass::TimeDerivative,
            compute_jacobian,
        };
        ctx.zero_local();
        assemble_elements(&self.models, std::slice::from_mut(ctx), request)?;
        assemble_nonlocal(&self.models, ctx, request)?;
        Ok(())
    }

    fn residual_at(&self, solution: &DVector<Real>) -> CliResult<DVector<Real>> {
        let mut ctx = self.ctx.clone();
        ctx.set_solution_vector(solution)?;
        self.assemble_into(&mut ctx, false)?;
        Ok(ctx.local().residual.clone())
    }

    fn blade(&self) -> Option<BladeElement> {
        let data = self.ctx.data();
        let point = data.fe().xyz[0];
        self.turbine().map(|t| {
            t.blade_model()
                .evaluate(&point, data.time(), &self.velocity, self.speed, false)
        })
    }
}

#[derive(Serialize)]
struct BladeReport {
    active: bool,
    angle: Real,
    c_lift: Real,
    c_drag: Real,
    lift: Real,
    drag: Real,
    force: [Real; 3],
    torque_density: Real,
}

impl From<&BladeElement> for BladeReport {
    fn from(e: &BladeElement) -> Self {
        Self {
            active: e.is_active(),
            angle: e.angle,
            c_lift: e.c_lift,
            c_drag: e.c_drag,
            lift: e.lift,
            drag: e.drag,
            force: e.force.into(),
            torque_density: e.torque_density(),
        }
    }
}

#[derive(Serialize)]
struct ElementReport {
    variables: Vec<String>,
    residual: Vec<Real>,
    jacobian: Vec<Vec<Real>>,
    blade: Option<BladeReport>,
}

fn rows(m: &DMatrix<Real>) -> Vec<Vec<Real>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

fn cmd_element(state: &PointState, json: bool) -> CliResult<()> {
    let mut system = PointSystem::new(state)?;
    let mut ctx = system.ctx.clone();
    system.assemble_into(&mut ctx, true)?;
    system.ctx = ctx;

    let local = system.ctx.local();
    let report = ElementReport {
        variables: system.labels.clone(),
        residual: local.residual.iter().copied().collect(),
        jacobian: rows(&local.jacobian),
        blade: system.blade().as_ref().map(BladeReport::from),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(b) = &report.blade {
        println!("Blade element:");
        println!("  active          {}", b.active);
        println!("  angle           {:.6}", b.angle);
        println!("  C_lift, C_drag  {:.6}, {:.6}", b.c_lift, b.c_drag);
        println!("  lift, drag      {:.6e}, {:.6e}", b.lift, b.drag);
        println!(
            "  force           ({:.6e}, {:.6e}, {:.6e})",
            b.force[0], b.force[1], b.force[2]
        );
        println!("  torque density  {:.6e}", b.torque_density);
    }
    println!("Residual:");
    for (name, r) in report.variables.iter().zip(&report.residual) {
        println!("  {name:>12}  {r:>14.6e}");
    }
    println!("Jacobian:");
    print!("  {:>12}", "");
    for name in &report.variables {
        print!("  {name:>14}");
    }
    println!();
    for (name, row) in report.variables.iter().zip(&report.jacobian) {
        print!("  {name:>12}");
        for v in row {
            print!("  {v:>14.6e}");
        }
        println!();
    }
    Ok(())
}

fn cmd_check(state: &PointState, delta: f64, tol: f64, forward: bool) -> CliResult<()> {
    let system = PointSystem::new(state)?;

    let mut ctx = system.ctx.clone();
    system.assemble_into(&mut ctx, true)?;
    let analytic = ctx.local().jacobian.clone();
    let x = system.ctx.data().solution();
    let residual = |x: &DVector<Real>| system.residual_at(x);
    let numeric = if forward {
        forward_difference_jacobian(x, residual, delta)?
    } else {
        central_difference_jacobian(x, residual, delta)?
    };

    let error = &analytic - &numeric;
    println!("Max abs column error:");
    for (name, col) in system.labels.iter().zip(error.column_iter()) {
        println!("  {name:>12}  {:>12.3e}", col.amax());
    }
    let max_error = error.amax();
    let allowed = tol * (1.0 + numeric.amax());
    println!("Overall: {max_error:.3e} (allowed {allowed:.3e})");

    if max_error > allowed {
        return Err(CliError::CheckFailed { max_error, allowed });
    }
    println!("✓ Jacobian consistent with residual");
    Ok(())
}
