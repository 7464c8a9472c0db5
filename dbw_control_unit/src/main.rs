//! # DBW Control Unit
//!
//! Hosts one actuator module (throttle or brake) against the simulation
//! driver and plays a stimulus scenario through it.
//!
//! The module configuration comes from `--config` (TOML) or, without it,
//! from the built-in profile for `--kind`. Reports go to the log and,
//! with `--report-json`, to a JSON-lines file.

use clap::{Parser, ValueEnum};
use dbw_common::actuator::config::{ModuleConfig, ModuleSection};
use dbw_common::actuator::error::FaultFlags;
use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::config::{ConfigLoader, LogLevel, SharedConfig};
use dbw_common::hal::driver::ActuatorDriver;
use dbw_control_unit::controller::ActuatorController;
use dbw_control_unit::cycle::{ActuatorModule, rt_setup};
use dbw_hal::{
    FanOutSink, JsonLinesSink, ScenarioAction, ScenarioScript, SimulationDriver,
    TracingReportSink,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Actuator kind selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Throttle,
    Brake,
}

impl From<KindArg> for ActuatorKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Throttle => ActuatorKind::Throttle,
            KindArg::Brake => ActuatorKind::Brake,
        }
    }
}

/// Built-in stimulus scenario.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Enable and follow a command ramp.
    Nominal,
    /// Operator presses the pedal while enabled.
    Override,
    /// Sensor pin disconnects while enabled.
    SensorFault,
}

impl Scenario {
    fn script(self) -> ScenarioScript {
        match self {
            Self::Nominal => ScenarioScript::nominal(),
            Self::Override => ScenarioScript::operator_override(),
            Self::SensorFault => ScenarioScript::sensor_fault(),
        }
    }
}

/// DBW Control Unit: drive-by-wire actuator module host
#[derive(Parser, Debug)]
#[command(name = "dbw_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Drive-by-wire actuator control core running against the simulation driver")]
struct Args {
    /// Path to the module configuration TOML.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Actuator kind (overrides the kind in the config file).
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Stop after this many milliseconds (default: scenario end + 500 ms).
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u64>,

    /// Stimulus scenario to play.
    #[arg(long, value_enum, default_value_t = Scenario::Nominal)]
    scenario: Scenario,

    /// Also write reports as JSON lines to this file.
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,

    /// CPU core to pin the control thread to.
    #[cfg(feature = "rt")]
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority.
    #[cfg(feature = "rt")]
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match load_module_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            process::exit(1);
        }
    };

    setup_tracing(&args, config.shared.log_level);

    info!(
        "DBW Control Unit v{} starting ({})...",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("DBW Control Unit shutdown complete");
}

/// Load and validate the module config, or build the default one.
fn load_module_config(args: &Args) -> Result<ModuleConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ModuleConfig::load(path)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => ModuleConfig {
            shared: SharedConfig {
                log_level: LogLevel::Info,
                service_name: "dbw-sim".to_string(),
            },
            module: ModuleSection::default(),
        },
    };
    if let Some(kind) = args.kind {
        config.module.kind = kind.into();
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &ModuleConfig) -> Result<(), Box<dyn std::error::Error>> {
    let profile = config.profile();
    let periods = &config.module.periods;
    info!(
        kind = %profile.kind,
        latch_policy = ?profile.latch_policy,
        threshold = profile.override_detection.threshold,
        override_ms = periods.override_check_ms,
        sensor_ms = periods.sensor_check_ms,
        output_ms = periods.output_update_ms,
        report_ms = periods.report_publish_ms,
        "Config OK"
    );

    #[cfg(feature = "rt")]
    {
        rt_setup(args.cpu_core, args.rt_priority)?;
        info!(
            "RT setup complete (cpu_core={}, priority={})",
            args.cpu_core, args.rt_priority
        );
    }
    #[cfg(not(feature = "rt"))]
    rt_setup(0, 0)?;

    let driver = SimulationDriver::new(profile.kind);
    let mut module = ActuatorModule::new(profile, periods, driver, 0)?;

    let mut script = args.scenario.script();
    let duration_ms = args.duration_ms.unwrap_or(script.end_ms() + 500);
    info!(scenario = script.name(), duration_ms, "Scenario loaded");

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut stimulus = |now_ms: u64, controller: &mut ActuatorController<SimulationDriver>| {
        for step in script.take_due(now_ms) {
            apply_action(controller, step.action);
        }
    };

    match &args.report_json {
        Some(path) => {
            let file = File::create(path)?;
            let mut sink = FanOutSink::new(
                TracingReportSink::new(),
                JsonLinesSink::new(BufWriter::new(file)),
            );
            module.run(&mut sink, &running, Some(duration_ms), &mut stimulus)?;
            let json = sink.second;
            info!(
                path = %path.display(),
                lines = json.lines(),
                write_errors = json.write_errors(),
                "JSON report written"
            );
            drop(json.into_inner());
        }
        None => {
            let mut sink = TracingReportSink::new();
            module.run(&mut sink, &running, Some(duration_ms), &mut stimulus)?;
        }
    }

    let controller = module.controller();
    if let Some(diag) = controller.driver().diagnostics() {
        info!(
            reads = diag.reads,
            read_failures = diag.read_failures,
            writes = diag.writes,
            "Driver diagnostics"
        );
    }
    info!(
        mode = ?controller.mode(),
        faults = %controller.state().faults(),
        "Final state"
    );
    Ok(())
}

/// Apply one scripted action to the driver or the controller.
fn apply_action(controller: &mut ActuatorController<SimulationDriver>, action: ScenarioAction) {
    match action {
        ScenarioAction::SetPedal(fraction) => controller.driver_mut().set_pedal(fraction),
        ScenarioAction::InjectFault(fault) => controller.driver_mut().inject_fault(fault),
        ScenarioAction::Command(position) => {
            controller.apply_command(position);
        }
        ScenarioAction::Enable => {
            if let Err(e) = controller.request_enable() {
                warn!("Scenario enable refused: {e}");
            }
        }
        ScenarioAction::Disable => controller.request_disable(),
        ScenarioAction::ClearFaults => {
            if let Err(e) = controller.request_fault_clear(FaultFlags::all()) {
                warn!("Scenario fault clear refused: {e}");
            }
        }
    }
}

/// Setup tracing subscriber based on CLI arguments and config.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        configured.as_directive()
    };

    let level: Directive = directive.parse().unwrap_or_else(|_| Level::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(level);

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
