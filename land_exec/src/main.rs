//! Main landing executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Start the simulation thread, which publishes the aircraft state, aircraft and platform
//!       poses and the corridors into the localisation manager
//!     - Start the trajectory setup task, which waits for the first corridors and then sets up
//!       the trajectory optimiser
//!     - Main loop, at the cycle frequency:
//!         - Hand over the trajectory gateway once the setup task has delivered it
//!         - Localisation snapshot
//!         - Mission processing, including the landing replan and trajectory playback
//!         - Pose control processing
//!         - Command and mission TM output
//!
//! # Modules
//!
//! All control modules (e.g. `pose_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use land_lib::{
    exec::LandExec,
    loc::LocMgr,
    mission::{MissionMgr, MissionState},
    params::LandExecParams,
    pose_ctrl::{self, PoseCtrl, PoseCtrlParams},
    sim::{SimOptimiser, SimParams, SimWorld},
    traj::{spawn_setup_task, TrajParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Autonomous landing executable, running against the simulated aircraft and platform.
#[derive(Debug, StructOpt)]
#[structopt(name = "land_exec")]
struct Args {
    /// Stop after this many seconds even if the mission has not completed
    #[structopt(short, long, default_value = "120")]
    duration_s: f64,

    /// Minimum level of the log (info, debug or trace)
    #[structopt(short, long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("land_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(args.log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Autonomous Landing Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: LandExecParams =
        util::params::load("land_exec.toml").wrap_err("Could not load exec params")?;
    let traj_params: TrajParams =
        util::params::load("traj.toml").wrap_err("Could not load trajectory params")?;
    let pose_ctrl_params: PoseCtrlParams =
        util::params::load("pose_ctrl.toml").wrap_err("Could not load pose control params")?;
    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    exec_params
        .validate()
        .wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mission = MissionMgr::init("mission.toml", &exec_params, traj_params.replan_start_index)
        .wrap_err("Failed to initialise the MissionMgr")?;
    info!("MissionMgr init complete");

    let mut pose_ctrl = PoseCtrl::default();
    pose_ctrl
        .init(
            pose_ctrl::InitData {
                params: pose_ctrl_params,
                v_max_ms: exec_params.limits.v_max_ms,
            },
            Some(&session),
        )
        .wrap_err("Failed to initialise PoseCtrl")?;
    info!("PoseCtrl init complete");

    let (loc_mgr, corridor_rx) = LocMgr::new();

    let sim = SimWorld::new(&sim_params);
    let sim_jh = sim.start(loc_mgr.clone(), sim_params.rate_hz);
    let mut fcs = sim.fcs();
    info!("Simulation started at {} Hz", sim_params.rate_hz);

    let (setup_jh, gateway_rx) = spawn_setup_task(
        Box::new(SimOptimiser::new()),
        traj_params,
        exec_params.clone(),
        corridor_rx,
    );

    let mut exec = LandExec::new(loc_mgr, mission, pose_ctrl, gateway_rx);

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let cycle_period_s = exec_params.cycle_period_s();
    let start = Instant::now();
    let mut last_tm = None;

    info!("Beginning main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let time_s = (cycle_start_instant - start).as_secs_f64();

        let output = exec
            .cycle(time_s, &mut fcs)
            .wrap_err("Localisation failure")?;

        if let Some(o) = output {
            last_tm = Some(o.tm);

            if o.tm.state == MissionState::MissionComplete {
                info!("Mission complete after {:.2} s", time_s);
                break;
            }
        }

        if time_s > args.duration_s {
            warn!("Mission not complete after {:.2} s, stopping", args.duration_s);
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        // Get the end time of the cycle
        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get the sleep duration
        match Duration::from_secs_f64(cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period_s
            ),
        }
    }

    // ---- SHUTDOWN ----

    sim.stop();
    sim_jh
        .join()
        .map_err(|_| eyre!("The sim thread panicked"))?
        .wrap_err("The sim thread failed")?;

    // Releases the corridor sender so a setup task still waiting for corridors can exit
    drop(exec);

    match setup_jh.join() {
        Ok(Ok(())) => (),
        Ok(Err(e)) => warn!("Trajectory setup did not complete: {}", e),
        Err(_) => warn!("The trajectory setup task panicked"),
    }

    let status = sim.status().wrap_err("Could not get the final sim status")?;
    info!(
        "Final aircraft position {:?}, platform position {:?}, on deck: {}",
        status.uav_tf.translation.vector.as_slice(),
        status.ugv_tf.translation.vector.as_slice(),
        status.on_deck
    );

    if let Some(tm) = last_tm {
        session.save("mission_tm.json", tm);
    }

    session.exit();

    Ok(())
}
