//! Command line front end of the planar arm kinematics.
//!
//! Usage:
//!   planar-arm fk 30 45
//!   planar-arm --config arm.yaml ik 4.0 1.0
//!   planar-arm stats
//!   planar-arm grid --resolution 0.5
//!   planar-arm trajectory 2.0 3.0 --steps 10 --easing smooth-step
//!   planar-arm pick-place
//!
//! Without `--config`, the 3.0 / 2.0 pick and place arm is used. Set `RUST_LOG=debug` to see
//! what the solvers do.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use planar_arm_kinematics::kinematic_traits::{Kinematics, Position};
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::link_chain::LinkChain;
use planar_arm_kinematics::parameters::planar_arm::Parameters;
use planar_arm_kinematics::task::PickPlace;
use planar_arm_kinematics::trajectory::{Easing, UnreachablePolicy, Waypoint, plan_waypoints};
use planar_arm_kinematics::utils::{as_radians, dump_positions, dump_solutions, format_joints};
use planar_arm_kinematics::workspace::{WorkspaceAnalyzer, distance_histogram, quadrant_counts};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "planar-arm", about = "Kinematics and workspace analysis of planar robot arms")]
struct Args {
    /// YAML arm description (planar_arm section)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forward kinematics for the given joint angles in degrees
    Fk {
        #[arg(allow_negative_numbers = true, required = true)]
        degrees: Vec<f64>,
    },

    /// All inverse kinematics solutions for the end effector at (x, y)
    Ik {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Workspace statistics of the first two links
    Stats {
        #[arg(long, default_value_t = 100)]
        theta1: usize,

        #[arg(long, default_value_t = 50)]
        theta2: usize,

        /// Number of bins of the distance histogram
        #[arg(long, default_value_t = 50)]
        bins: usize,
    },

    /// Reachability grid of the first two links, drawn as text
    Grid {
        #[arg(long, default_value_t = 0.5)]
        resolution: f64,

        /// Half width of the square around the base
        #[arg(long, default_value_t = 6.0)]
        extent: f64,
    },

    /// Joint space trajectory from the current angles to (x, y)
    Trajectory {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Start angles in degrees, all zero if not given
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        from: Option<Vec<f64>>,

        #[arg(long, default_value_t = 10)]
        steps: usize,

        #[arg(long, value_enum, default_value_t = EasingArg::Linear)]
        easing: EasingArg,
    },

    /// Plan the pick and place task of the demonstration arm
    PickPlace {
        #[arg(long, default_value_t = 50)]
        steps: usize,

        #[arg(long, value_enum, default_value_t = EasingArg::SmoothStep)]
        easing: EasingArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EasingArg {
    Linear,
    SmoothStep,
    Cosine,
}

impl From<EasingArg> for Easing {
    fn from(easing: EasingArg) -> Easing {
        match easing {
            EasingArg::Linear => Easing::Linear,
            EasingArg::SmoothStep => Easing::SmoothStep,
            EasingArg::Cosine => Easing::Cosine,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let parameters = match &args.config {
        Some(path) => Parameters::from_yaml_file(path)
            .with_context(|| format!("Failed to read arm description from {}", path.display()))?,
        None => Parameters::pick_and_place(),
    };
    info!("Arm with links {:?}", parameters.link_lengths);
    let robot = PlanarKinematics::new(parameters.clone()).context("Invalid arm description")?;

    match args.command {
        Command::Fk { degrees } => {
            let joints = as_radians(&degrees);
            if joints.len() != robot.dof() {
                bail!("The arm has {} joints, {} angles given", robot.dof(), joints.len());
            }
            let positions = robot.forward_with_joint_positions(&joints);
            println!("Joint positions, base first:");
            dump_positions(&positions);
        }
        Command::Ik { x, y } => {
            let solutions = robot.inverse(&Position::new(x, y));
            if solutions.is_empty() {
                println!("({}, {}) is not reachable", x, y);
            } else {
                dump_solutions(&solutions);
            }
        }
        Command::Stats { theta1, theta2, bins } => {
            let analyzer = two_link_analyzer(&parameters)?;
            let samples = analyzer.sample_workspace(theta1, theta2);
            println!("{}", analyzer.statistics(&samples));

            let [q1, q2, q3, q4] = quadrant_counts(&samples);
            println!("Quadrants: Q1 {}, Q2 {}, Q3 {}, Q4 {}", q1, q2, q3, q4);
            if !samples.is_empty() && bins > 0 {
                let histogram = distance_histogram(&samples, bins);
                println!("Distance histogram:");
                for (i, count) in histogram.counts.iter().enumerate() {
                    let (low, high) = (histogram.edges[i], histogram.edges[i + 1]);
                    println!("  {:6.2} .. {:6.2}: {}", low, high, count);
                }
            }
        }
        Command::Grid { resolution, extent } => {
            if !(resolution > 0.0) {
                bail!("Resolution must be positive");
            }
            let analyzer = two_link_analyzer(&parameters)?;
            let grid = analyzer.reachability_grid((-extent, extent), (-extent, extent), resolution);
            print!("{}", grid);
            println!(
                "{} of {} cells reachable",
                grid.reachable_count(),
                grid.xs.len() * grid.ys.len()
            );
        }
        Command::Trajectory { x, y, from, steps, easing } => {
            let start = match from {
                Some(degrees) => as_radians(&degrees),
                None => vec![0.0; robot.dof()],
            };
            if steps == 0 {
                bail!("At least one step is required");
            }
            let waypoints = [Waypoint::new(x, y, steps)];
            let trajectory = plan_waypoints(
                &robot,
                &start,
                &waypoints,
                easing.into(),
                UnreachablePolicy::Fail,
            )
            .context("Trajectory planning failed")?;
            for (frame, end) in trajectory.iter().zip(trajectory.end_effector_path(&robot)) {
                println!("{} -> ({:.3}, {:.3})", format_joints(&frame.joints), end.x, end.y);
            }
        }
        Command::PickPlace { steps, easing } => {
            if steps == 0 {
                bail!("At least one step is required");
            }
            let task = PickPlace::default().with_steps(steps).with_easing(easing.into());
            for (phase, reachable) in task.reachability(&robot) {
                println!("{}: {}", phase, if reachable { "reachable" } else { "NOT reachable" });
            }
            let mut chain = LinkChain::new(parameters.link_lengths.clone())?;
            let segments = task.plan(&mut chain, &robot).context("Pick and place planning failed")?;
            for segment in &segments {
                let last = segment
                    .trajectory
                    .last()
                    .context("Empty trajectory segment")?;
                println!(
                    "{} ({:.2}, {:.2}): {} frames, ends at {}",
                    segment.phase,
                    segment.target.x,
                    segment.target.y,
                    segment.trajectory.len(),
                    format_joints(&last.joints)
                );
            }
        }
    }
    Ok(())
}

fn two_link_analyzer(parameters: &Parameters) -> Result<WorkspaceAnalyzer> {
    match parameters.link_lengths.as_slice() {
        [l1, l2] => Ok(WorkspaceAnalyzer::new(*l1, *l2)?),
        lengths => bail!(
            "Workspace analysis needs a two-link arm, this one has {} links",
            lengths.len()
        ),
    }
}
