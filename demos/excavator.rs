use planar_arm_kinematics::interpolator::Interpolator;
use planar_arm_kinematics::kinematic_traits::{Kinematics, Position};
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::parameters::planar_arm::Parameters;
use planar_arm_kinematics::trajectory::{plan_waypoints, Easing, UnreachablePolicy, Waypoint};
use planar_arm_kinematics::utils::{dump_positions, dump_solutions, format_joints};

/// Boom, stick and bucket angles of the parking position.
const HOME: [f64; 3] = [0.3, -0.8, 1.2];

fn main() {
    let robot = PlanarKinematics::new(Parameters::excavator()).expect("valid arm");

    println!("Excavator at home:");
    dump_positions(&robot.forward_with_joint_positions(&HOME));

    let bucket = Position::new(5.0, 0.0);
    println!("\nBucket at ({}, {}), solutions within the hydraulic limits:", bucket.x, bucket.y);
    dump_solutions(&robot.inverse_continuing(&bucket, &HOME));

    println!("\nDigging cycle from key poses, cosine easing:");
    let poses: [&[f64]; 6] = [
        &HOME,
        &[0.9, -1.9, 1.2],
        &[-0.4, -1.6, 1.2],
        &[-0.6, -1.2, 1.2],
        &[0.5, -1.0, 1.2],
        &HOME,
    ];
    let cycle = Interpolator::from_poses(&poses, Easing::Cosine).sample(21);
    for (frame, end) in cycle.iter().zip(cycle.end_effector_path(&robot)) {
        let joints = format_joints(&frame.joints);
        println!("{} bucket ({:6.3}, {:6.3}) {:?}", joints, end.x, end.y, frame.flags);
    }

    println!("\nDigging along the ground, bucket held at the home angle:");
    let waypoints = [
        Waypoint::new(6.0, 0.5, 10),
        Waypoint::new(4.0, -0.5, 10),
        Waypoint::new(2.5, -0.5, 10),
        Waypoint::new(3.0, 2.5, 10),
    ];
    match plan_waypoints(&robot, &HOME, &waypoints, Easing::SmoothStep, UnreachablePolicy::Hold) {
        Ok(trajectory) => {
            for (frame, end) in trajectory.iter().zip(trajectory.end_effector_path(&robot)) {
                let joints = format_joints(&frame.joints);
                println!("{} bucket ({:6.3}, {:6.3}) {:?}", joints, end.x, end.y, frame.flags);
            }
        }
        Err(err) => println!("Planning failed: {}", err),
    }
}
