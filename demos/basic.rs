use planar_arm_kinematics::kinematic_traits::{ElbowConfig, Kinematics, Position};
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::parameters::planar_arm::Parameters;
use planar_arm_kinematics::two_link::{inverse_kinematics_2link, reach_limits};
use planar_arm_kinematics::utils::{as_radians, dump_joints, dump_positions, dump_solutions};

fn main() {
    // 3 m upper arm, 2 m forearm, base at the origin
    let robot = PlanarKinematics::new(Parameters::pick_and_place()).expect("valid arm");

    let joints = as_radians(&[45.0, 30.0]);
    println!("\nJoints:");
    dump_joints(&joints);
    println!("\nForward kinematics:");
    let positions = robot.forward_with_joint_positions(&joints);
    dump_positions(&positions);

    let target: Position = robot.forward(&joints);
    println!("\nBoth elbow branches for ({:.3}, {:.3}):", target.x, target.y);
    for elbow in ElbowConfig::both() {
        match robot.inverse_branch(&target, elbow) {
            Some(solution) => {
                print!("{:?}: ", elbow);
                dump_joints(&solution);
            }
            None => println!("{:?}: not reachable", elbow),
        }
    }

    println!("\nSolutions sorted by proximity to a slightly different previous pose:");
    let previous = as_radians(&[60.0, -20.0]);
    dump_solutions(&robot.inverse_continuing(&target, &previous));

    let (min_reach, max_reach) = reach_limits(3.0, 2.0);
    println!("\nThe arm reaches between {} and {} m from its base", min_reach, max_reach);
    for (x, y) in [(4.9, 0.0), (6.0, 0.0), (0.5, 0.0)] {
        match inverse_kinematics_2link(3.0, 2.0, x, y) {
            Some((theta1, theta2)) => println!(
                "({}, {}): theta1 = {:.2}, theta2 = {:.2} degrees",
                x,
                y,
                theta1.to_degrees(),
                theta2.to_degrees()
            ),
            None => println!("({}, {}): unreachable", x, y),
        }
    }

    println!("\nThree links stretched along the x axis:");
    let three = PlanarKinematics::new(Parameters::three_link()).expect("valid arm");
    dump_positions(&three.forward_with_joint_positions(&[0.0, 0.0, 0.0]));
}
