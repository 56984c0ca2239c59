use planar_arm_kinematics::kinematic_traits::Kinematics;
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::link_chain::LinkChain;
use planar_arm_kinematics::parameters::planar_arm::Parameters;
use planar_arm_kinematics::task::{concatenate, PickPlace};
use planar_arm_kinematics::trajectory::Easing;
use planar_arm_kinematics::utils::format_joints;

fn main() {
    let parameters = Parameters::pick_and_place();
    let mut chain = LinkChain::new(parameters.link_lengths.clone()).expect("valid arm");
    let robot = PlanarKinematics::new(parameters).expect("valid arm");

    let task = PickPlace::default().with_easing(Easing::SmoothStep);
    for (phase, reachable) in task.reachability(&robot) {
        println!("{}: {}", phase, if reachable { "reachable" } else { "NOT reachable" });
    }

    let segments = match task.plan(&mut chain, &robot) {
        Ok(segments) => segments,
        Err(err) => {
            println!("Planning failed: {}", err);
            return;
        }
    };

    for segment in &segments {
        let end = segment.trajectory.last().map(|frame| robot.forward(&frame.joints));
        println!(
            "\n{}: {} frames, target ({:.2}, {:.2}), reached {:?}",
            segment.phase,
            segment.trajectory.len(),
            segment.target.x,
            segment.target.y,
            end
        );
    }

    let trajectory = concatenate(segments);
    println!("\nEvery 10th frame of {}:", trajectory.len());
    for frame in trajectory.iter().step_by(10) {
        println!("{} {:?}", format_joints(&frame.joints), frame.flags);
    }
    println!("Arm is back at {}", format_joints(chain.joint_angles()));
}
