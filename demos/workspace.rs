use planar_arm_kinematics::workspace::{distance_histogram, quadrant_counts, WorkspaceAnalyzer};
use planar_arm_kinematics::workspace::{THETA1_RESOLUTION, THETA2_RESOLUTION};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let analyzer = WorkspaceAnalyzer::new(3.0, 2.0).expect("valid arm");

    println!("{}", analyzer.workspace_statistics());

    let samples = analyzer.sample_workspace(THETA1_RESOLUTION, THETA2_RESOLUTION);
    let [q1, q2, q3, q4] = quadrant_counts(&samples);
    println!("\nPoints per quadrant: I {} II {} III {} IV {}", q1, q2, q3, q4);

    let histogram = distance_histogram(&samples, 10);
    println!("\nDistance from the base:");
    for (k, count) in histogram.counts.iter().enumerate() {
        println!(
            "{:5.2} .. {:5.2} {}",
            histogram.edges[k],
            histogram.edges[k + 1],
            "*".repeat(count / 50)
        );
    }

    let mut rng = StdRng::seed_from_u64(1);
    println!(
        "\nArea: theoretical {:.3}, Monte Carlo {:.3}",
        analyzer.theoretical_area(),
        analyzer.estimate_area(100_000, &mut rng)
    );

    let grid = analyzer.reachability_grid((-6.0, 6.0), (-6.0, 6.0), 0.25);
    println!(
        "\nReachability grid, {} cells reachable ({:.2} m2):\n{}",
        grid.reachable_count(),
        grid.reachable_area(0.25),
        grid
    );
}
