use rbf_surrogate::config::SurrogateSettings;
use rbf_surrogate::{
    create_evaluation_grid, generate_random_points, DomainBounds, RadialKernel, RbfSurrogate,
    RbfTestFunctions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Define input sample points within [0, 1]^2
    let num_points = 100usize;
    let bounds = DomainBounds::new(vec![0.0, 0.0], vec![1.0, 1.0])?;
    let points = generate_random_points(num_points, &bounds, Some(42));

    // Define some values at the sample points using Franke's function
    let point_values = RbfTestFunctions::franke_2d(&points);

    // Select the thin plate spline kernel
    let settings = SurrogateSettings::builder(RadialKernel::ThinPlate).build();

    // Assemble and solve the surrogate
    let surrogate = RbfSurrogate::builder(points, point_values, bounds)
        .settings(settings)
        .build()?;

    // The model reproduces its own samples exactly
    let fitted = surrogate.evaluate_at_source();
    let max_diff: f64 = surrogate
        .point_values()
        .col(0)
        .iter()
        .zip(fitted.col(0).iter())
        .fold(0.0, |acc, (a, b)| acc.max((a - b).abs()));
    println!("max residual at the {} samples: {max_diff:.3e}", surrogate.num_points());

    // Build a 2D grid of target points in [0, 1]^2 and predict over it
    let n = 50;
    let target_points = create_evaluation_grid(&[(0.0, 1.0), (0.0, 1.0)], &[n, n]);
    let predicted = surrogate.evaluate(&target_points)?;
    println!("predicted {} grid values", predicted.nrows());

    Ok(())
}
