use faer::mat;
use rbf_surrogate::config::SurrogateSettings;
use rbf_surrogate::{DomainBounds, RadialKernel, RbfSurrogate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Samples of y = 2x on [1, 4]
    let points = mat![[1.0], [2.0], [3.0], [4.0]];
    let values = mat![[2.0], [4.0], [6.0], [8.0]];

    let settings = SurrogateSettings::builder(RadialKernel::Linear).build();

    let mut surrogate = RbfSurrogate::builder(points, values, DomainBounds::scalar(1.0, 4.0)?)
        .settings(settings)
        .build()?;

    let before = surrogate.predict(&[2.5])?;
    println!("prediction at 2.5 before the update: {:?}", before);

    // Absorb a new sample; the model is rebuilt in place.
    surrogate.add_sample(&[5.0], &[10.0])?;

    let after = surrogate.predict(&[2.5])?;
    let at_new = surrogate.predict(&[5.0])?;
    println!("prediction at 2.5 after the update:  {:?}", after);
    println!("prediction at the new sample 5.0:    {:?}", at_new);

    // Fitted models round-trip through a versioned JSON envelope.
    let path = std::env::temp_dir().join("incremental_1d_surrogate.json");
    surrogate.save_model(&path)?;
    let restored = RbfSurrogate::load_model(&path, None)?;
    println!(
        "restored model predicts {:?} at 2.5",
        restored.predict(&[2.5])?
    );
    std::fs::remove_file(&path)?;

    Ok(())
}
