//! End-to-end training runs through the public API.

use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use curve_fit::data::{sin_product, Dataset};
use curve_fit::network::Network;
use curve_fit::trainer::{Logging, StopReason, Trainer, TrainerConfig};

fn plane(x: ArrayView1<'_, f64>) -> f64 {
    0.5 * x[0] - 0.3 * x[1] + 0.1
}

/// Mean squared error of always predicting zero.
fn zero_prediction_mse(data: &Dataset) -> f64 {
    data.targets().mapv(|t| t * t).mean().unwrap()
}

#[test]
fn fits_the_sine_surface() {
    let data = Dataset::generate(&mut StdRng::seed_from_u64(2024), 1000, 2, sin_product);
    let split = data.split(0.15, 0.15).unwrap();
    assert_eq!(split.training.len(), 700);
    let validation_baseline = zero_prediction_mse(&split.validation);
    let test_baseline = zero_prediction_mse(&split.test);

    // A hidden layer this narrow can lose most of its units to dead ReLUs,
    // so the best of a few initializations is judged.
    let (summary, test_mse) = (0..5)
        .map(|seed| {
            let config = TrainerConfig::default()
                .learning_rate(0.05)
                .seed(seed)
                .logging(Logging::Silent);
            let network = Network::new(2, 4, 2).unwrap();
            let mut trainer = Trainer::new(
                network,
                split.training.clone(),
                split.validation.clone(),
                config,
            )
            .unwrap();
            let summary = trainer.train();
            assert!(summary.epoch_count <= 1000);
            assert!(summary.final_mse.is_finite());
            (summary, trainer.mean_squared_error(&split.test))
        })
        .min_by(|a, b| a.0.last_mse.total_cmp(&b.0.last_mse))
        .unwrap();

    // An untrained network predicts zero everywhere and scores exactly the
    // baselines.
    assert!(
        summary.last_mse < validation_baseline,
        "validation MSE {} vs baseline {validation_baseline}",
        summary.last_mse
    );
    assert!(
        test_mse < test_baseline,
        "test MSE {test_mse} vs baseline {test_baseline}"
    );
}

#[test]
fn linear_network_fits_a_plane() {
    let data = Dataset::generate(&mut StdRng::seed_from_u64(5), 1000, 2, plane);
    let split = data.split(0.15, 0.15).unwrap();

    let config = TrainerConfig::default()
        .learning_rate(0.1)
        .seed(3)
        .logging(Logging::Silent);
    let network = Network::new(2, 2, 1).unwrap();
    let mut trainer = Trainer::new(network, split.training, split.validation, config).unwrap();
    let summary = trainer.train();

    assert_eq!(summary.stop_reason, StopReason::ErrorThreshold);
    assert!(summary.final_mse <= 1.0e-3);
    assert!(trainer.mean_squared_error(&split.test) < 5.0e-3);

    let prediction = trainer.predict(&[0.5, 0.5]);
    assert!((prediction - 0.2).abs() < 0.1, "prediction {prediction}");
}

#[test]
fn summary_matches_trainer_state() {
    let data = Dataset::generate(&mut StdRng::seed_from_u64(8), 100, 2, sin_product);
    let split = data.split(0.2, 0.0).unwrap();

    let config = TrainerConfig::default()
        .learning_rate(0.05)
        .max_epoch(25)
        .seed(4)
        .logging(Logging::Silent);
    let network = Network::new(2, 6, 3).unwrap();
    let mut trainer = Trainer::new(network, split.training, split.validation, config).unwrap();
    let summary = trainer.train();

    assert_eq!(summary.epoch_count, trainer.epoch_count());
    assert_eq!(summary.validation_check_count, trainer.validation_check_count());
    assert_eq!(summary.last_mse, trainer.last_mse());
    assert!(summary.validation_check_count <= 40);
}

#[test]
fn trained_network_outlives_the_trainer() {
    let data = Dataset::generate(&mut StdRng::seed_from_u64(9), 60, 2, sin_product);
    let split = data.split(0.25, 0.0).unwrap();
    let config = TrainerConfig::default()
        .max_epoch(5)
        .seed(1)
        .logging(Logging::Silent);
    let mut trainer =
        Trainer::new(Network::new(2, 4, 2).unwrap(), split.training, split.validation, config)
            .unwrap();
    trainer.train();

    let from_trainer = trainer.predict(&[0.1, 0.4]);
    let mut network = trainer.into_network();
    assert_eq!(network.test(&[0.1, 0.4]), from_trainer);
}

#[test]
fn summary_serializes() {
    let data = Dataset::generate(&mut StdRng::seed_from_u64(10), 40, 2, sin_product);
    let split = data.split(0.25, 0.0).unwrap();
    let config = TrainerConfig::default()
        .max_epoch(2)
        .seed(2)
        .logging(Logging::Silent);
    let mut trainer =
        Trainer::new(Network::new(2, 3, 2).unwrap(), split.training, split.validation, config)
            .unwrap();
    let json = serde_json::to_value(trainer.train()).unwrap();
    assert_eq!(json["epoch_count"], 2);
    assert_eq!(json["stop_reason"], "MaxEpoch");
}
