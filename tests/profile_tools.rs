//! Simulator-log aggregation followed by inter-origin distances.

use approx::assert_abs_diff_eq;

use firing_fit::data::{bcs, iod};
use firing_fit::domain::{PositionRange, ProfileConfig, ProfileOutputs};
use firing_fit::error::ErrorKind;
use firing_fit::io::{DataLayout, read_profile};

const LOG: &str = "\
>simulation 1
0.2\t-\tORI\t-\t6
0.9\t-\tFL\t-\t5
0.9\t-\tFR\t-\t7
1.6\t-\tFL\t-\t4
>simulation 2
0.1\t-\tORI\t-\t2
0.3\t-\tORI\t-\t8
0.5\t-\tFR\t-\t3
0.5\t-\tFL\t-\t7
1.1\t-\tFR\t-\t4
1.1\t-\tFL\t-\t6
";

#[test]
fn profiles_then_distances() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let range = PositionRange::new(0, 8).unwrap();

    let log_path = layout.simulator_log("HCT116", 3, range);
    std::fs::create_dir_all(log_path.parent().unwrap()).unwrap();
    std::fs::write(&log_path, LOG).unwrap();

    let config = ProfileConfig {
        data_dir: dir.path().to_path_buf(),
        cell_lines: vec!["HCT116".to_string()],
        chromosomes: vec![3],
        range: Some(range),
        sim_number: 2,
        outputs: ProfileOutputs::ALL,
    };
    assert_eq!(bcs::process_profiles(&config).unwrap(), 1);

    let time = read_profile(&layout.simulated_replication_time("HCT116", 3, range)).unwrap();
    let expected_time = [0.0, 0.0, 0.25, 1.35, 0.45, 0.55, 0.7, 0.0];
    for (got, want) in time.iter().zip(expected_time) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
    }

    let forks = read_profile(&layout.fork_directionality("HCT116", 3, range)).unwrap();
    assert_eq!(forks, vec![0.0, 0.0, 0.5, 0.0, -0.5, -0.5, 0.0, 0.0]);

    let processed = iod::process_all(&layout, &config.cell_lines, &[3], Some(range)).unwrap();
    assert_eq!(processed, 1);
    let text = std::fs::read_to_string(layout.interorigin_distances("HCT116", 3, range)).unwrap();
    assert_eq!(text, "[]\n[6]\n");
}

#[test]
fn disabling_every_output_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProfileConfig {
        data_dir: dir.path().to_path_buf(),
        cell_lines: vec!["HCT116".to_string()],
        chromosomes: vec![3],
        range: None,
        sim_number: 10,
        outputs: ProfileOutputs {
            replication_time: false,
            fork_directionality: false,
            origin_positions: false,
        },
    };
    let err = bcs::process_profiles(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn missing_simulator_log_is_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProfileConfig {
        data_dir: dir.path().to_path_buf(),
        cell_lines: vec!["HCT116".to_string()],
        chromosomes: vec![3],
        range: Some(PositionRange::new(0, 8).unwrap()),
        sim_number: 1,
        outputs: ProfileOutputs::ALL,
    };
    let err = bcs::process_profiles(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputNotFound);
}
