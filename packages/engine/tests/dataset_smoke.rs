use std::fs;

use magic_cube_engine::domain::dataset::SearchDataset;
use magic_cube_engine::{run_suite, SearchAlgorithm, SearchParams, SuiteConfig};

fn fixture() -> SearchDataset {
    let json = fs::read_to_string("tests/fixtures/legacy_dataset.json")
        .expect("legacy_dataset.json fixture should exist");
    SearchDataset::from_json(&json).expect("fixture should parse")
}

#[test]
fn legacy_dataset_parses_and_replays() {
    let dataset = fixture();
    assert_eq!(
        dataset.algorithm_names(),
        vec!["steepest_ascent", "simulated_annealing", "genetic"]
    );

    let replay = dataset.replay("steepest_ascent", 0).unwrap();
    assert_eq!(replay.initial, dataset.initial_config.initial_cube);
    assert_eq!(replay.frame_count(), 4);
    assert!(replay.is_consistent());

    let last = replay.state_at(3);
    assert_eq!((last.get(10), last.get(57)), (96, 1));
    assert_eq!((last.get(3), last.get(120)), (84, 63));

    // extra per-step fields from older generators are tolerated
    let annealing = dataset.algorithm("simulated_annealing").unwrap();
    assert_eq!(annealing.stuck_frequency, vec![0]);
    assert!(dataset.replay("simulated_annealing", 0).unwrap().is_consistent());

    let genetic = dataset.algorithm("genetic").unwrap();
    assert_eq!(genetic.generations[0].len(), 2);
    assert_eq!(dataset.replay("genetic", 0).unwrap().frame_count(), 1);
}

#[test]
fn generated_suite_reads_back() {
    let config = SuiteConfig {
        seed: 2024,
        runs: 1,
        algorithms: vec![SearchAlgorithm::SteepestAscent, SearchAlgorithm::Stochastic],
        params: SearchParams {
            max_iterations: 5,
            ..SearchParams::default()
        },
        ..SuiteConfig::default()
    };
    let dataset = run_suite(&config).unwrap();
    let back = SearchDataset::from_json(&dataset.to_json().unwrap()).unwrap();

    for name in ["steepest_ascent", "stochastic"] {
        let replay = back.replay(name, 0).unwrap();
        assert!(replay.is_consistent(), "{}", name);
        assert!(replay.frame_count() <= 6);
    }
    assert_eq!(back.initial_config.initial_cube, dataset.initial_config.initial_cube);
}
