use std::fs;

use magic_cube_engine::simulation::SceneCommand;
use magic_cube_engine::SceneCore;

#[test]
fn scene_smoke_replays_a_fixture_run() {
    let json = fs::read_to_string("tests/fixtures/legacy_dataset.json")
        .expect("legacy_dataset.json fixture should exist");

    let mut scene = SceneCore::new();
    scene.load_dataset_json(&json).unwrap();
    let frames = scene.select_run("steepest_ascent", 0).unwrap();
    assert_eq!(frames, 4);
    scene.drain_commands();

    scene.set_speed(2.0).unwrap();
    assert!(scene.play(0.0));
    let mut now = 0.0;
    while scene.is_playing() {
        now += 16.0;
        scene.advance(now);
        assert!(now < 60_000.0, "playback never finished");
    }
    scene.advance(now + 1000.0);

    assert_eq!(scene.playback_index(), 3);
    assert_eq!(scene.pending_count(), 0);
    assert!(scene.lattice().is_bijection());
    assert_eq!((scene.label(10), scene.label(57)), (Some(96), Some(1)));

    let json = scene.drain_commands_json();
    assert!(json.contains(r#""op":"animate_label""#));

    let commands = scene.drain_commands();
    assert!(commands.is_empty());
    scene.reset();
    assert_eq!(scene.drain_commands()[0], SceneCommand::Clear);
}
