use buildtidy::{
    apply, find_stale, run_cycle_pass, ChunkOutput, CleanupOutcome, Options, Settings, TidyError,
};
use std::cell::Cell;
use std::fs;
use std::rc::Rc;
use tempfile::tempdir;

const HASH: &str = "ab12e";

fn setup_output_dir() -> tempfile::TempDir {
    let dir = tempdir().unwrap();

    // Two prior cycles' leftovers, one unrelated file, and the current
    // cycle's fresh outputs.
    for name in [
        "app.1234.js",
        "app.1234.js.map",
        "app.5678.js",
        "app.5678.js.map",
        "random.js",
        "app.ab12e.js",
        "app.ab12e.js.map",
    ] {
        fs::write(dir.path().join(name), name).unwrap();
    }

    dir
}

fn current_cycle() -> Vec<ChunkOutput> {
    vec![ChunkOutput {
        hash: HASH.to_string(),
        emitted: true,
        files: vec!["app.ab12e.js".to_string(), "app.ab12e.js.map".to_string()],
    }]
}

fn settings_for(dir: &tempfile::TempDir, dry_run: bool) -> Settings {
    let opts = Options {
        dry_run,
        ..Options::default()
    };
    Settings::resolve(&opts, dir.path().to_str().unwrap()).unwrap()
}

fn counting_continuation() -> (Rc<Cell<u32>>, Box<dyn FnOnce()>) {
    let fired = Rc::new(Cell::new(0u32));
    let handle = Rc::clone(&fired);
    (fired, Box::new(move || handle.set(handle.get() + 1)))
}

fn candidate_names(settings: &Settings, chunks: &[ChunkOutput]) -> Vec<String> {
    let mut names: Vec<String> = find_stale(chunks, settings)
        .unwrap()
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_finds_exactly_the_stale_siblings() {
    let dir = setup_output_dir();
    let settings = settings_for(&dir, false);

    assert_eq!(
        candidate_names(&settings, &current_cycle()),
        vec![
            "app.1234.js",
            "app.1234.js.map",
            "app.5678.js",
            "app.5678.js.map"
        ]
    );
}

#[test]
fn test_deletes_stale_files_and_keeps_current_outputs() {
    let dir = setup_output_dir();
    let settings = settings_for(&dir, false);
    let (fired, done) = counting_continuation();

    let outcomes = run_cycle_pass(&current_cycle(), &settings, done).unwrap();

    assert_eq!(fired.get(), 1);
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes
        .iter()
        .all(|outcome| matches!(outcome, CleanupOutcome::Deleted(_))));

    assert!(!dir.path().join("app.1234.js").exists());
    assert!(!dir.path().join("app.1234.js.map").exists());
    assert!(!dir.path().join("app.5678.js").exists());
    assert!(!dir.path().join("app.5678.js.map").exists());

    assert!(dir.path().join("app.ab12e.js").exists());
    assert!(dir.path().join("app.ab12e.js.map").exists());
    assert!(dir.path().join("random.js").exists());
}

#[test]
fn test_second_pass_finds_nothing() {
    let dir = setup_output_dir();
    let settings = settings_for(&dir, false);

    let (_, done) = counting_continuation();
    run_cycle_pass(&current_cycle(), &settings, done).unwrap();

    assert!(find_stale(&current_cycle(), &settings).unwrap().is_empty());
}

#[test]
fn test_dry_run_reports_same_candidates_without_deleting() {
    let dir = setup_output_dir();
    let real = settings_for(&dir, false);
    let dry = settings_for(&dir, true);

    // Same directory snapshot, same candidate set.
    let real_candidates = candidate_names(&real, &current_cycle());
    let dry_candidates = candidate_names(&dry, &current_cycle());
    assert_eq!(real_candidates, dry_candidates);

    let (fired, done) = counting_continuation();
    let candidates = find_stale(&current_cycle(), &dry).unwrap();
    let outcomes = apply(&candidates, &dry, done).unwrap();

    assert_eq!(fired.get(), 1);
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes
        .iter()
        .all(|outcome| matches!(outcome, CleanupOutcome::Reported(_))));

    // Nothing was touched, the stale files included.
    for name in [
        "app.1234.js",
        "app.1234.js.map",
        "app.5678.js",
        "app.5678.js.map",
        "random.js",
        "app.ab12e.js",
        "app.ab12e.js.map",
    ] {
        assert!(dir.path().join(name).exists(), "{name} should still exist");
    }
}

#[test]
fn test_unemitted_chunk_contributes_no_candidates() {
    let dir = setup_output_dir();
    let settings = settings_for(&dir, false);

    let chunks = vec![ChunkOutput {
        hash: HASH.to_string(),
        emitted: false,
        files: vec!["app.ab12e.js".to_string(), "app.ab12e.js.map".to_string()],
    }];

    assert!(find_stale(&chunks, &settings).unwrap().is_empty());
}

#[test]
fn test_empty_directory_is_not_an_error() {
    let dir = tempdir().unwrap();
    let settings = settings_for(&dir, false);

    let (fired, done) = counting_continuation();
    let outcomes = run_cycle_pass(&current_cycle(), &settings, done).unwrap();

    assert_eq!(fired.get(), 1);
    assert!(outcomes.is_empty());
}

#[test]
fn test_deletion_failure_propagates_and_still_completes() {
    let dir = setup_output_dir();
    let settings = settings_for(&dir, false);

    // A directory matching the derived pattern makes remove_file fail.
    fs::create_dir(dir.path().join("app.9999.js")).unwrap();

    let (fired, done) = counting_continuation();
    let result = run_cycle_pass(&current_cycle(), &settings, done);

    assert!(matches!(result, Err(TidyError::Remove { .. })));
    // Completion and error propagation are independent channels.
    assert_eq!(fired.get(), 1);
}
