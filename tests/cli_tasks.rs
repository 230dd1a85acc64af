//! End-to-end task runs against the file-backed engine.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scorebook::{
    AliasTable, OmrEngine, OutputSpec, ParameterModel, Step, TaskKind, build_tasks,
};

// Executing a task pushes onto a process-wide log-context stack, so tests
// that run tasks take this lock.
static SERIAL: Mutex<()> = Mutex::new(());

fn engine(base: &Path) -> OmrEngine {
    OmrEngine::new(Some(base.to_path_buf()), AliasTable::default())
}

/// A persisted three-sheet book, sheet 3 invalid.
fn write_book(path: &Path, radix: &str) {
    let json = format!(
        r#"{{
  "radix": "{radix}",
  "source": "{radix}.png",
  "sheet_count": 3,
  "stubs": [
    {{"number": 1, "valid": true, "step": null}},
    {{"number": 2, "valid": true, "step": null}},
    {{"number": 3, "valid": false, "step": null}}
  ]
}}"#
    );
    fs::write(path, json).unwrap();
}

#[test]
fn input_task_reaches_step_without_producing_outputs() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("a.png");
    fs::write(&input, "png bytes").unwrap();

    let params = ParameterModel {
        batch: true,
        step: Some(Step::Binary),
        inputs: vec![input],
        ..ParameterModel::default()
    };

    let tasks = build_tasks(&params, &AliasTable::default());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, TaskKind::Input);

    tasks[0].execute(&engine(dir.path()), &params, false).unwrap();

    // The book folder was created, but nothing was persisted or exported.
    let folder = dir.path().join("a");
    assert!(folder.is_dir());
    assert!(!folder.join("a.omr").exists());
    assert!(!folder.join("a.mxl").exists());
}

#[test]
fn book_task_prints_to_folder_and_advances_selected_sheet_only() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let book_path = dir.path().join("b.omr");
    write_book(&book_path, "b");
    let out = dir.path().join("out");

    let params = ParameterModel {
        batch: true,
        step: Some(Step::Grid),
        books: vec![book_path.clone()],
        sheet_ids: Some([2].into_iter().collect()),
        print: OutputSpec {
            enabled: false,
            file: None,
            folder: Some(out.clone()),
        },
        // Save back so the advanced step state is observable on disk.
        save: OutputSpec {
            enabled: false,
            file: Some(dir.path().join("b-after.omr")),
            folder: None,
        },
        ..ParameterModel::default()
    };

    let tasks = build_tasks(&params, &AliasTable::default());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, TaskKind::Book);

    tasks[0].execute(&engine(dir.path()), &params, false).unwrap();

    // Print went to the folder, named after the radix, no explicit file.
    assert!(fs::read(out.join("b.pdf")).unwrap().starts_with(b"%PDF"));

    let saved = fs::read_to_string(dir.path().join("b-after.omr")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    let stubs = json["stubs"].as_array().unwrap();
    assert_eq!(stubs[0]["step"], serde_json::Value::Null);
    assert_eq!(stubs[1]["step"], "grid");
    assert_eq!(stubs[2]["step"], serde_json::Value::Null);
}

#[test]
fn export_prefers_explicit_file_over_folder() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let book_path = dir.path().join("c.omr");
    write_book(&book_path, "c");

    let explicit = dir.path().join("elsewhere").join("score.mxl");
    let params = ParameterModel {
        batch: true,
        books: vec![book_path],
        export: OutputSpec {
            enabled: true,
            file: Some(explicit.clone()),
            folder: Some(dir.path().join("ignored")),
        },
        ..ParameterModel::default()
    };

    let tasks = build_tasks(&params, &AliasTable::default());
    tasks[0].execute(&engine(dir.path()), &params, false).unwrap();

    assert!(explicit.exists());
    assert!(!dir.path().join("ignored").exists());
}

#[test]
fn failed_task_leaves_prior_task_outputs_untouched() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.omr");
    write_book(&good, "good");
    let saved = dir.path().join("kept.omr");

    let params = ParameterModel {
        batch: true,
        books: vec![good, dir.path().join("missing.omr")],
        save: OutputSpec {
            enabled: false,
            file: Some(saved.clone()),
            folder: None,
        },
        ..ParameterModel::default()
    };

    let eng = engine(dir.path());
    let tasks = build_tasks(&params, &AliasTable::default());
    assert!(tasks[0].execute(&eng, &params, false).is_ok());
    let persisted = fs::read_to_string(&saved).unwrap();

    assert!(tasks[1].execute(&eng, &params, false).is_err());
    assert_eq!(fs::read_to_string(&saved).unwrap(), persisted);
}

#[test]
fn script_task_runs_through_load_alone() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("piece.png");
    fs::write(&source, "png bytes").unwrap();
    let script = dir.path().join("run.script.json");
    fs::write(
        &script,
        format!(
            r#"{{"source": "{}", "steps": ["binary"]}}"#,
            source.display()
        ),
    )
    .unwrap();

    let params = ParameterModel {
        batch: true,
        scripts: vec![script],
        // Output requests apply to input/book pipelines, not scripts.
        export: OutputSpec {
            enabled: true,
            file: None,
            folder: Some(dir.path().join("never")),
        },
        ..ParameterModel::default()
    };

    let tasks = build_tasks(&params, &AliasTable::default());
    assert_eq!(tasks[0].kind, TaskKind::Script);
    tasks[0].execute(&engine(dir.path()), &params, false).unwrap();

    assert!(!dir.path().join("never").exists());
}

#[test]
fn load_failure_propagates_from_task() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.omr");
    fs::write(&bad, "definitely not a book").unwrap();

    let params = ParameterModel {
        batch: true,
        books: vec![bad],
        ..ParameterModel::default()
    };
    let tasks = build_tasks(&params, &AliasTable::default());
    let err = tasks[0]
        .execute(&engine(dir.path()), &params, false)
        .unwrap_err();
    assert!(matches!(err, scorebook::Error::Load { .. }));
}

#[test]
fn mixed_run_keeps_group_order() {
    let params = ParameterModel {
        inputs: vec![PathBuf::from("i.png")],
        arguments: vec![PathBuf::from("arg.png")],
        books: vec![PathBuf::from("b.omr")],
        scripts: vec![PathBuf::from("s.script.json")],
        ..ParameterModel::default()
    };
    let kinds: Vec<TaskKind> = build_tasks(&params, &AliasTable::default())
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![TaskKind::Input, TaskKind::Input, TaskKind::Book, TaskKind::Script]
    );
}
