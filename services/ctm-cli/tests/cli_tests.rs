//! Runs the `ctm-query` binary against a small CDL model.

use std::fs;
use std::process::{Command, Output};

use tempfile::{tempdir, NamedTempFile};
use test_utils::{write_temp_file, LEE_STYLE_CDL};

fn model_file() -> NamedTempFile {
    write_temp_file(LEE_STYLE_CDL, ".cdl")
}

fn ctm_query(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ctm-query"))
        .args(args)
        .env_remove("CTM_REGISTRY")
        .env_remove("CTM_MODEL_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("run ctm-query")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_profile_to_stdout() {
    let model = model_file();
    let path = model.path().to_str().unwrap();
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        path,
        "profile",
        "--lat=34.5",
        "--lon=-119.5",
        "--depth-start=0",
        "--depth-end=20000",
        "--depth-step=5000",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Title: CTM 1D Profile");
    assert_eq!(lines[1], "# CTM(abbr): lee25");
    assert!(lines.contains(&"# Average dT/dz(°C/km): 25.000"));

    let data: Vec<&str> = lines.iter().copied().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(data[0], "longitude[°],latitude[°],depth[m],temperature[°C]");
    assert_eq!(data.len(), 6);
    assert_eq!(data[1], "-119.500000,34.500000,0.000000,12.500000");
}

#[test]
fn test_point_json_to_file() {
    let model = model_file();
    let dir = tempdir().unwrap();
    let out = dir.path().join("point.json");
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        model.path().to_str().unwrap(),
        "--format",
        "json",
        "--output",
        out.to_str().unwrap(),
        "point",
        "--lat",
        "35",
        "--lon",
        "-118",
        "--depth",
        "10000",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"Title\": \"CTM 0D Point\""));
    assert!(text.contains("\"Temperature(°C)\": \"267.000000\""));
}

#[test]
fn test_cross_section_gradients_file() {
    let model = model_file();
    let dir = tempdir().unwrap();
    let gradients = dir.path().join("gradients.csv");
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        model.path().to_str().unwrap(),
        "--output",
        dir.path().join("section.csv").to_str().unwrap(),
        "--gradients",
        gradients.to_str().unwrap(),
        "cross-section",
        "--lat-start=34.2",
        "--lon-start=-119.8",
        "--lat-end=34.8",
        "--lon-end=-118.2",
        "--depth-start=0",
        "--depth-end=20000",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = fs::read_to_string(&gradients).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "longitude[°],latitude[°],dTdz[°C/km]");
    assert_eq!(lines.len(), 122);
    assert!(lines[1..].iter().all(|l| l.ends_with(",25.000000")));
}

#[test]
fn test_batch_writes_one_file_per_query() {
    let model = model_file();
    let dir = tempdir().unwrap();
    let queries = write_temp_file(
        r#"
- type: point
  lon: -119
  lat: 34.5
  depth: 5000
- type: vertical_profile
  lon: -119
  lat: 34.5
  depth_start: 0
  depth_end: 20000
  depth_step: 1000
- type: horizontal_slice
  lon_start: -120
  lat_start: 34
  lon_end: -118
  lat_end: 35
  depth: 1000
"#,
        ".yaml",
    );
    let out_dir = dir.path().join("results");
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        model.path().to_str().unwrap(),
        "batch",
        "--file",
        queries.path().to_str().unwrap(),
        "--output-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let mut names: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["0_point_Lee_2025.csv", "1_profile_Lee_2025.csv", "2_slice_Lee_2025.csv"]
    );

    let profile = fs::read_to_string(out_dir.join("1_profile_Lee_2025.csv")).unwrap();
    assert_eq!(profile.lines().filter(|l| !l.starts_with('#')).count(), 22);
}

#[test]
fn test_out_of_domain_fails() {
    let model = model_file();
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        model.path().to_str().unwrap(),
        "point",
        "--lat=34.5",
        "--lon=-119",
        "--depth=25000",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("depth[m]=25000 is out of model domain [0, 20000]"));
}

#[test]
fn test_negative_depth_step_reaches_query_validation() {
    let model = model_file();
    let output = ctm_query(&[
        "--model",
        "Lee_2025",
        "--model-path",
        model.path().to_str().unwrap(),
        "profile",
        "--lat",
        "34.5",
        "--lon",
        "-119.5",
        "--depth-start",
        "0",
        "--depth-end",
        "20000",
        "--depth-step",
        "-5000",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("depth step must be positive, got -5000"));
}

#[test]
fn test_unknown_model_fails() {
    let model = model_file();
    let output = ctm_query(&[
        "--model",
        "NotAModel",
        "--model-path",
        model.path().to_str().unwrap(),
        "point",
        "--lat=34.5",
        "--lon=-119",
        "--depth=0",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown model: NotAModel"));
}

#[test]
fn test_wrong_model_for_file_fails() {
    let model = model_file();
    let output = ctm_query(&[
        "--model",
        "Boyd_2019",
        "--model-path",
        model.path().to_str().unwrap(),
        "point",
        "--lat=34.5",
        "--lon=-119",
        "--depth=0",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_models_lists_registry() {
    let output = ctm_query(&["models"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    for name in ["Lee_2025", "Shinevar_2018", "Boyd_2019"] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}
