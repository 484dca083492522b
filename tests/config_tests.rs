use kumi::core::models::BuildMode;
use kumi::utils::{ConfigLoader, CONFIG_FILE_NAME};
use std::path::PathBuf;

fn demo_app_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo-app")
}

#[test]
fn test_demo_app_config_loads() {
    let config = ConfigLoader::load_from_file(&demo_app_root())
        .unwrap()
        .expect("fixture should carry a config file");

    assert_eq!(config.out_dir, Some("build".to_string()));
    assert_eq!(config.port, Some(4000));
    assert!(config.mode.is_none());
    assert!(config.source_dir.is_none());
}

#[test]
fn test_flags_beat_demo_app_config() {
    let root = demo_app_root();
    let file_config = ConfigLoader::load_from_file(&root).unwrap();

    let (mode, layout) = ConfigLoader::merge_with_cli(
        file_config,
        root,
        Some(BuildMode::Production),
        Some("public"),
        Some(5001),
    );

    assert_eq!(mode, BuildMode::Production);
    assert_eq!(layout.out_dir, "public");
    assert_eq!(layout.port, 5001);
}

#[test]
fn test_demo_app_layout_paths() {
    let root = demo_app_root();
    let file_config = ConfigLoader::load_from_file(&root).unwrap();
    let (_, layout) = ConfigLoader::merge_with_cli(file_config, root.clone(), None, None, None);

    assert_eq!(layout.out_path(), root.join("build"));
    assert_eq!(layout.source_path(), root.join("src"));
    assert!(
        layout.favicon_path().exists(),
        "fixture favicon should exist at the resolved path"
    );
    assert!(layout.source_path().join("index.html").exists());
    assert!(layout.source_path().join("index.jsx").exists());
    assert!(layout.source_path().join("analytics.ts").exists());
}

#[test]
fn test_starter_config_parses_back() {
    let temp_dir = tempfile::tempdir().unwrap();

    let path = ConfigLoader::write_starter(temp_dir.path(), false).unwrap();
    assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);

    let loaded = ConfigLoader::load_from_file(temp_dir.path())
        .unwrap()
        .expect("starter file should load");
    assert_eq!(loaded.source_dir, Some("src".to_string()));
    assert_eq!(loaded.out_dir, Some("dist".to_string()));
    assert_eq!(loaded.port, Some(3000));
}
