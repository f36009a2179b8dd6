//! End-to-end tests against a real `data.json`:
//! - First start without a file
//! - Save, then reload after an external file modification
//! - Corrupted files surfacing as retrieval failures

mod common;

use std::fs;

use plugin_settings::{
    PluginPaths, SettingsController, SettingsError, SettingsLifecycle, TypedDefaults,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use common::init_tracing;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Editor {
    theme: String,
    font_size: u32,
    recent: Vec<String>,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            font_size: 14,
            recent: Vec::new(),
        }
    }
}

fn controller_for(paths: &PluginPaths) -> SettingsController {
    SettingsController::builder()
        .with_defaults(TypedDefaults::<Editor>::new())
        .with_plugin_paths(paths)
        .build()
        .expect("build controller")
}

#[tokio::test]
async fn first_start_uses_defaults_and_creates_no_file() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let paths = PluginPaths::with_base_path(tmp.path(), "editor-plugin");
    let controller = controller_for(&paths);

    controller.load_settings().await.expect("load");

    assert!(!paths.data_file().exists());
    let editor: Editor = controller.settings().get_as().await.unwrap();
    assert_eq!(editor, Editor::default());
}

#[tokio::test]
async fn save_then_reload_after_external_modification() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let paths = PluginPaths::with_base_path(tmp.path(), "editor-plugin");
    let controller = controller_for(&paths);
    controller.load_settings().await.expect("load");

    controller
        .settings()
        .write()
        .await
        .insert("font_size".into(), json!(18));
    controller.save_settings().await.expect("save");

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(paths.data_file()).unwrap()).unwrap();
    assert_eq!(
        on_disk,
        json!({ "theme": "light", "font_size": 18, "recent": [] })
    );

    // a sync tool rewrites the file with a partial payload
    fs::write(
        paths.data_file(),
        r#"{ "theme": "dark", "recent": ["a.md", "b.md"] }"#,
    )
    .unwrap();

    let handle = controller.settings().clone();
    controller
        .on_external_settings_change()
        .await
        .expect("reload after external change");

    assert!(handle.ptr_eq(controller.settings()));
    let editor: Editor = handle.get_as().await.unwrap();
    assert_eq!(
        editor,
        Editor {
            theme: "dark".into(),
            font_size: 14,
            recent: vec!["a.md".into(), "b.md".into()],
        }
    );
}

#[tokio::test]
async fn corrupted_file_fails_load_with_defaults_applied() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let paths = PluginPaths::with_base_path(tmp.path(), "editor-plugin");
    paths.ensure_plugin_dir().unwrap();
    fs::write(paths.data_file(), "{ \"theme\": ").unwrap();

    let controller = controller_for(&paths);
    let err = controller.load_settings().await.unwrap_err();

    assert!(matches!(err, SettingsError::Retrieval(_)), "got {err:?}");
    assert_eq!(
        Value::Object(controller.settings().snapshot().await),
        json!({ "theme": "light", "font_size": 14, "recent": [] })
    );
}

#[tokio::test]
async fn non_object_file_is_ignored() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let paths = PluginPaths::with_base_path(tmp.path(), "editor-plugin");
    paths.ensure_plugin_dir().unwrap();
    fs::write(paths.data_file(), "\"not an object\"").unwrap();

    let controller = controller_for(&paths);
    controller.load_settings().await.expect("load");

    let editor: Editor = controller.settings().get_as().await.unwrap();
    assert_eq!(editor, Editor::default());
}
