use super::*;
use serde_json::json;

fn temp_root(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "collage_presets_{tag}_{}_{}",
        std::process::id(),
        nanos
    ))
}

#[test]
fn dir_store_reads_layer_and_template_files() {
    let root = temp_root("read");
    std::fs::create_dir_all(root.join("layers")).unwrap();
    std::fs::create_dir_all(root.join("templates")).unwrap();
    std::fs::write(root.join("layers/icon.json"), r#"{ "icon": "star" }"#).unwrap();
    std::fs::write(root.join("templates/default.json"), r#"{ "title": "Hello" }"#).unwrap();

    let store = DirPresetStore::new(&root);
    assert_eq!(store.fetch_preset(LayerType::Icon).unwrap(), json!({ "icon": "star" }));
    assert_eq!(store.fetch_template("default").unwrap()["title"], "Hello");

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn dir_store_missing_and_malformed() {
    let root = temp_root("missing");
    std::fs::create_dir_all(root.join("layers")).unwrap();
    std::fs::write(root.join("layers/font.json"), "{ nope").unwrap();

    let store = DirPresetStore::new(&root);
    assert!(matches!(
        store.fetch_preset(LayerType::Image),
        Err(CollageError::PresetNotFound(ref k)) if k == "image"
    ));
    assert!(matches!(
        store.fetch_preset(LayerType::Font),
        Err(CollageError::Serde(_))
    ));
    assert!(matches!(
        store.fetch_template("../escape"),
        Err(CollageError::PresetNotFound(_))
    ));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn memory_store_lookups() {
    let store = MemoryPresetStore::new()
        .with_layer(LayerType::Font, json!({ "text": "hi" }))
        .with_template("default", json!({ "title": "T" }));
    assert_eq!(store.fetch_preset(LayerType::Font).unwrap()["text"], "hi");
    assert!(store.fetch_preset(LayerType::Icon).is_err());
    assert!(store.fetch_template("default").is_ok());
    assert!(store.fetch_template("other").is_err());
}
