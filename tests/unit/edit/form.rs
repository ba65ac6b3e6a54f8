use std::sync::Arc;

use super::*;
use crate::factory::layer_factory::LayerFactory;
use crate::foundation::ids::SequentialIds;
use crate::model::layer::LayerContent;
use serde_json::json;

fn factory() -> LayerFactory {
    LayerFactory::new(Arc::new(SequentialIds::new("id")))
}

fn creation() -> Creation {
    let f = factory();
    f.blank_creation("Form", 800, 600)
        .add_layer(f.create_layer("font", &json!({ "text": "old" })).unwrap())
        .add_layer(f.create_layer("icon", &json!({})).unwrap())
        .add_layer(f.create_layer("icon-callout", &json!({})).unwrap())
        .add_layer(f.create_layer("image", &json!({ "imageId": "a" })).unwrap())
}

#[test]
fn creation_fields_apply_when_valid() {
    let c = creation();
    let form = FormValues::new()
        .with("title", "New title")
        .with("width", "1200")
        .with("height", "0")
        .with("backgroundImageId", "bg-7")
        .with("backgroundScale", "1.75")
        .with("backgroundX", "-30");
    let next = apply_creation_fields(&c, &form);
    assert_eq!(next.title(), "New title");
    assert_eq!(next.width(), 1200);
    assert_eq!(next.height(), 600);
    assert_eq!(next.background_image_id(), Some("bg-7"));
    assert_eq!(next.background_scale(), 1.75);
    assert_eq!(next.background_x(), -30);
    assert_eq!(next.background_y(), 0);
    assert!(next.shares_layers_with(&c));
}

#[test]
fn invalid_dimension_and_scale_keep_prior_values() {
    let c = creation();
    let form = FormValues::new()
        .with("width", "wide")
        .with("height", "-5")
        .with("backgroundScale", "0");
    assert_eq!(apply_creation_fields(&c, &form), c);
}

#[test]
fn cleared_background_means_none() {
    let c = creation().with_background_image_id(Some("bg".to_string()));
    let next = apply_creation_fields(&c, &FormValues::new().with("backgroundImageId", ""));
    assert_eq!(next.background_image_id(), None);
}

#[test]
fn font_adapter_derives_html_and_caps_name() {
    let c = creation();
    let long = "**Bold** start of a fairly long headline text";
    let form = FormValues::new()
        .with("layer-0-name", long)
        .with("layer-0-size", "")
        .with("layer-0-width", "320")
        .with("layer-0-offsetX", "abc")
        .with("layer-0-slot", "bottom-left");
    let registry = LayerFormRegistry::default();
    let layer = registry
        .get(LayerType::Font)
        .unwrap()
        .extract_updated(c.layer(0).unwrap(), &form, 0);
    assert_eq!(layer.name().chars().count(), 30);
    assert_eq!(layer.name(), &long[..30]);
    assert_eq!(
        layer.html(),
        Some("<strong>Bold</strong> start of a fairly long headline text")
    );
    assert_eq!(layer.size(), None);
    assert_eq!(layer.width(), Some(320));
    assert_eq!(layer.offset(), (0, 0));
    assert_eq!(layer.slot(), Slot::BottomLeft);
}

#[test]
fn icon_and_callout_adapters() {
    let c = creation();
    let form = FormValues::new()
        .with("layer-1-icon", "tabler:bolt")
        .with("layer-1-color", "#123456")
        .with("layer-1-size", "64")
        .with("layer-2-text", "*note*")
        .with("layer-2-width", "150")
        .with("layer-2-visible", "false");
    let next = LayerFormRegistry::default().apply(&c, &form);

    let icon = next.layer(1).unwrap();
    assert!(matches!(icon.content(), LayerContent::Icon(i) if i.icon == "bolt"));
    assert_eq!(icon.color(), Some("#123456"));
    assert_eq!(icon.size(), Some(64));

    let callout = next.layer(2).unwrap();
    assert_eq!(callout.html(), Some("<em>note</em>"));
    assert_eq!(callout.width(), Some(150));
    assert!(!callout.visible());

    assert_eq!(next.layer(0), c.layer(0));
    assert_eq!(next.layer(3), c.layer(3));
}

#[test]
fn image_adapter_updates_reference_and_size() {
    let c = creation();
    let form = FormValues::new()
        .with("layer-3-imageId", "b")
        .with("layer-3-height", "120");
    let next = LayerFormRegistry::default().apply(&c, &form);
    let image = next.layer(3).unwrap();
    assert_eq!(image.image_id(), Some("b"));
    assert_eq!(image.height(), Some(120));
    assert_eq!(image.width(), Some(200));
}

#[test]
fn untouched_form_returns_equal_creation() {
    let c = creation();
    let form = FormValues::new().with("layer-0-styleId", "").with("layer-9-size", "10");
    let next = LayerFormRegistry::default().apply(&c, &form);
    assert_eq!(next, c);
    assert!(next.shares_layers_with(&c));
}

#[test]
fn registry_without_adapter_skips_layer() {
    let c = creation();
    let registry = LayerFormRegistry::empty().register(IconFormAdapter);
    let form = FormValues::new()
        .with("layer-0-name", "ignored")
        .with("layer-1-color", "#abcdef");
    let next = registry.apply(&c, &form);
    assert_eq!(next.layer(0), c.layer(0));
    assert_eq!(next.layer(1).unwrap().color(), Some("#abcdef"));
}
