use super::*;
use crate::edit::form::LayerFormRegistry;
use crate::model::layer::{IconCalloutContent, Layer, LayerContent};
use crate::preview::surface::RenderSurface;
use crate::store::assets::{AssetChain, ImageRecord};
use crate::store::document::MemoryStore;
use std::sync::Arc;
use serde_json::json;

fn creation() -> Creation {
    Creation::new("c", "Preview", 400, 300).with_layers(vec![
        Layer::new("a", "Icon", LayerContent::default_for(LayerType::Icon)),
        Layer::new("b", "Text", LayerContent::default_for(LayerType::Font)),
    ])
}

fn form() -> FormValues {
    FormValues::new()
        .with("backgroundScale", "1.5")
        .with("backgroundX", "-20")
        .with("backgroundY", "35")
        .with("layer-1-offsetX", "10")
        .with("layer-1-offsetY", "-5")
        .with("layer-1-size", "")
        .with("layer-1-color", "#ff0000")
        .with("layer-1-name", "**Big** news")
}

#[test]
fn background_fields_send_all_three_values() {
    let msg = PreviewMessage::for_field("backgroundX", &form(), &creation()).unwrap();
    assert_eq!(
        msg,
        PreviewMessage::UpdateBackground(BackgroundPatch {
            scale: Some(1.5),
            x: Some(-20),
            y: Some(35),
        })
    );
}

#[test]
fn layer_field_sends_current_geometry() {
    let msg = PreviewMessage::for_field("layer-1-offsetX", &form(), &creation()).unwrap();
    let PreviewMessage::UpdateLayer(patch) = msg else {
        panic!("expected layer patch");
    };
    assert_eq!(patch.index, 1);
    assert_eq!(patch.offset_x, Some(10));
    assert_eq!(patch.offset_y, Some(-5));
    assert_eq!(patch.size, Some(None));
    assert_eq!(patch.color.as_deref(), Some("#ff0000"));
    assert_eq!(patch.width, None);
    assert_eq!(patch.html, None);
}

#[test]
fn text_edit_carries_rendered_html() {
    let msg = PreviewMessage::for_field("layer-1-name", &form(), &creation()).unwrap();
    let PreviewMessage::UpdateLayer(patch) = msg else {
        panic!("expected layer patch");
    };
    assert_eq!(patch.html.as_deref(), Some("<strong>Big</strong> news"));
}

#[test]
fn renaming_a_non_text_layer_sends_no_markup() {
    let f = FormValues::new()
        .with("layer-0-name", "Renamed")
        .with("layer-0-offsetX", "4");
    let msg = PreviewMessage::for_field("layer-0-name", &f, &creation()).unwrap();
    let PreviewMessage::UpdateLayer(patch) = msg else {
        panic!("expected layer patch");
    };
    assert_eq!(patch.offset_x, Some(4));
    assert_eq!(patch.html, None);
}

#[test]
fn callout_rename_keeps_preview_in_line_with_commit() {
    let callout = Layer::new(
        "k",
        "Label",
        LayerContent::IconCallout(IconCalloutContent {
            text: "Body **text**".to_string(),
            ..IconCalloutContent::default()
        })
        .normalized(),
    );
    let c = Creation::new("c", "Callout", 400, 300).with_layers(vec![callout]);
    let f = FormValues::new()
        .with("layer-0-name", "Renamed label")
        .with("layer-0-text", "Body **text**");

    let assets = AssetChain::new(Arc::new(MemoryStore::<ImageRecord>::new()));
    let mut surface = RenderSurface::from_creation(&c, &assets);
    let msg = PreviewMessage::for_field("layer-0-name", &f, &c).unwrap();
    surface.apply(&msg);

    let committed = LayerFormRegistry::default().apply(&c, &f);
    assert_eq!(committed.layer(0).unwrap().name(), "Renamed label");
    assert_eq!(
        surface.node(0).unwrap().inner_html.as_deref(),
        committed.layer(0).unwrap().html()
    );
    assert_eq!(
        surface.node(0).unwrap().inner_html.as_deref(),
        Some("Body <strong>text</strong>")
    );

    let msg = PreviewMessage::for_field("layer-0-text", &f, &c).unwrap();
    let PreviewMessage::UpdateLayer(patch) = msg else {
        panic!("expected layer patch");
    };
    assert_eq!(patch.html.as_deref(), Some("Body <strong>text</strong>"));
}

#[test]
fn non_live_and_unknown_names_send_nothing() {
    let (f, c) = (form(), creation());
    for name in ["title", "width", "backgroundImageId", "layer-1-slot", "layer-1-styleId", "whatever"] {
        assert_eq!(PreviewMessage::for_field(name, &f, &c), None, "{name}");
    }
}

#[test]
fn wire_shape() {
    let msg = PreviewMessage::UpdateLayer(LayerPatch {
        index: 2,
        offset_x: Some(10),
        offset_y: Some(-5),
        size: Some(None),
        ..LayerPatch::default()
    });
    let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
    assert_eq!(
        v,
        json!({ "type": "UPDATE_LAYER", "data": { "index": 2, "offsetX": 10, "offsetY": -5, "size": null } })
    );

    let parsed: PreviewMessage = serde_json::from_value(v).unwrap();
    assert_eq!(parsed, msg);

    let bg: PreviewMessage =
        serde_json::from_value(json!({ "type": "UPDATE_BACKGROUND", "data": { "scale": 2.0 } }))
            .unwrap();
    assert_eq!(
        bg,
        PreviewMessage::UpdateBackground(BackgroundPatch {
            scale: Some(2.0),
            ..BackgroundPatch::default()
        })
    );
}
