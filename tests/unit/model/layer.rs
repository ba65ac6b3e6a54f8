use super::*;

fn font() -> Layer {
    Layer::new(
        "f1",
        "Text Layer",
        LayerContent::Font(FontContent {
            text: "hi".to_string(),
            ..FontContent::default()
        }),
    )
}

#[test]
fn new_layer_uses_common_defaults() {
    let l = font();
    assert!(l.visible());
    assert_eq!(l.z_index(), DEFAULT_Z_INDEX);
    assert_eq!(l.slot(), Slot::CenterMiddle);
    assert_eq!(l.layer_type(), LayerType::Font);
    assert_eq!(l.offset(), (0, 0));
}

#[test]
fn with_ers_leave_receiver_untouched() {
    let before = font();
    let snapshot = before.clone();
    let after = before
        .with_offset_x(12)
        .with_slot(Slot::TopLeft)
        .with_size(Some(32));
    assert_eq!(before, snapshot);
    assert_eq!(after.offset(), (12, 0));
    assert_eq!(after.slot(), Slot::TopLeft);
    assert_eq!(after.size(), Some(32));
    assert_eq!(after.id(), before.id());
    assert_eq!(after.name(), before.name());
}

#[test]
fn fields_missing_from_variant_are_ignored() {
    let icon = Layer::new("i1", "Icon Layer", LayerContent::default_for(LayerType::Icon));
    assert_eq!(icon.with_width(Some(10)), icon);
    assert_eq!(icon.with_text("nope"), icon);
    assert_eq!(icon.width(), None);

    let image = Layer::new("m1", "Image Layer", LayerContent::default_for(LayerType::Image));
    assert_eq!(image.with_size(Some(5)).size(), None);
    assert_eq!(image.with_height(Some(90)).content(), &LayerContent::Image(ImageContent {
        height: Some(90),
        ..ImageContent::default()
    }));
}

#[test]
fn icon_names_drop_namespace() {
    assert_eq!(normalize_icon("tabler:star", "photo"), "star");
    assert_eq!(normalize_icon("a:b:c", "photo"), "c");
    assert_eq!(normalize_icon("", "photo"), "photo");

    let icon = Layer::new("i1", "Icon Layer", LayerContent::default_for(LayerType::Icon));
    let changed = icon.with_icon("mdi:heart");
    assert!(matches!(changed.content(), LayerContent::Icon(c) if c.icon == "heart"));
}

#[test]
fn normalized_derives_html_and_defaults() {
    let content = LayerContent::Font(FontContent {
        text: "**Hi** there\nfriend".to_string(),
        ..FontContent::default()
    })
    .normalized();
    let LayerContent::Font(font) = content else {
        panic!("expected font");
    };
    assert_eq!(font.html, "<strong>Hi</strong> there<br>friend");

    let callout = LayerContent::IconCallout(IconCalloutContent {
        icon: String::new(),
        color: String::new(),
        ..IconCalloutContent::default()
    })
    .normalized();
    assert!(matches!(
        callout,
        LayerContent::IconCallout(ref c) if c.icon == "info-circle" && c.color == "#000000"
    ));
}

#[test]
fn serializes_as_flat_record() {
    let l = font().with_z_index(3).with_slot(Slot::BottomRight);
    let v = serde_json::to_value(&l).unwrap();
    assert_eq!(v["id"], "f1");
    assert_eq!(v["type"], "font");
    assert_eq!(v["zIndex"], 3);
    assert_eq!(v["slot"], "bottom-right");
    assert_eq!(v["offsetX"], 0);
    assert_eq!(v["styleId"], "");
    assert!(v["size"].is_null());
}

#[test]
fn content_defaults_fill_missing_fields() {
    let icon: IconContent = serde_json::from_value(serde_json::json!({ "color": null })).unwrap();
    assert_eq!(icon.size, Some(48));
    assert_eq!(icon.color, "");
    let icon: IconContent = serde_json::from_value(serde_json::json!({ "size": null })).unwrap();
    assert_eq!(icon.size, None);

    let image: ImageContent = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(image.width, Some(200));
    assert_eq!(image.height, None);
}
