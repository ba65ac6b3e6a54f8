use std::sync::Arc;

use super::*;
use crate::factory::layer_factory::LayerFactory;
use crate::foundation::ids::SequentialIds;
use crate::model::creation::Creation;
use crate::preview::message::{BackgroundPatch, LayerPatch};
use crate::store::assets::{AssetChain, ImageRecord};
use crate::store::document::MemoryStore;
use serde_json::json;

fn creation() -> Creation {
    let f = LayerFactory::new(Arc::new(SequentialIds::new("id")));
    f.blank_creation("Live", 100, 100)
        .add_layer(f.create_layer("icon", &json!({})).unwrap())
}

fn surface() -> RenderSurface {
    let assets = AssetChain::new(Arc::new(MemoryStore::<ImageRecord>::new()));
    RenderSurface::from_creation(&creation(), &assets)
}

#[test]
fn pump_applies_queued_messages_in_order() {
    let (tx, rx) = preview_channel();
    let mut s = surface();
    for x in [1, 2, 3] {
        tx.send(PreviewMessage::UpdateBackground(BackgroundPatch {
            x: Some(x),
            ..BackgroundPatch::default()
        }));
    }
    tx.send(PreviewMessage::UpdateLayer(LayerPatch {
        index: 9,
        ..LayerPatch::default()
    }));
    assert_eq!(rx.pump(&mut s), 3);
    assert_eq!(s.canvas().x, 3);
    assert_eq!(rx.pump(&mut s), 0);
}

#[test]
fn send_after_unmount_is_discarded() {
    let (tx, rx) = preview_channel();
    drop(rx);
    assert!(!tx.send(PreviewMessage::UpdateBackground(BackgroundPatch::default())));
}

#[test]
fn send_field_skips_unrecognized_names() {
    let (tx, rx) = preview_channel();
    let form = FormValues::new().with("layer-0-color", "#00ff00");
    let c = creation();
    assert!(!tx.send_field("layer-0-rotation", &form, &c));
    assert!(tx.send_field("layer-0-color", &form, &c));

    let mut s = surface();
    assert_eq!(rx.pump(&mut s), 1);
    assert_eq!(s.node(0).unwrap().color.as_deref(), Some("#00ff00"));
}

#[test]
fn serve_runs_on_its_own_thread() {
    let (tx, rx) = preview_channel();
    let s = surface();
    let c = creation();
    let done = std::thread::scope(|scope| {
        let handle = scope.spawn(move || rx.serve(s));
        let sender = tx.clone();
        for offset in 0..50 {
            let form = FormValues::new().with("layer-0-offsetX", offset.to_string());
            sender.send_field("layer-0-offsetX", &form, &c);
        }
        drop(sender);
        drop(tx);
        handle.join().unwrap()
    });
    assert_eq!(done.node(0).unwrap().offset_x, 49);
}
