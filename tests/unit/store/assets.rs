use super::*;
use crate::store::document::MemoryStore;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn store_with(records: Vec<ImageRecord>) -> Arc<dyn DocumentStore<ImageRecord>> {
    Arc::new(MemoryStore::with_documents(records))
}

#[test]
fn blob_serializes_as_data_url() {
    let record = ImageRecord::new("img-1", ImageCategory::Background, png(2, 2));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["category"], "background");
    let blob = json["imageBlob"].as_str().unwrap();
    assert!(blob.starts_with("data:image/png;base64,"), "{blob}");

    let back: ImageRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.mime_type(), "image/png");
}

#[test]
fn plain_base64_and_bad_payloads() {
    let ok: ImageRecord =
        serde_json::from_str(r#"{ "id": "a", "imageBlob": "AAEC" }"#).unwrap();
    assert_eq!(ok.image_blob, vec![0, 1, 2]);
    assert_eq!(ok.category, ImageCategory::Image);
    assert_eq!(ok.mime_type(), "application/octet-stream");

    let bad = serde_json::from_str::<ImageRecord>(r#"{ "id": "a", "imageBlob": "data:text/plain,hi" }"#);
    assert!(bad.is_err());
    let bad = serde_json::from_str::<ImageRecord>(r#"{ "id": "a", "imageBlob": "!!!" }"#);
    assert!(bad.is_err());
}

#[test]
fn dimensions_come_from_the_header() {
    let record = ImageRecord::new("img", ImageCategory::Image, png(7, 3));
    assert_eq!(record.dimensions().unwrap(), (7, 3));
    let junk = ImageRecord::new("junk", ImageCategory::Image, vec![1, 2, 3]);
    assert!(matches!(junk.dimensions(), Err(CollageError::Validation(_))));
}

#[test]
fn chain_resolves_in_order_and_reports_missing() {
    let uploads = store_with(vec![ImageRecord::new("u", ImageCategory::Background, png(1, 1))]);
    let presets = store_with(vec![
        ImageRecord::new("p", ImageCategory::Image, png(2, 1)),
        ImageRecord::new("u", ImageCategory::Image, png(9, 9)),
    ]);
    let chain = AssetChain::new(uploads).with_source(presets);

    let u = chain.resolve("u").found().unwrap();
    assert_eq!(u.category, ImageCategory::Background);
    assert_eq!(chain.resolve("p").found().unwrap().dimensions().unwrap(), (2, 1));
    assert_eq!(chain.resolve("nope"), ResolvedImage::Missing("nope".to_string()));
    assert!(chain.contains("p"));
    assert!(!chain.contains("nope"));
}

#[test]
fn upload_requires_an_image() {
    let chain = AssetChain::new(store_with(vec![]));
    let record = chain.upload("new", ImageCategory::Image, png(4, 4)).unwrap();
    assert_eq!(record.mime_type(), "image/png");
    assert!(chain.uploads().get("new").unwrap().is_some());

    let err = chain.upload("txt", ImageCategory::Image, b"hello".to_vec()).unwrap_err();
    assert!(matches!(err, CollageError::Validation(_)));
}

#[test]
fn category_parsing() {
    assert_eq!("background".parse::<ImageCategory>().unwrap(), ImageCategory::Background);
    assert!("sticker".parse::<ImageCategory>().is_err());
    assert_eq!(ImageCategory::Image.as_str(), "image");
}
