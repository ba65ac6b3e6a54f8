use super::*;
use crate::factory::layer_factory::LayerFactory;
use crate::factory::preset::MemoryPresetStore;
use crate::foundation::core::{LayerType, Slot};
use crate::foundation::ids::SequentialIds;
use crate::model::record::CreationRecord;
use crate::preview::channel::preview_channel;
use crate::store::assets::ImageRecord;
use crate::store::document::{DocumentStore, MemoryStore};
use serde_json::json;

/// Memory store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore<CreationRecord>,
    fail: AtomicBool,
    writes: std::sync::atomic::AtomicUsize,
}

impl DocumentStore<CreationRecord> for FlakyStore {
    fn get(&self, id: &str) -> CollageResult<Option<CreationRecord>> {
        self.inner.get(id)
    }

    fn save(&self, doc: &CreationRecord) -> CollageResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CollageError::storage("disk full"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save(doc)
    }

    fn delete(&self, id: &str) -> CollageResult<()> {
        self.inner.delete(id)
    }

    fn get_all(&self) -> CollageResult<Vec<CreationRecord>> {
        self.inner.get_all()
    }
}

fn setup() -> (EditorSession, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::default());
    let factory = Arc::new(LayerFactory::new(Arc::new(SequentialIds::new("id"))));
    let repo = CreationRepository::new(store.clone(), factory.clone());
    let creation = factory.blank_creation("Session", 640, 480);
    let session = EditorSession::create(repo, Arc::new(LayerFormRegistry::default()), creation)
        .unwrap();
    (session, store)
}

fn font(session: &EditorSession, text: &str) -> Layer {
    session
        .repo
        .factory()
        .create_layer("font", &json!({ "text": text }))
        .unwrap()
}

fn writes(store: &FlakyStore) -> usize {
    store.writes.load(Ordering::SeqCst)
}

#[test]
fn create_persists_and_open_reloads() {
    let (session, store) = setup();
    assert_eq!(writes(&store), 1);
    let reopened = EditorSession::open(
        session.repo.clone(),
        Arc::new(LayerFormRegistry::default()),
        session.creation().id(),
    )
    .unwrap();
    assert_eq!(reopened.creation(), session.creation());

    let missing = EditorSession::open(
        session.repo.clone(),
        Arc::new(LayerFormRegistry::default()),
        "nope",
    );
    assert!(matches!(missing, Err(CollageError::Validation(_))));
}

#[test]
fn unchanged_commit_skips_the_write() {
    let (mut session, store) = setup();
    let same = session.creation().clone();
    assert!(!session.commit(same).unwrap());
    assert!(!session.commit_form(&FormValues::new().with("title", "Session")).unwrap());
    assert_eq!(writes(&store), 1);

    assert!(session.commit_form(&FormValues::new().with("title", "Renamed")).unwrap());
    assert_eq!(writes(&store), 2);
    assert_eq!(session.creation().title(), "Renamed");
}

#[test]
fn failed_save_keeps_previous_snapshot() {
    let (mut session, store) = setup();
    let before = session.creation().clone();
    store.fail.store(true, Ordering::SeqCst);

    let err = session
        .commit_form(&FormValues::new().with("width", "2000"))
        .unwrap_err();
    assert!(matches!(err, CollageError::Storage(_)));
    assert_eq!(session.creation(), &before);

    store.fail.store(false, Ordering::SeqCst);
    assert!(session.commit_form(&FormValues::new().with("width", "2000")).unwrap());
    assert_eq!(session.creation().width(), 2000);
}

#[test]
fn structural_ops_keep_z_dense() {
    let (mut session, _) = setup();
    for text in ["a", "b", "c"] {
        let layer = font(&session, text);
        assert!(session.add_layer(layer).unwrap());
    }
    assert!(session.creation().has_dense_z_index());

    assert!(session.send_to_back(2).unwrap());
    assert_eq!(session.creation().layer(2).unwrap().z_index(), 1);
    assert!(session.bring_to_front(2).unwrap());
    assert_eq!(session.creation().layer(2).unwrap().z_index(), 3);

    assert!(session.remove_layer(0).unwrap());
    assert_eq!(session.creation().layer_count(), 2);
    assert!(session.creation().has_dense_z_index());

    assert!(session.move_layer(1, Direction::Down).unwrap());
    assert!(!session.move_layer(1, Direction::Down).unwrap());
    assert!(session.creation().has_dense_z_index());
}

#[test]
fn duplicate_layer_id_is_rejected() {
    let (mut session, _) = setup();
    let layer = font(&session, "x");
    session.add_layer(layer.clone()).unwrap();
    assert!(matches!(
        session.add_layer(layer),
        Err(CollageError::Validation(_))
    ));
}

#[test]
fn presets_and_promotion() {
    let (mut session, _) = setup();
    let presets = MemoryPresetStore::new().with_layer(LayerType::Icon, json!({ "icon": "star" }));
    assert!(session.add_layer_from_preset(&presets, "icon").unwrap());
    assert!(matches!(
        session.add_layer_from_preset(&presets, "font"),
        Err(CollageError::PresetNotFound(_))
    ));

    assert!(session.promote_image("bg-1", ImageCategory::Background).unwrap());
    assert_eq!(session.creation().background_image_id(), Some("bg-1"));

    assert!(session.promote_image("img-2", ImageCategory::Image).unwrap());
    let image = session.creation().layer(1).unwrap();
    assert_eq!(image.image_id(), Some("img-2"));
    assert_eq!(image.slot(), Slot::CenterMiddle);
    assert_eq!(image.z_index(), 2);
}

#[test]
fn live_update_never_persists() {
    let (session, store) = setup();
    let (tx, rx) = preview_channel();
    let session = session.with_preview(tx);
    let form = FormValues::new().with("backgroundScale", "2");
    assert!(session.live_update("backgroundScale", &form));
    assert!(!session.live_update("title", &form));
    assert_eq!(writes(&store), 1);

    let assets = AssetChain::new(Arc::new(MemoryStore::<ImageRecord>::new()));
    let mut surface = session.render(&assets);
    assert_eq!(rx.pump(&mut surface), 1);
    assert_eq!(surface.canvas().background_size(), "200% auto");
    assert_eq!(session.creation().background_scale(), 1.0);
}

#[test]
fn teardown_discards_late_results() {
    let (mut session, store) = setup();
    let token = session.token();
    assert!(token.is_active());
    session.teardown();
    assert!(!token.is_active());

    assert!(!session.apply_if_active(|c| c.with_title("late")).unwrap());
    assert!(!session.commit_form(&FormValues::new().with("title", "late")).unwrap());
    assert_eq!(session.creation().title(), "Session");
    assert_eq!(writes(&store), 1);
}

#[test]
fn dropping_the_session_deactivates_its_token() {
    let (session, _) = setup();
    let token = session.token();
    drop(session);
    assert!(!token.is_active());
}

#[test]
fn delete_removes_the_record() {
    let (session, store) = setup();
    let id = session.creation().id().to_string();
    session.delete().unwrap();
    assert_eq!(store.get(&id).unwrap(), None);
}

#[test]
fn open_refuses_a_stored_record_that_breaks_invariants() {
    let store = Arc::new(MemoryStore::<CreationRecord>::new());
    let factory = Arc::new(LayerFactory::new(Arc::new(SequentialIds::new("id"))));
    let repo = CreationRepository::new(store.clone(), factory);
    let record: CreationRecord = serde_json::from_value(json!({
        "id": "bad",
        "width": 0,
        "height": 300,
        "layers": [{ "id": "dup", "type": "icon" }, { "id": "dup", "type": "font" }]
    }))
    .unwrap();
    store.save(&record).unwrap();

    let err = EditorSession::open(repo, Arc::new(LayerFormRegistry::default()), "bad").unwrap_err();
    assert!(matches!(err, CollageError::InvalidDimension(_)));
}
