use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::edit::fields::FormValues;
use crate::edit::form::LayerFormRegistry;
use crate::factory::preset::PresetStore;
use crate::foundation::core::Direction;
use crate::foundation::error::{CollageError, CollageResult};
use crate::model::creation::Creation;
use crate::model::layer::Layer;
use crate::preview::channel::PreviewSender;
use crate::preview::surface::RenderSurface;
use crate::store::assets::{AssetChain, ImageCategory};
use crate::store::creations::CreationRepository;

/// "Am I still the active view" flag shared between a session and its pending work.
#[derive(Clone, Debug)]
pub struct ViewToken {
    active: Arc<AtomicBool>,
}

impl ViewToken {
    /// A live token.
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// False once the owning view was torn down.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Mark the owning view as gone.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for ViewToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Edit controller for one creation.
///
/// Holds the current immutable snapshot. Every discrete commit point derives a new snapshot,
/// writes it, and only then makes it current; a failed write leaves the previous snapshot in
/// place. Live preview updates never touch persistence.
#[derive(Debug)]
pub struct EditorSession {
    current: Creation,
    repo: CreationRepository,
    forms: Arc<LayerFormRegistry>,
    preview: Option<PreviewSender>,
    token: ViewToken,
}

impl EditorSession {
    /// Open a stored creation. Records that break the document invariants are refused.
    #[tracing::instrument(skip(repo, forms))]
    pub fn open(
        repo: CreationRepository,
        forms: Arc<LayerFormRegistry>,
        id: &str,
    ) -> CollageResult<Self> {
        let current = repo
            .get(id)?
            .ok_or_else(|| CollageError::validation(format!("creation '{id}' does not exist")))?;
        current.validate()?;
        Ok(Self::attach(current, repo, forms))
    }

    /// Start editing a new creation, persisting it first.
    #[tracing::instrument(skip_all, fields(creation = creation.id()))]
    pub fn create(
        repo: CreationRepository,
        forms: Arc<LayerFormRegistry>,
        creation: Creation,
    ) -> CollageResult<Self> {
        let creation = creation.repair_z_index().into_owned();
        creation.validate()?;
        repo.save(&creation)?;
        Ok(Self::attach(creation, repo, forms))
    }

    fn attach(current: Creation, repo: CreationRepository, forms: Arc<LayerFormRegistry>) -> Self {
        Self {
            current,
            repo,
            forms,
            preview: None,
            token: ViewToken::new(),
        }
    }

    /// Route live updates to a render surface.
    pub fn with_preview(mut self, sender: PreviewSender) -> Self {
        self.preview = Some(sender);
        self
    }

    /// The current snapshot.
    pub fn creation(&self) -> &Creation {
        &self.current
    }

    /// Token guarding work started by this session.
    pub fn token(&self) -> ViewToken {
        self.token.clone()
    }

    /// Make `next` current if it differs, writing it first.
    ///
    /// Returns whether anything was written. Edits arriving after teardown are discarded.
    pub fn commit(&mut self, next: Creation) -> CollageResult<bool> {
        if !self.token.is_active() {
            tracing::debug!(creation = self.current.id(), "session torn down, edit discarded");
            return Ok(false);
        }
        if next == self.current {
            tracing::debug!(creation = self.current.id(), "no change, write skipped");
            return Ok(false);
        }
        if let Err(err) = self.repo.save(&next) {
            tracing::error!(
                creation = self.current.id(),
                error = %err,
                "save failed, keeping previous snapshot"
            );
            return Err(err);
        }
        self.current = next;
        Ok(true)
    }

    /// Derive and commit a new snapshot, unless the session has been torn down.
    pub fn apply_if_active(&mut self, f: impl FnOnce(&Creation) -> Creation) -> CollageResult<bool> {
        if !self.token.is_active() {
            tracing::debug!(creation = self.current.id(), "session torn down, result discarded");
            return Ok(false);
        }
        let next = f(&self.current);
        self.commit(next)
    }

    fn commit_structural(&mut self, next: Creation) -> CollageResult<bool> {
        let repaired = next.repair_z_index().into_owned();
        self.commit(repaired)
    }

    /// Commit every input in `form` through the layer adapters and creation fields.
    #[tracing::instrument(skip_all, fields(creation = self.current.id()))]
    pub fn commit_form(&mut self, form: &FormValues) -> CollageResult<bool> {
        let next = self.forms.apply(&self.current, form);
        self.commit(next)
    }

    /// Post a live preview patch for an edit of `name`. Never persists.
    pub fn live_update(&self, name: &str, form: &FormValues) -> bool {
        match &self.preview {
            Some(sender) if self.token.is_active() => {
                sender.send_field(name, form, &self.current)
            }
            _ => false,
        }
    }

    /// Append `layer` on top and commit.
    pub fn add_layer(&mut self, layer: Layer) -> CollageResult<bool> {
        if self.current.position_of(layer.id()).is_some() {
            return Err(CollageError::validation(format!(
                "layer id '{}' already present",
                layer.id()
            )));
        }
        let next = self.current.add_layer(layer);
        self.commit_structural(next)
    }

    /// Build a layer of `type_tag` from its preset and append it.
    pub fn add_layer_from_preset(
        &mut self,
        presets: &dyn PresetStore,
        type_tag: &str,
    ) -> CollageResult<bool> {
        let layer = self.repo.factory().create_from_preset(presets, type_tag)?;
        self.add_layer(layer)
    }

    /// Remove layer `index` and commit.
    pub fn remove_layer(&mut self, index: usize) -> CollageResult<bool> {
        let next = self.current.remove_layer(index);
        self.commit_structural(next)
    }

    /// Raise layer `index` to the top and commit.
    pub fn bring_to_front(&mut self, index: usize) -> CollageResult<bool> {
        let next = self.current.bring_to_front(index);
        self.commit_structural(next)
    }

    /// Lower layer `index` to the bottom and commit.
    pub fn send_to_back(&mut self, index: usize) -> CollageResult<bool> {
        let next = self.current.send_to_back(index);
        self.commit_structural(next)
    }

    /// Move layer `index` one step within its slot and commit.
    pub fn move_layer(&mut self, index: usize, direction: Direction) -> CollageResult<bool> {
        let next = self.current.move_layer(index, direction);
        self.commit_structural(next)
    }

    /// Show or hide layer `index` and commit.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> CollageResult<bool> {
        let next = self.current.update_layer(index, |l| l.with_visible(visible));
        self.commit(next)
    }

    /// Use an image asset as the background or as a new center-middle Image layer.
    #[tracing::instrument(skip(self), fields(creation = self.current.id()))]
    pub fn promote_image(&mut self, image_id: &str, category: ImageCategory) -> CollageResult<bool> {
        match category {
            ImageCategory::Background => {
                let next = self
                    .current
                    .with_background_image_id(Some(image_id.to_string()));
                self.commit(next)
            }
            ImageCategory::Image => {
                let layer = self.repo.factory().image_layer(image_id);
                self.add_layer(layer)
            }
        }
    }

    /// Full render of the current snapshot.
    pub fn render(&self, assets: &AssetChain) -> RenderSurface {
        RenderSurface::from_creation(&self.current, assets)
    }

    /// Delete the creation from storage and end the session.
    pub fn delete(self) -> CollageResult<()> {
        self.token.deactivate();
        self.repo.delete(self.current.id())
    }

    /// End the session; later commits and pending results are discarded.
    pub fn teardown(&self) {
        self.token.deactivate();
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.token.deactivate();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/session.rs"]
mod tests;
