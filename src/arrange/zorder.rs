//! Stacking order: dense repair, front/back moves and within-slot reordering.
//!
//! `zIndex` is the only ordering key. Sequence position is consulted purely as a tie-break
//! between equal `zIndex` values, so repairs are deterministic.

use std::borrow::Cow;

use crate::foundation::core::{Direction, Slot};
use crate::model::creation::Creation;
use crate::model::layer::Layer;

/// Sequence indices in paint order (back first): `(zIndex, index)` ascending.
fn paint_order(layers: &[Layer]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..layers.len()).collect();
    order.sort_by_key(|&i| (layers[i].z_index(), i));
    order
}

/// Dense rank `1..=N` for every sequence index.
fn dense_ranks(layers: &[Layer]) -> Vec<i32> {
    let mut ranks = vec![0; layers.len()];
    for (rank, index) in paint_order(layers).into_iter().enumerate() {
        ranks[index] = i32::try_from(rank + 1).unwrap_or(i32::MAX);
    }
    ranks
}

impl Creation {
    /// Append `layer` on top of everything: its `zIndex` becomes `max + 1` (1 when empty).
    ///
    /// Does not repair existing values.
    pub fn add_layer(&self, layer: Layer) -> Creation {
        let top = self
            .layers()
            .iter()
            .map(Layer::z_index)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let mut layers = self.layers().to_vec();
        layers.push(layer.with_z_index(top));
        self.with_layers(layers)
    }

    /// Renumber `zIndex` to a dense `1..=N`, keeping relative order.
    ///
    /// Returns `Cow::Borrowed(self)` when every value is already in place, so callers can skip
    /// a redundant write.
    #[tracing::instrument(skip(self), fields(creation = %self.id(), layers = self.layer_count()))]
    pub fn repair_z_index(&self) -> Cow<'_, Creation> {
        let ranks = dense_ranks(self.layers());
        let dirty = self
            .layers()
            .iter()
            .zip(&ranks)
            .any(|(layer, rank)| layer.z_index() != *rank);
        if !dirty {
            return Cow::Borrowed(self);
        }

        let layers: Vec<Layer> = self
            .layers()
            .iter()
            .zip(ranks)
            .map(|(layer, rank)| {
                if layer.z_index() == rank {
                    layer.clone()
                } else {
                    layer.with_z_index(rank)
                }
            })
            .collect();
        tracing::debug!("repaired z-index");
        Cow::Owned(self.with_layers(layers))
    }

    /// Raise layer `index` above every other layer, then repair.
    #[tracing::instrument(skip(self), fields(creation = %self.id()))]
    pub fn bring_to_front(&self, index: usize) -> Creation {
        let Some(layer) = self.layer(index) else {
            tracing::debug!("bring_to_front: index out of range");
            return self.clone();
        };
        let max_z = self.layers().iter().map(Layer::z_index).max().unwrap_or(0);
        let raised = layer.with_z_index(max_z.saturating_add(1));
        self.with_layer(index, raised).repair_z_index().into_owned()
    }

    /// Lower layer `index` below every other layer, then repair.
    #[tracing::instrument(skip(self), fields(creation = %self.id()))]
    pub fn send_to_back(&self, index: usize) -> Creation {
        let Some(layer) = self.layer(index) else {
            tracing::debug!("send_to_back: index out of range");
            return self.clone();
        };
        let min_z = self.layers().iter().map(Layer::z_index).min().unwrap_or(0);
        let lowered = layer.with_z_index(min_z.saturating_sub(1));
        self.with_layer(index, lowered).repair_z_index().into_owned()
    }

    /// Sequence indices of the layers anchored at `slot`, front first.
    pub fn slot_stack(&self, slot: Slot) -> Vec<usize> {
        let mut stack: Vec<usize> = paint_order(self.layers())
            .into_iter()
            .filter(|&i| self.layers()[i].slot() == slot)
            .collect();
        stack.reverse();
        stack
    }

    /// Sequence indices of every layer in paint order (back first).
    pub fn paint_order(&self) -> Vec<usize> {
        paint_order(self.layers())
    }

    /// Swap layer `index` with its nearest same-slot neighbour in `direction`.
    ///
    /// The two layers exchange `zIndex` values (after a repair, so the values are distinct);
    /// the sequence itself is not reordered. Without a neighbour the creation is returned
    /// unchanged.
    #[tracing::instrument(skip(self), fields(creation = %self.id()))]
    pub fn move_layer(&self, index: usize, direction: Direction) -> Creation {
        let Some(layer) = self.layer(index) else {
            return self.clone();
        };
        let repaired = self.repair_z_index();
        let stack = repaired.slot_stack(layer.slot());
        let neighbour = stack
            .iter()
            .position(|&i| i == index)
            .and_then(|pos| pos.checked_add_signed(direction.offset() as isize))
            .and_then(|pos| stack.get(pos).copied());
        let Some(other) = neighbour else {
            tracing::debug!("move_layer: no neighbour in that direction");
            return self.clone();
        };

        let here = &repaired.layers()[index];
        let there = &repaired.layers()[other];
        let (z_here, z_there) = (here.z_index(), there.z_index());
        let mut layers = repaired.layers().to_vec();
        layers[index] = here.with_z_index(z_there);
        layers[other] = there.with_z_index(z_here);
        repaired.with_layers(layers)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/arrange/zorder.rs"]
mod tests;
