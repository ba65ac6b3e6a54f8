use std::sync::mpsc;

use crate::edit::fields::FormValues;
use crate::model::creation::Creation;
use crate::preview::message::PreviewMessage;
use crate::preview::surface::RenderSurface;

/// Open a one-way preview channel. Messages arrive in send order.
pub fn preview_channel() -> (PreviewSender, PreviewReceiver) {
    let (tx, rx) = mpsc::channel();
    (PreviewSender { tx }, PreviewReceiver { rx })
}

/// Edit-side handle. Fire-and-forget: nothing is acknowledged.
#[derive(Clone, Debug)]
pub struct PreviewSender {
    tx: mpsc::Sender<PreviewMessage>,
}

impl PreviewSender {
    /// Post a message. Returns `false` when the surface is gone (the message is discarded).
    pub fn send(&self, message: PreviewMessage) -> bool {
        match self.tx.send(message) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("render surface unmounted, preview message discarded");
                false
            }
        }
    }

    /// Post the patch an edit of `name` to `creation` implies. Unrecognized names send nothing.
    pub fn send_field(&self, name: &str, form: &FormValues, creation: &Creation) -> bool {
        match PreviewMessage::for_field(name, form, creation) {
            Some(message) => self.send(message),
            None => false,
        }
    }
}

/// Surface-side handle.
#[derive(Debug)]
pub struct PreviewReceiver {
    rx: mpsc::Receiver<PreviewMessage>,
}

impl PreviewReceiver {
    /// Apply every message already queued, without blocking. Returns how many were applied.
    pub fn pump(&self, surface: &mut RenderSurface) -> usize {
        self.rx
            .try_iter()
            .filter(|message| surface.apply(message))
            .count()
    }

    /// Apply messages until every sender is dropped, then hand the surface back.
    pub fn serve(self, mut surface: RenderSurface) -> RenderSurface {
        for message in self.rx {
            surface.apply(&message);
        }
        surface
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/channel.rs"]
mod tests;
