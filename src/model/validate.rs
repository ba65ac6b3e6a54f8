use std::collections::BTreeSet;

use crate::foundation::error::{CollageError, CollageResult};
use crate::model::creation::Creation;

/// Parse a raw canvas dimension as typed by a user.
///
/// Accepts positive integers only (surrounding whitespace is trimmed).
pub fn parse_dimension(raw: &str) -> CollageResult<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n)
            .map_err(|_| CollageError::invalid_dimension(format!("'{trimmed}' is too large"))),
        Ok(_) => Err(CollageError::invalid_dimension(format!(
            "'{trimmed}' must be positive"
        ))),
        Err(_) => Err(CollageError::invalid_dimension(format!(
            "'{trimmed}' is not a number"
        ))),
    }
}

impl Creation {
    /// Check the document-level invariants.
    pub fn validate(&self) -> CollageResult<()> {
        if self.id().is_empty() {
            return Err(CollageError::validation("creation id must be non-empty"));
        }
        if self.width() == 0 || self.height() == 0 {
            return Err(CollageError::invalid_dimension(format!(
                "canvas must be positive, got {}x{}",
                self.width(),
                self.height()
            )));
        }
        let scale = self.background_scale();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CollageError::validation(format!(
                "background scale must be positive and finite, got {scale}"
            )));
        }

        let mut seen = BTreeSet::new();
        for (index, layer) in self.layers().iter().enumerate() {
            if layer.id().is_empty() {
                return Err(CollageError::validation(format!(
                    "layer {index} has an empty id"
                )));
            }
            if !seen.insert(layer.id()) {
                return Err(CollageError::validation(format!(
                    "duplicate layer id '{}'",
                    layer.id()
                )));
            }
        }
        Ok(())
    }

    /// True when the `zIndex` values are exactly `1..=N`.
    pub fn has_dense_z_index(&self) -> bool {
        let mut zs: Vec<i32> = self.layers().iter().map(|l| l.z_index()).collect();
        zs.sort_unstable();
        zs.iter()
            .enumerate()
            .all(|(i, z)| i64::from(*z) == i as i64 + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/validate.rs"]
mod tests;
