use std::sync::{PoisonError, RwLock};

use log::info;

use crate::graphics::GraphicsBinding;

/// Holds the graphics binding of the most recently created session.
///
/// Context currency is per thread and the host serialises calls per context,
/// so the lock only makes the slot shareable; it is not a concurrency contract.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    slot: RwLock<Option<GraphicsBinding>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any binding captured by an earlier session.
    pub fn set(&self, binding: GraphicsBinding) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            info!("Replacing graphics binding of previous session");
        }
        *slot = Some(binding);
    }

    pub fn is_present(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Makes the captured context current again. Does nothing until a session
    /// with a recognised binding has been created.
    pub fn restore_if_present(&self) {
        if let Some(binding) = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            binding.restore_current();
        }
    }
}
