//! Scene selection state

use super::types::ModelId;

/// Currently selected model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    model: Option<ModelId>,
}

impl Selection {
    pub fn selected_model(&self) -> Option<ModelId> {
        self.model
    }

    pub fn is_selected(&self, id: ModelId) -> bool {
        self.model == Some(id)
    }

    pub(crate) fn set(&mut self, model: Option<ModelId>) {
        self.model = model;
    }

    pub(crate) fn clear(&mut self) {
        self.model = None;
    }
}
