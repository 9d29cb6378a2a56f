//! Sprite variant selection for the open detail view

use serde::Serialize;

use super::EntityDetail;

/// Which sprite (shiny/normal × front/back) the detail view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationVariantState {
    open_entity_id: Option<u32>,
    is_shiny: bool,
    is_front: bool,
    /// Ids above this have only a default sprite
    variant_sprite_max_id: u32,
}

impl PresentationVariantState {
    pub fn new(variant_sprite_max_id: u32) -> Self {
        Self {
            open_entity_id: None,
            is_shiny: true,
            is_front: true,
            variant_sprite_max_id,
        }
    }

    pub fn open(&mut self, entity: &EntityDetail) {
        self.open_entity_id = Some(entity.id);
        self.is_shiny = true;
        self.is_front = true;
    }

    pub fn close(&mut self) {
        self.open_entity_id = None;
    }

    /// Flip shiny/normal; no-op when nothing is open. Returns the new value.
    pub fn toggle_shiny(&mut self) -> bool {
        if self.open_entity_id.is_some() {
            self.is_shiny = !self.is_shiny;
        }
        self.is_shiny
    }

    /// Flip front/back; no-op when nothing is open. Returns the new value.
    pub fn toggle_facing(&mut self) -> bool {
        if self.open_entity_id.is_some() {
            self.is_front = !self.is_front;
        }
        self.is_front
    }

    pub fn open_entity_id(&self) -> Option<u32> {
        self.open_entity_id
    }

    pub fn is_shiny(&self) -> bool {
        self.is_shiny
    }

    pub fn is_front(&self) -> bool {
        self.is_front
    }

    /// Sprite to display for `entity`; always yields a URL
    ///
    /// Falls back to the default sprite when `entity` is not the open one,
    /// when its id is past the variant threshold, or when the chosen
    /// variant does not exist.
    pub fn current_sprite_url<'a>(&self, entity: &'a EntityDetail) -> &'a str {
        let sprites = &entity.sprites;

        if self.open_entity_id != Some(entity.id) || entity.id > self.variant_sprite_max_id {
            return &sprites.default_url;
        }

        let variant = match (self.is_shiny, self.is_front) {
            (false, true) => return &sprites.default_url,
            (true, true) => sprites.shiny_url.as_deref(),
            (false, false) => sprites.back_default_url.as_deref(),
            (true, false) => sprites.back_shiny_url.as_deref(),
        };

        variant.unwrap_or(&sprites.default_url)
    }
}
