//! Contact icons.
//!
//! The host loads the images and registers them here; the atlas is handed
//! to the display at construction and lives as long as it does.

use std::collections::HashMap;

use radar_core::EntityKind;

use crate::surface::ImageId;

/// Atlas slot; one per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconSlot {
    /// Players.
    Player,
    /// Weapon pickups.
    Weapon,
    /// Ammo pickups.
    Ammo,
}

impl IconSlot {
    /// Slot for an entity kind.
    #[must_use]
    pub const fn of(kind: &EntityKind) -> Self {
        match kind {
            EntityKind::Player { .. } => Self::Player,
            EntityKind::Weapon => Self::Weapon,
            EntityKind::Ammo => Self::Ammo,
        }
    }
}

/// A registered image and its drawn size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    /// Host image.
    pub image: ImageId,
    /// Drawn width (pixels).
    pub width: f32,
    /// Drawn height (pixels).
    pub height: f32,
}

/// Images for contacts, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct IconAtlas {
    icons: HashMap<IconSlot, Icon>,
}

impl IconAtlas {
    /// Creates an empty atlas; every contact falls back to its label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an icon, replacing any previous one for the slot.
    #[must_use]
    pub fn with_icon(mut self, slot: IconSlot, icon: Icon) -> Self {
        self.icons.insert(slot, icon);
        self
    }

    /// Icon for an entity kind, if one is registered.
    #[must_use]
    pub fn icon_for(&self, kind: &EntityKind) -> Option<&Icon> {
        self.icons.get(&IconSlot::of(kind))
    }

    /// Number of registered icons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns true if no icons are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
