//! Entities shown on the radar.
//!
//! The host owns these and hands the engine a fresh slice every frame.
//! Fade state is never stored here; the visibility model keys it by
//! [`EntityId`].

/// Stable identity of an entity across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// How the HUD should mark an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayHint {
    /// A filled dot with the label beside it.
    Circle,
    /// Text (or an atlas icon) only.
    Label,
}

/// The closed set of things the radar knows how to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Another player.
    Player {
        /// Player number in the match.
        number: u32,
        /// Team color (RGB).
        rgb: [u8; 3],
    },
    /// A weapon pickup.
    Weapon,
    /// An ammo pickup.
    Ammo,
}

impl EntityKind {
    /// Label used when the entity does not carry its own.
    #[must_use]
    pub fn default_label(&self) -> String {
        match self {
            Self::Player { number, .. } => format!("P{number}"),
            Self::Weapon => "Wm".to_owned(),
            Self::Ammo => "As".to_owned(),
        }
    }

    /// How this kind is marked on the display.
    #[must_use]
    pub const fn display_hint(&self) -> DisplayHint {
        match self {
            Self::Player { .. } => DisplayHint::Circle,
            Self::Weapon | Self::Ammo => DisplayHint::Label,
        }
    }
}

/// One entity as seen from the local player.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Stable identity.
    pub id: EntityId,
    /// What it is.
    pub kind: EntityKind,
    /// Ground distance from the local player (meters, ≥ 0).
    pub distance_meters: f64,
    /// Bearing clockwise from true north (radians, any range).
    pub angle_radians: f64,
    /// Text drawn next to the contact.
    pub label: String,
}

impl Entity {
    /// Creates an entity with its kind's default label.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, distance_meters: f64, angle_radians: f64) -> Self {
        let label = kind.default_label();
        Self {
            id,
            kind,
            distance_meters,
            angle_radians,
            label,
        }
    }

    /// Shorthand for a player contact.
    #[must_use]
    pub fn player(id: u64, number: u32, distance_meters: f64, angle_radians: f64) -> Self {
        Self::new(
            EntityId(id),
            EntityKind::Player {
                number,
                rgb: [0x33, 0xFF, 0x4D],
            },
            distance_meters,
            angle_radians,
        )
    }

    /// Shorthand for a weapon contact.
    #[must_use]
    pub fn weapon(id: u64, distance_meters: f64, angle_radians: f64) -> Self {
        Self::new(EntityId(id), EntityKind::Weapon, distance_meters, angle_radians)
    }

    /// Shorthand for an ammo contact.
    #[must_use]
    pub fn ammo(id: u64, distance_meters: f64, angle_radians: f64) -> Self {
        Self::new(EntityId(id), EntityKind::Ammo, distance_meters, angle_radians)
    }

    /// Replaces the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Display hint of this entity's kind.
    #[must_use]
    pub const fn display_hint(&self) -> DisplayHint {
        self.kind.display_hint()
    }
}
