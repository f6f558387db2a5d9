use crate::{
    deleted::DeletionRegistry,
    resource::{Resource, ResourceSubtype},
    settings::{DeleteMode, SettingsRegistry},
    storage::StoreHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    Normal,
    Hidden,
    Compact,
}

/// The toggle offered next to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Delete,
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub render: RenderDecision,
    pub affordance: Option<Affordance>,
}

impl Decision {
    const INERT: Self = Self {
        render: RenderDecision::Normal,
        affordance: None,
    };

    pub fn is_deleted(&self) -> bool {
        self.render != RenderDecision::Normal
    }
}

pub struct Engine {
    deleted: DeletionRegistry,
    settings: SettingsRegistry,
}

impl Engine {
    pub fn new(store: StoreHandle) -> Self {
        Self::with_registries(
            DeletionRegistry::new(store.clone()),
            SettingsRegistry::new(store),
        )
    }

    pub fn with_registries(deleted: DeletionRegistry, settings: SettingsRegistry) -> Self {
        Self { deleted, settings }
    }

    pub fn deleted(&self) -> &DeletionRegistry {
        &self.deleted
    }

    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    pub fn is_deleted(&self, resource: &Resource) -> bool {
        resource
            .identity_key()
            .is_some_and(|key| self.deleted.is_deleted(key))
    }

    /// Maps the resource's current deletion state to a render decision.
    /// Pure with respect to the registries: repeated calls agree until the
    /// state changes.
    pub fn decide(&self, resource: &Resource) -> Decision {
        let Some(key) = resource.identity_key() else {
            return Decision::INERT;
        };
        let subtype = resource.subtype();

        let (render, affordance) = if !self.deleted.is_deleted(key) {
            (RenderDecision::Normal, Affordance::Delete)
        } else if subtype != Some(ResourceSubtype::Stream) {
            (RenderDecision::Compact, Affordance::Restore)
        } else {
            match self.settings.delete_mode() {
                DeleteMode::Hide => (RenderDecision::Hidden, Affordance::Restore),
                DeleteMode::Compact => (RenderDecision::Compact, Affordance::Restore),
            }
        };

        Decision {
            render,
            affordance: match subtype {
                Some(ResourceSubtype::Player) => None,
                _ => Some(affordance),
            },
        }
    }

    /// Flips the deletion state of the resource and returns the decision for
    /// the new state. Resources without identity are left alone.
    pub fn toggle(&self, resource: &Resource) -> Decision {
        let Some(key) = resource.identity_key() else {
            log::warn!("cannot toggle a resource without identity");
            return Decision::INERT;
        };
        if self.deleted.is_deleted(key) {
            log::info!("restoring {}", key);
            self.deleted.mark_restored(key);
        } else {
            log::info!("deleting {}", key);
            self.deleted.mark_deleted(key);
        }
        self.decide(resource)
    }

    /// Whether the player should move past `playing`: it is deleted and no
    /// resource page is open.
    pub fn should_skip(&self, playing: &Resource, hero_active: bool) -> bool {
        !hero_active && self.is_deleted(playing)
    }
}
