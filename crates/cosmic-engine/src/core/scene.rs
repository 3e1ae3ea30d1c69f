use std::collections::HashMap;

use crate::api::types::{EntityId, EntityKind};
use crate::components::entity::Entity;
use crate::components::mesh::TextureRef;

/// Simple entity storage using a flat Vec, plus a name index.
/// Designed for small entity counts (tens, not thousands): the star field
/// is one entity carrying its own point cloud.
///
/// Entities are never despawned while a session is mounted, so indices
/// into the Vec stay stable and manifest order is iteration order.
pub struct Scene {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
    textures: Vec<TextureRef>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(32),
            by_name: HashMap::new(),
            textures: Vec::new(),
        }
    }

    /// Add an entity to the scene. A later entity with the same name
    /// shadows the earlier one in the name index.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if !entity.name.is_empty() {
            if self.by_name.contains_key(&entity.name) {
                log::warn!("scene: duplicate entity name '{}'", entity.name);
            }
            self.by_name.insert(entity.name.clone(), self.entities.len());
        }
        self.entities.push(entity);
        id
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Look up an entity by its manifest name.
    pub fn by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Entity> {
        match self.by_name.get(name) {
            Some(&idx) => Some(&mut self.entities[idx]),
            None => None,
        }
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name(name).map(|e| e.id)
    }

    /// Iterate over all entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities of one kind, in spawn (manifest) order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Register a texture URL for the host to load. Returns its slot;
    /// the same URL always maps to the same slot.
    pub fn register_texture(&mut self, url: &str) -> TextureRef {
        if let Some(existing) = self.textures.iter().find(|t| t.url == url) {
            return existing.clone();
        }
        let texture = TextureRef {
            slot: self.textures.len() as u32,
            url: url.to_string(),
        };
        self.textures.push(texture.clone());
        texture
    }

    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop all entities and textures (teardown).
    pub fn clear(&mut self) {
        self.entities.clear();
        self.by_name.clear();
        self.textures.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id, EntityKind::LitBody).with_position(Vec3::new(10.0, 20.0, 0.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.position(), Vec3::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn name_index_resolves() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1), EntityKind::LitBody).with_name("hero-planet"));
        scene.spawn(Entity::new(EntityId(2), EntityKind::LitBody).with_name("about-moon"));
        assert_eq!(scene.id_of("about-moon"), Some(EntityId(2)));
        assert!(scene.by_name("nope").is_none());
    }

    #[test]
    fn of_kind_keeps_spawn_order() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1), EntityKind::LitBody));
        scene.spawn(Entity::new(EntityId(2), EntityKind::PicturePlane));
        scene.spawn(Entity::new(EntityId(3), EntityKind::LitBody));
        let ids: Vec<_> = scene.of_kind(EntityKind::LitBody).map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(3)]);
    }

    #[test]
    fn textures_are_deduplicated() {
        let mut scene = Scene::new();
        let a = scene.register_texture("a.png");
        let b = scene.register_texture("b.png");
        let a2 = scene.register_texture("a.png");
        assert_eq!(a.slot, 0);
        assert_eq!(b.slot, 1);
        assert_eq!(a2, a);
        assert_eq!(scene.textures().len(), 2);
    }
}
