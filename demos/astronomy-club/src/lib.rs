use wasm_bindgen::prelude::*;

cosmic_web::export_journey!(
    "astronomy-club",
    manifest = include_str!("../assets/journey.json"),
    catalog = include_str!("../assets/catalog.json")
);

#[cfg(test)]
mod tests {
    use cosmic_engine::{ContentCatalog, SceneManifest};

    const MANIFEST: &str = include_str!("../assets/journey.json");
    const CATALOG: &str = include_str!("../assets/catalog.json");

    #[test]
    fn embedded_manifest_parses() {
        let manifest = SceneManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.bodies.len(), 5);
        assert_eq!(manifest.gallery.len(), 4);
        assert_eq!(manifest.overlays.len(), 5);
        assert!(manifest.join_anchor.is_some());
    }

    #[test]
    fn every_texture_is_in_the_catalog() {
        let manifest = SceneManifest::from_json(MANIFEST).unwrap();
        let catalog = ContentCatalog::from_json(CATALOG).unwrap();
        for body in &manifest.bodies {
            assert!(catalog.get(body.texture_id()).is_some(), "missing {}", body.id);
            if let Some(map) = &body.displacement {
                assert!(catalog.get(map).is_some(), "missing {}", map);
            }
        }
        for id in &manifest.gallery {
            assert!(catalog.get(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn embedded_documents_mount() {
        let runner = cosmic_web::JourneyRunner::new(MANIFEST, CATALOG, "{}", 1280.0, 720.0).unwrap();
        assert!(!runner.is_detached());
        assert!(runner.max_instances() > 0);
    }
}
