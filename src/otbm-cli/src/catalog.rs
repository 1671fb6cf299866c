use std::collections::HashMap;

use otbm::{CreatureCatalog, CreatureTypeId, ItemCategory, ItemTypeCatalog, ItemTypeInfo};

/// A permissive stand-in for the external item-type database spec.md
/// treats as out of scope. The CLI has no real item-type source to
/// query, so every id decodes as a plain, non-stackable item; this is
/// enough to round-trip a map's bytes but loses container/teleport/
/// door/depot-specific fields for any id this catalog doesn't know.
pub struct NullItemCatalog;

impl ItemTypeCatalog for NullItemCatalog {
    fn item_type(&self, _id: u16) -> Option<ItemTypeInfo> {
        Some(ItemTypeInfo {
            category: ItemCategory::Plain,
            stackable: false,
            is_splash: false,
            is_fluid_container: false,
            minor_version_gate: None,
            is_meta_item: false,
            has_border_equivalent: false,
            ground_equivalent_id: None,
            is_ground: false,
        })
    }
}

/// A creature catalog that registers every unseen name on first use,
/// since the CLI has no external creature database to consult either.
#[derive(Default)]
pub struct AutoCreatureCatalog {
    known: HashMap<String, CreatureTypeId>,
    next_id: CreatureTypeId,
}

impl CreatureCatalog for AutoCreatureCatalog {
    fn creature_type(&self, name: &str) -> Option<CreatureTypeId> {
        self.known.get(name).copied()
    }

    fn add_missing(&mut self, name: &str, _is_npc: bool) -> CreatureTypeId {
        let id = self.next_id;
        self.next_id += 1;
        self.known.insert(name.to_owned(), id);
        id
    }
}
