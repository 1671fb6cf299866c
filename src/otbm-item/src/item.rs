use std::io::Write;

use otbm_node::{attr_tag, node_type, NodeWriter, RawNode};
use otbm_types::{ItemCategory, ItemTypeCatalog, ItemTypeInfo, MapVersion, OtbmVersion, Position, RawString};

use crate::{decode_attribute_map, encode_attribute_map, AttrMap, ItemError};

/// The minor client version at and above which legacy `CHARGES` tags
/// are emitted for V2/V3 maps, per spec.md §4.3.
const CHARGES_MINOR_VERSION_GATE: u32 = 820;

/// Variant-specific payload of an item, dispatched on its `ItemType`
/// category.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemBody {
    Plain,
    Container { children: Vec<Item> },
    Teleport { destination: Position },
    Door { door_id: u8 },
    Depot { depot_id: u16 },
}

/// A single item, polymorphic over [`ItemBody`].
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: u16,
    pub subtype: u8,

    // Legacy (MAP <= V3) attributes; also the canonical source of
    // truth at V4+, where they are folded into/out of the generic
    // attribute map on the wire (see DESIGN.md's ATTRIBUTE_MAP note).
    pub action_id: u16,
    pub unique_id: u16,
    pub text: Option<RawString>,
    pub description: Option<RawString>,
    pub charges: Option<u16>,

    /// Free-form attributes beyond the well-known legacy fields
    /// above, only meaningful for MAP >= V4.
    pub attributes: AttrMap,

    pub body: ItemBody,
}

impl Item {
    /// A minimal plain item with the given type id, all other fields
    /// at their defaults.
    pub fn plain(id: u16) -> Self {
        Self {
            id,
            subtype: 0,
            action_id: 0,
            unique_id: 0,
            text: None,
            description: None,
            charges: None,
            attributes: AttrMap::new(),
            body: ItemBody::Plain,
        }
    }

    /// Whether this item is a container with at least one child.
    #[inline]
    pub fn is_complex(&self) -> bool {
        !matches!(self.body, ItemBody::Plain)
            || self.action_id != 0
            || self.unique_id != 0
            || self.text.is_some()
            || self.description.is_some()
            || self.charges.is_some()
            || !self.attributes.is_empty()
    }

    fn has_attributes(&self) -> bool {
        self.action_id != 0
            || self.unique_id != 0
            || self.text.is_some()
            || self.description.is_some()
            || self.charges.is_some()
            || !self.attributes.is_empty()
    }
}

const WELL_KNOWN_ACTION_ID: &str = "actionId";
const WELL_KNOWN_UNIQUE_ID: &str = "uniqueId";
const WELL_KNOWN_TEXT: &str = "text";
const WELL_KNOWN_DESCRIPTION: &str = "description";
const WELL_KNOWN_CHARGES: &str = "charges";

/// Decodes an item body from an `OTBM_ITEM` node.
///
/// `node.node_type` must already have been checked as
/// [`node_type::ITEM`] by the caller (a container's recursion, or the
/// tile decoder) — that check is the caller's "container child isn't
/// OTBM_ITEM" fatal condition, not this function's.
pub fn decode_item(
    node: &RawNode,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
) -> Result<Item, ItemError> {
    let mut r = node.payload_reader();
    let id = r.get_u16()?;

    let info = catalog.item_type(id).unwrap_or(ItemTypeInfo {
        category: ItemCategory::Plain,
        stackable: false,
        is_splash: false,
        is_fluid_container: false,
        minor_version_gate: None,
        is_meta_item: false,
        has_border_equivalent: false,
        ground_equivalent_id: None,
        is_ground: false,
    });

    let mut subtype = 0u8;
    if version.otbm == OtbmVersion::V1 && info.is_stackable_like() {
        subtype = r.get_u8()?;
    }

    let mut action_id = 0u16;
    let mut unique_id = 0u16;
    let mut text = None;
    let mut description = None;
    let mut charges = None;
    let mut attributes = AttrMap::new();
    let mut destination = None;
    let mut door_id = 0u8;
    let mut depot_id = 0u16;

    while !r.is_empty() {
        let tag = r.get_u8()?;
        match tag {
            attr_tag::COUNT => subtype = r.get_u8()?,
            attr_tag::ACTION_ID => action_id = r.get_u16()?,
            attr_tag::UNIQUE_ID => unique_id = r.get_u16()?,
            attr_tag::TEXT => text = Some(RawString(r.get_string()?)),
            attr_tag::DESC => description = Some(RawString(r.get_string()?)),
            attr_tag::RUNE_CHARGES => subtype = r.get_u8()?,
            attr_tag::CHARGES => charges = Some(r.get_u16()?),
            attr_tag::TELE_DEST => {
                let x = r.get_u16()?;
                let y = r.get_u16()?;
                let z = r.get_u8()?;
                if matches!(info.category, ItemCategory::Teleport) {
                    destination = Some(Position::new(x, y, z));
                }
                // Else: defensively consumed per spec's fixed-width skip table.
            }
            attr_tag::HOUSEDOORID => {
                let value = r.get_u8()?;
                if matches!(info.category, ItemCategory::Door) {
                    door_id = value;
                }
            }
            attr_tag::DEPOT_ID => {
                let value = r.get_u16()?;
                if matches!(info.category, ItemCategory::Depot) {
                    depot_id = value;
                }
            }
            attr_tag::ATTRIBUTE_MAP => {
                attributes = decode_attribute_map(&mut r)?;
                extract_well_known(&mut attributes, &mut action_id, &mut unique_id, &mut text, &mut description, &mut charges);
            }
            other => return Err(ItemError::UnknownAttributeTag { id, tag: other }),
        }
    }

    let body = match info.category {
        ItemCategory::Container => ItemBody::Container {
            children: decode_children(node, version, catalog)?,
        },
        ItemCategory::Teleport => ItemBody::Teleport {
            destination: destination.unwrap_or_default(),
        },
        ItemCategory::Door => ItemBody::Door { door_id },
        ItemCategory::Depot => ItemBody::Depot { depot_id },
        ItemCategory::Plain => {
            if !node.children.is_empty() {
                log::warn!("item {id} has unexpected children and is not a container; dropping them");
            }
            ItemBody::Plain
        }
    };

    Ok(Item {
        id,
        subtype,
        action_id,
        unique_id,
        text,
        description,
        charges,
        attributes,
        body,
    })
}

fn decode_children(
    node: &RawNode,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
) -> Result<Vec<Item>, ItemError> {
    node.children
        .iter()
        .map(|child| {
            if child.node_type != node_type::ITEM {
                return Err(ItemError::ExpectedItemChild(child.node_type));
            }
            decode_item(child, version, catalog)
        })
        .collect()
}

fn extract_well_known(
    attributes: &mut AttrMap,
    action_id: &mut u16,
    unique_id: &mut u16,
    text: &mut Option<RawString>,
    description: &mut Option<RawString>,
    charges: &mut Option<u16>,
) {
    use crate::AttrValue;

    if let Some(AttrValue::U16(v)) = attributes.shift_remove(WELL_KNOWN_ACTION_ID) {
        *action_id = v;
    }
    if let Some(AttrValue::U16(v)) = attributes.shift_remove(WELL_KNOWN_UNIQUE_ID) {
        *unique_id = v;
    }
    if let Some(AttrValue::String(v)) = attributes.shift_remove(WELL_KNOWN_TEXT) {
        *text = Some(v);
    }
    if let Some(AttrValue::String(v)) = attributes.shift_remove(WELL_KNOWN_DESCRIPTION) {
        *description = Some(v);
    }
    if let Some(AttrValue::U16(v)) = attributes.shift_remove(WELL_KNOWN_CHARGES) {
        *charges = Some(v);
    }
}

/// Encodes an item as a full `OTBM_ITEM` node, recursing into
/// container children.
pub fn encode_item<W: Write>(
    item: &Item,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    w: &mut NodeWriter<W>,
) -> Result<(), ItemError> {
    let info = catalog.item_type(item.id).unwrap_or(ItemTypeInfo {
        category: ItemCategory::Plain,
        stackable: false,
        is_splash: false,
        is_fluid_container: false,
        minor_version_gate: None,
        is_meta_item: false,
        has_border_equivalent: false,
        ground_equivalent_id: None,
        is_ground: false,
    });

    w.start_node(node_type::ITEM)?;
    w.write_u16(item.id)?;

    if version.otbm == OtbmVersion::V1 && info.is_stackable_like() {
        w.write_u8(item.subtype)?;
    }

    if version.otbm >= OtbmVersion::V4 {
        let mut full_map = item.attributes.clone();
        if item.action_id != 0 {
            full_map.insert(WELL_KNOWN_ACTION_ID.to_owned(), crate::AttrValue::U16(item.action_id));
        }
        if item.unique_id != 0 {
            full_map.insert(WELL_KNOWN_UNIQUE_ID.to_owned(), crate::AttrValue::U16(item.unique_id));
        }
        if let Some(text) = &item.text {
            full_map.insert(WELL_KNOWN_TEXT.to_owned(), crate::AttrValue::String(text.clone()));
        }
        if let Some(description) = &item.description {
            full_map.insert(
                WELL_KNOWN_DESCRIPTION.to_owned(),
                crate::AttrValue::String(description.clone()),
            );
        }
        if let Some(charges) = item.charges {
            full_map.insert(WELL_KNOWN_CHARGES.to_owned(), crate::AttrValue::U16(charges));
        }

        if !full_map.is_empty() {
            w.write_u8(attr_tag::ATTRIBUTE_MAP)?;
            encode_attribute_map(w, &full_map)?;
        }
        if info.is_stackable_like() {
            w.write_u8(attr_tag::COUNT)?;
            w.write_u8(item.subtype)?;
        }
    } else {
        if let Some(charges) = item.charges {
            if version.client() >= CHARGES_MINOR_VERSION_GATE {
                w.write_u8(attr_tag::CHARGES)?;
                w.write_u16(charges)?;
            }
        }
        if item.action_id != 0 {
            w.write_u8(attr_tag::ACTION_ID)?;
            w.write_u16(item.action_id)?;
        }
        if item.unique_id != 0 {
            w.write_u8(attr_tag::UNIQUE_ID)?;
            w.write_u16(item.unique_id)?;
        }
        if let Some(text) = &item.text {
            w.write_u8(attr_tag::TEXT)?;
            w.write_string(text.as_bytes())?;
        }
        if let Some(description) = &item.description {
            w.write_u8(attr_tag::DESC)?;
            w.write_string(description.as_bytes())?;
        }
    }

    match &item.body {
        ItemBody::Teleport { destination } => {
            w.write_u8(attr_tag::TELE_DEST)?;
            w.write_u16(destination.x)?;
            w.write_u16(destination.y)?;
            w.write_u8(destination.z)?;
        }
        ItemBody::Door { door_id } if *door_id != 0 => {
            w.write_u8(attr_tag::HOUSEDOORID)?;
            w.write_u8(*door_id)?;
        }
        ItemBody::Depot { depot_id } if *depot_id != 0 => {
            w.write_u8(attr_tag::DEPOT_ID)?;
            w.write_u16(*depot_id)?;
        }
        _ => {}
    }

    if let ItemBody::Container { children } = &item.body {
        for child in children {
            encode_item(child, version, catalog, w)?;
        }
    }

    w.end_node()?;
    Ok(())
}

/// Whether a ground item can be written in the compact inline form:
/// no attributes, not a meta item, and without a border-equivalent
/// already present among the tile's other items.
pub fn can_write_compact_ground(
    ground: &Item,
    info: &ItemTypeInfo,
    tile_item_ids: impl Iterator<Item = u16>,
) -> bool {
    if info.is_meta_item || ground.has_attributes() {
        return false;
    }
    if info.has_border_equivalent {
        if let Some(equivalent) = info.ground_equivalent_id {
            if tile_item_ids.into_iter().any(|id| id == equivalent) {
                return false;
            }
        }
    }
    true
}
