use otbm_item::{decode_item, encode_item, AttrValue, Item, ItemBody};
use otbm_node::{node_type, parse_file, NodeWriter};
use otbm_types::{ItemCategory, ItemTypeCatalog, ItemTypeInfo, MapVersion, OtbmVersion, Position};

struct StubCatalog;

impl ItemTypeCatalog for StubCatalog {
    fn item_type(&self, id: u16) -> Option<ItemTypeInfo> {
        let category = match id {
            1387 => ItemCategory::Teleport,
            1987 => ItemCategory::Container,
            1984 => ItemCategory::Door,
            1985 => ItemCategory::Depot,
            _ => ItemCategory::Plain,
        };
        Some(ItemTypeInfo {
            category,
            stackable: matches!(id, 2148 | 2160),
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

fn encode_single(item: &Item, version: MapVersion) -> Vec<u8> {
    let mut w = NodeWriter::new(Vec::new());
    encode_item(item, version, &StubCatalog, &mut w).unwrap();
    w.finish().unwrap()
}

fn decode_single(bytes: &[u8], version: MapVersion) -> Item {
    let wrapped = [b"OTBM".as_slice(), bytes].concat();
    let root = parse_file(&wrapped, &[*b"OTBM"]).unwrap();
    decode_item(&root, version, &StubCatalog).unwrap()
}

fn v(otbm: OtbmVersion) -> MapVersion {
    MapVersion {
        otbm,
        items_major: 1,
        items_minor: 860,
    }
}

/// Scenario 3: stackable inline V1 produces exact bytes and round-trips.
#[test]
fn stackable_item_v1_is_inline() {
    let mut item = Item::plain(2148);
    item.subtype = 50;

    let bytes = encode_single(&item, v(OtbmVersion::V1));
    assert_eq!(
        bytes,
        vec![
            otbm_node::NODE_START,
            node_type::ITEM,
            0x64,
            0x08, // id 2148 little-endian
            50,
            otbm_node::NODE_END,
        ]
    );

    let decoded = decode_single(&bytes, v(OtbmVersion::V1));
    assert_eq!(decoded.id, 2148);
    assert_eq!(decoded.subtype, 50);
}

/// Scenario 5: teleport destination emits the exact documented bytes.
#[test]
fn teleport_emits_documented_tele_dest_bytes() {
    let item = Item {
        body: ItemBody::Teleport {
            destination: Position::new(60, 60, 7),
        },
        ..Item::plain(1387)
    };

    let bytes = encode_single(&item, v(OtbmVersion::V4));
    // tag(09) x=3C00 y=3C00 z=07 is the documented exact payload for
    // TELE_DEST; it appears right after the (empty) attribute map.
    assert!(bytes.windows(6).any(|w| w == [0x09, 0x3C, 0x00, 0x3C, 0x00, 0x07]));

    let decoded = decode_single(&bytes, v(OtbmVersion::V4));
    assert_eq!(
        decoded.body,
        ItemBody::Teleport {
            destination: Position::new(60, 60, 7)
        }
    );
}

/// Scenario 4: a V4 container with two children, one carrying an
/// actionId through the generic attribute map, round-trips in order.
#[test]
fn container_round_trip_v4_with_attribute_map() {
    let mut child_b = Item::plain(2400);
    child_b.action_id = 1001;

    let mut child_a = Item::plain(2160);
    child_a.subtype = 1;

    let container = Item {
        body: ItemBody::Container {
            children: vec![child_a, child_b],
        },
        ..Item::plain(1987)
    };

    let bytes = encode_single(&container, v(OtbmVersion::V4));
    let decoded = decode_single(&bytes, v(OtbmVersion::V4));

    let ItemBody::Container { children } = decoded.body else {
        panic!("expected container");
    };
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id, 2160);
    assert_eq!(children[0].subtype, 1);
    assert_eq!(children[1].id, 2400);
    assert_eq!(children[1].action_id, 1001);
}

#[test]
fn legacy_v2_action_and_unique_id_round_trip() {
    let mut item = Item::plain(2400);
    item.action_id = 42;
    item.unique_id = 7;
    item.text = Some("hello".into());

    let bytes = encode_single(&item, v(OtbmVersion::V2));
    let decoded = decode_single(&bytes, v(OtbmVersion::V2));

    assert_eq!(decoded.action_id, 42);
    assert_eq!(decoded.unique_id, 7);
    assert_eq!(decoded.text.unwrap().to_string_lossy(), "hello");
}

#[test]
fn door_and_depot_variants_round_trip() {
    let door = Item {
        body: ItemBody::Door { door_id: 5 },
        ..Item::plain(1984)
    };
    let bytes = encode_single(&door, v(OtbmVersion::V4));
    let decoded = decode_single(&bytes, v(OtbmVersion::V4));
    assert_eq!(decoded.body, ItemBody::Door { door_id: 5 });

    let depot = Item {
        body: ItemBody::Depot { depot_id: 12 },
        ..Item::plain(1985)
    };
    let bytes = encode_single(&depot, v(OtbmVersion::V4));
    let decoded = decode_single(&bytes, v(OtbmVersion::V4));
    assert_eq!(decoded.body, ItemBody::Depot { depot_id: 12 });
}

#[test]
fn arbitrary_attribute_map_entries_round_trip() {
    let mut item = Item::plain(2000);
    item.attributes
        .insert("custom".to_owned(), AttrValue::Bool(true));

    let bytes = encode_single(&item, v(OtbmVersion::V4));
    let decoded = decode_single(&bytes, v(OtbmVersion::V4));
    assert_eq!(decoded.attributes.get("custom"), Some(&AttrValue::Bool(true)));
}
