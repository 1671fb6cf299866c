use otbm_node::{node_type, parse_file, NodeWriter, ESCAPE, NODE_END, NODE_START};

/// For any byte sequence produced by the writer, unescape-parsing the
/// stream yields the same node tree the writer addressed.
#[test]
fn framing_round_trip_with_all_control_bytes_in_payload() {
    let mut w = NodeWriter::new(Vec::new());
    w.start_node(node_type::MAP_DATA).unwrap();
    w.write_u8(NODE_START).unwrap();
    w.write_u8(NODE_END).unwrap();
    w.write_u8(ESCAPE).unwrap();
    w.write_u16(0xFEFF).unwrap();
    w.write_string(&[NODE_START, ESCAPE, NODE_END, b'x']).unwrap();

    w.start_node(node_type::TILE_AREA).unwrap();
    w.write_u32(0xFDFEFFFD).unwrap();
    w.end_node().unwrap();

    w.end_node().unwrap();

    let bytes = w.finish().unwrap();
    let file = [b"OTBM".as_slice(), &bytes].concat();

    let root = parse_file(&file, &[*b"OTBM"]).unwrap();
    assert_eq!(root.node_type, node_type::MAP_DATA);

    let mut r = root.payload_reader();
    assert_eq!(r.get_u8().unwrap(), NODE_START);
    assert_eq!(r.get_u8().unwrap(), NODE_END);
    assert_eq!(r.get_u8().unwrap(), ESCAPE);
    assert_eq!(r.get_u16().unwrap(), 0xFEFF);
    assert_eq!(r.get_string().unwrap(), vec![NODE_START, ESCAPE, NODE_END, b'x']);

    assert_eq!(root.children.len(), 1);
    let child = &root.children[0];
    assert_eq!(child.node_type, node_type::TILE_AREA);
    let mut cr = child.payload_reader();
    assert_eq!(cr.get_u32().unwrap(), 0xFDFEFFFD);
}
