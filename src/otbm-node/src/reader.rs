use crate::{NodeError, PayloadReader, ESCAPE, NODE_END, NODE_START};

/// A parsed node: its type byte, its own unescaped payload bytes, and
/// its children in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawNode {
    pub node_type: u8,
    payload: Vec<u8>,
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// A cursor for reading this node's own payload attributes.
    #[inline]
    pub fn payload_reader(&self) -> PayloadReader<'_> {
        PayloadReader::new(&self.payload)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Parses a whole MAP file: checks the 4-byte magic against the
/// accepted allowlist, then parses the single root node and its
/// descendants.
pub fn parse_file(data: &[u8], accepted_magics: &[[u8; 4]]) -> Result<RawNode, NodeError> {
    let magic: [u8; 4] = data
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or(NodeError::BadMagic)?;

    if !accepted_magics.contains(&magic) {
        return Err(NodeError::BadMagic);
    }

    let mut pos = 4;
    parse_node(data, &mut pos)
}

fn parse_node(data: &[u8], pos: &mut usize) -> Result<RawNode, NodeError> {
    match data.get(*pos) {
        Some(&NODE_START) => *pos += 1,
        other => return Err(NodeError::ExpectedNodeStart(other.copied().unwrap_or(0))),
    }

    let node_type = *data.get(*pos).ok_or(NodeError::UnexpectedEof)?;
    *pos += 1;

    let mut payload = Vec::new();
    let mut children = Vec::new();

    loop {
        match data.get(*pos) {
            None => return Err(NodeError::UnterminatedNode),
            Some(&ESCAPE) => {
                let byte = *data.get(*pos + 1).ok_or(NodeError::UnexpectedEof)?;
                payload.push(byte);
                *pos += 2;
            }
            Some(&NODE_END) => {
                *pos += 1;
                return Ok(RawNode {
                    node_type,
                    payload,
                    children,
                });
            }
            Some(&NODE_START) => {
                children.push(parse_node(data, pos)?);
            }
            Some(&byte) => {
                payload.push(byte);
                *pos += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node_type, NodeWriter};

    #[test]
    fn parses_escaped_payload_bytes() {
        let mut w = NodeWriter::new(Vec::new());
        w.start_node(node_type::ROOT).unwrap();
        w.write_u8(NODE_START).unwrap();
        w.write_u8(NODE_END).unwrap();
        w.write_u8(ESCAPE).unwrap();
        w.write_u8(0x41).unwrap();
        w.end_node().unwrap();
        let bytes = w.into_inner();

        let root = parse_file(&[b"OTBM".as_slice(), &bytes].concat(), &[*b"OTBM"]).unwrap();
        assert_eq!(root.node_type, node_type::ROOT);
        assert_eq!(root.payload(), &[NODE_START, NODE_END, ESCAPE, 0x41]);
    }

    #[test]
    fn rejects_unknown_magic() {
        let err = parse_file(b"XXXX", &[*b"OTBM"]).unwrap_err();
        assert!(matches!(err, NodeError::BadMagic));
    }

    #[test]
    fn nested_children_in_order() {
        let mut w = NodeWriter::new(Vec::new());
        w.start_node(node_type::MAP_DATA).unwrap();
        w.start_node(node_type::TILE_AREA).unwrap();
        w.end_node().unwrap();
        w.start_node(node_type::TOWNS).unwrap();
        w.end_node().unwrap();
        w.end_node().unwrap();
        let bytes = w.into_inner();

        let root = parse_file(&[b"OTBM".as_slice(), &bytes].concat(), &[*b"OTBM"]).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].node_type, node_type::TILE_AREA);
        assert_eq!(root.children[1].node_type, node_type::TOWNS);
    }
}
