use std::io::Write;

use crate::{NodeError, ESCAPE, NODE_END, NODE_START};

/// Buffered node-tree writer. Generic over any [`Write`] sink: a
/// [`Vec<u8>`] memory sink (used by the archive component) and a
/// `BufWriter<File>` disk sink share this one implementation.
pub struct NodeWriter<W> {
    out: W,
    depth: usize,
}

impl<W: Write> NodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Opens a node: emits `NODE_START` then the type byte.
    pub fn start_node(&mut self, node_type: u8) -> Result<(), NodeError> {
        self.out.write_all(&[NODE_START, node_type])?;
        self.depth += 1;
        Ok(())
    }

    /// Closes the innermost open node. Every `start_node` must be
    /// paired with exactly one `end_node`.
    pub fn end_node(&mut self) -> Result<(), NodeError> {
        if self.depth == 0 {
            return Err(NodeError::UnbalancedNode);
        }
        self.out.write_all(&[NODE_END])?;
        self.depth -= 1;
        Ok(())
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<(), NodeError> {
        if matches!(byte, NODE_START | NODE_END | ESCAPE) {
            self.out.write_all(&[ESCAPE, byte])?;
        } else {
            self.out.write_all(&[byte])?;
        }
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), NodeError> {
        self.write_raw_byte(v)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<(), NodeError> {
        v.to_le_bytes().into_iter().try_for_each(|b| self.write_raw_byte(b))
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), NodeError> {
        v.to_le_bytes().into_iter().try_for_each(|b| self.write_raw_byte(b))
    }

    /// Writes a length-prefixed, byte-preserving string.
    pub fn write_string(&mut self, v: &[u8]) -> Result<(), NodeError> {
        self.write_u16(v.len() as u16)?;
        v.iter().copied().try_for_each(|b| self.write_raw_byte(b))
    }

    /// Finalizes the stream, failing if any `start_node` was left
    /// unclosed, and returns the underlying sink.
    pub fn finish(self) -> Result<W, NodeError> {
        if self.depth != 0 {
            return Err(NodeError::UnbalancedNode);
        }
        Ok(self.out)
    }
}

impl NodeWriter<Vec<u8>> {
    /// Returns the buffered bytes regardless of node balance, for
    /// tests and callers that intentionally inspect partial output.
    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_type;

    #[test]
    fn escapes_control_bytes_in_payload() {
        let mut w = NodeWriter::new(Vec::new());
        w.start_node(node_type::ROOT).unwrap();
        w.write_u8(NODE_START).unwrap();
        w.end_node().unwrap();
        let bytes = w.finish().unwrap();

        assert_eq!(
            bytes,
            vec![NODE_START, node_type::ROOT, ESCAPE, NODE_START, NODE_END]
        );
    }

    #[test]
    fn unbalanced_nodes_fail_finish() {
        let mut w = NodeWriter::new(Vec::new());
        w.start_node(node_type::ROOT).unwrap();
        assert!(matches!(w.finish(), Err(NodeError::UnbalancedNode)));
    }

    #[test]
    fn end_node_without_start_fails() {
        let mut w = NodeWriter::new(Vec::new());
        assert!(matches!(w.end_node(), Err(NodeError::UnbalancedNode)));
    }
}
