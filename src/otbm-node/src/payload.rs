use otbm_utils::binary;

use crate::NodeError;

/// A cursor over one node's already-unescaped payload bytes.
///
/// Every read advances the cursor; once a read runs past the end of
/// the payload it returns [`NodeError::UnexpectedEof`] and the cursor
/// does not move, so repeated reads past the end keep failing the
/// same way, matching spec's "stream goes non-OK and stays there"
/// semantics without needing a separate poison flag.
#[derive(Clone, Copy, Debug)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Remaining unread bytes in this payload.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], NodeError> {
        let end = self.pos.checked_add(n).ok_or(NodeError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(NodeError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub fn get_u8(&mut self) -> Result<u8, NodeError> {
        Ok(binary::uint8(&mut self.take(1)?)?)
    }

    /// Alias for [`Self::get_u8`], matching spec's `getByte`.
    #[inline]
    pub fn get_byte(&mut self) -> Result<u8, NodeError> {
        self.get_u8()
    }

    pub fn get_u16(&mut self) -> Result<u16, NodeError> {
        Ok(binary::uint16(&mut self.take(2)?)?)
    }

    pub fn get_u32(&mut self) -> Result<u32, NodeError> {
        Ok(binary::uint32(&mut self.take(4)?)?)
    }

    /// Length-prefixed, byte-preserving string (no UTF-8 enforcement).
    pub fn get_string(&mut self) -> Result<Vec<u8>, NodeError> {
        let len = self.get_u16()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), NodeError> {
        self.take(n).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order_and_fails_past_end() {
        let data = [0x01, 0x34, 0x12, 0x04, 0x00, b'a', b'b', b'c', b'd'];
        let mut r = PayloadReader::new(&data);
        assert_eq!(r.get_u8().unwrap(), 0x01);
        assert_eq!(r.get_u16().unwrap(), 0x1234);
        assert_eq!(r.get_string().unwrap(), b"abcd");
        assert!(r.is_empty());
        assert!(r.get_u8().is_err());
        assert!(r.get_u8().is_err());
    }
}
