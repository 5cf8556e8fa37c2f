/// Order-preserving key encoding.
///
/// Integers are written big-endian; signed integers get their sign bit
/// flipped first. The resulting byte strings sort (memcmp) in the same order
/// as the tuples they encode, so ascending scans follow numeric order.
use crate::ids::PeerId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyBuf(Vec<u8>);

impl KeyBuf {
    pub fn new() -> Self {
        KeyBuf(Vec::with_capacity(24))
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i32(self, v: i32) -> Self {
        self.u32((v as u32) ^ (1 << 31))
    }

    pub fn i64(self, v: i64) -> Self {
        self.u64((v as u64) ^ (1 << 63))
    }

    pub fn peer(self, peer: PeerId) -> Self {
        self.i64(peer.to_i64())
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Sequential reader for keys built with [`KeyBuf`]. Returns `None` when the
/// key is shorter than expected.
pub struct KeyReader<'a> {
    data: &'a [u8],
}

impl<'a> KeyReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        KeyReader { data }
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.data.len() < N {
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[..N]);
        self.data = &self.data[N..];
        Some(out)
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|b| b[0])
    }

    pub fn u32(&mut self) -> Option<u32> {
        self.take::<4>().map(u32::from_be_bytes)
    }

    pub fn u64(&mut self) -> Option<u64> {
        self.take::<8>().map(u64::from_be_bytes)
    }

    pub fn i32(&mut self) -> Option<i32> {
        self.u32().map(|v| (v ^ (1 << 31)) as i32)
    }

    pub fn i64(&mut self) -> Option<i64> {
        self.u64().map(|v| (v ^ (1 << 63)) as i64)
    }

    pub fn peer(&mut self) -> Option<PeerId> {
        self.i64().map(PeerId::from_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Smallest key greater than every key starting with `prefix`, or `None`
/// if no such key exists (prefix is all `0xff`).
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut out = prefix.to_vec();
    while let Some(last) = out.pop() {
        if last < u8::MAX {
            out.push(last + 1);
            return Some(out);
        }
    }
    None
}
