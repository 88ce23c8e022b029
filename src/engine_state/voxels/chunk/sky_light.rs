use super::CHUNK_SIZE;

/// Full, unobstructed outdoor light.
pub const MAX_SKY_LIGHT: u8 = 15;

/// Packed 4-bit skylight levels, two blocks per byte.
///
/// Even block indices live in the low nibble, odd ones in the high nibble.
/// A cleared array (after an unload) has no storage and reads as 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkyLight {
    nibbles: Vec<u8>,
}

impl SkyLight {
    /// A full-size array with every level at 0.
    pub fn dark() -> Self {
        SkyLight {
            nibbles: vec![0; CHUNK_SIZE as usize / 2],
        }
    }

    /// A zero-length array for pooled slots.
    pub fn cleared() -> Self {
        SkyLight { nibbles: Vec::new() }
    }

    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        match self.nibbles.get(index / 2) {
            Some(byte) if index % 2 == 0 => byte & 0x0F,
            Some(byte) => byte >> 4,
            None => 0,
        }
    }

    /// Writes one level without touching the block packed beside it.
    ///
    /// Levels above 15 are clamped. Writing into a cleared array allocates it.
    #[inline]
    pub fn set(&mut self, index: usize, level: u8) {
        if self.nibbles.is_empty() {
            *self = Self::dark();
        }
        let level = level.min(MAX_SKY_LIGHT);
        let byte = &mut self.nibbles[index / 2];
        if index % 2 == 0 {
            *byte = (*byte & 0xF0) | level;
        } else {
            *byte = (*byte & 0x0F) | (level << 4);
        }
    }

    pub fn fill(&mut self, level: u8) {
        let level = level.min(MAX_SKY_LIGHT);
        if self.nibbles.is_empty() {
            *self = Self::dark();
        }
        self.nibbles.fill(level | (level << 4));
    }

    pub fn is_cleared(&self) -> bool {
        self.nibbles.is_empty()
    }

    /// Bytes of backing storage.
    pub fn byte_len(&self) -> usize {
        self.nibbles.len()
    }
}
