#[cfg(test)]
pub mod test {
    use pretty_assertions::assert_eq;

    #[allow(clippy::missing_panics_doc)]
    pub fn assert_bytes_eq(l: &[u8], r: &[u8]) {
        assert_eq!(hex::encode(l), hex::encode(r));
    }

    /// Copy of `bytes` with bit `bit` flipped, counted from the most significant bit of byte 0
    pub fn flip_bit(bytes: &[u8], bit: usize) -> Vec<u8> {
        let mut flipped = bytes.to_vec();
        flipped[bit / 8] ^= 0x80 >> (bit % 8);
        flipped
    }
}
