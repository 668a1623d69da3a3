// Block fingerprint: Adler-32 over one index block.
//
// The fingerprint never reaches the delta stream; it only has to be the same
// function on the index side and the probe side. With the `simd` feature the
// checksum comes from simd-adler32, otherwise a scalar fallback computes the
// identical value.

/// Adler-32 of `block`.
#[inline]
pub fn block_fingerprint(block: &[u8]) -> u32 {
    #[cfg(feature = "simd")]
    {
        let mut hasher = simd_adler32::Adler32::new();
        hasher.write(block);
        hasher.finish()
    }
    #[cfg(not(feature = "simd"))]
    {
        const MOD_ADLER: u32 = 65521;
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in block {
            a = (a + u32::from(byte)) % MOD_ADLER;
            b = (b + a) % MOD_ADLER;
        }
        (b << 16) | a
    }
}
