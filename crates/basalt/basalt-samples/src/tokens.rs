#![forbid(unsafe_code)]

// Token payloads are opaque byte blobs to the runtime; these helpers are the
// only place the samples (and their tests) give them a type again. Native
// endianness throughout — tokens never leave the process.

pub fn f64_tokens(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

pub fn i32_tokens(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

pub fn as_f64s(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|chunk| f64::from_ne_bytes(chunk.try_into().unwrap()))
        .collect()
}

pub fn as_i32s(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| i32::from_ne_bytes(chunk.try_into().unwrap()))
        .collect()
}

pub fn as_u8s(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
}

pub(crate) fn write_f64s(out: &mut [u8], values: &[f64]) {
    for (chunk, value) in out.chunks_exact_mut(8).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}

pub(crate) fn write_i32s(out: &mut [u8], values: &[i32]) {
    for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_blobs_round_trip() {
        let values = [3.0, -6.5, 0.0];
        assert_eq!(as_f64s(&f64_tokens(&values)), values);
    }

    #[test]
    fn i32_blobs_round_trip() {
        let values = [2, 3, 5, 7];
        assert_eq!(as_i32s(&i32_tokens(&values)), values);
    }
}
