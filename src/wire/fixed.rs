// Tue Jan 13 2026 - Alex

use crate::wire::WireError;
use bytes::{Buf, BufMut, BytesMut};

/// A record that crosses the participant boundary by value.
///
/// Implementors write exactly `SIZE` bytes and read them back in the same
/// order. Nothing is copied by raw memory layout, so a type holding a `Vec`,
/// `String`, `Box` or reference cannot be moved this way unless it spells out
/// a fixed encoding for itself.
pub trait FixedSize: Copy + Send + Sync + 'static {
    const SIZE: usize;

    fn write_to<B: BufMut>(&self, buf: &mut B);

    /// `buf` must hold at least `SIZE` remaining bytes.
    fn read_from<B: Buf>(buf: &mut B) -> Self;
}

macro_rules! impl_fixed_size {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl FixedSize for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn write_to<B: BufMut>(&self, buf: &mut B) {
                    buf.$put(*self);
                }

                fn read_from<B: Buf>(buf: &mut B) -> Self {
                    buf.$get()
                }
            }
        )*
    };
}

impl_fixed_size! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16_le, get_u16_le;
    i16 => put_i16_le, get_i16_le;
    u32 => put_u32_le, get_u32_le;
    i32 => put_i32_le, get_i32_le;
    u64 => put_u64_le, get_u64_le;
    i64 => put_i64_le, get_i64_le;
    u128 => put_u128_le, get_u128_le;
    i128 => put_i128_le, get_i128_le;
    f32 => put_f32_le, get_f32_le;
    f64 => put_f64_le, get_f64_le;
}

impl FixedSize for usize {
    const SIZE: usize = 8;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(*self as u64);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        buf.get_u64_le() as usize
    }
}

impl FixedSize for isize {
    const SIZE: usize = 8;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_i64_le(*self as i64);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        buf.get_i64_le() as isize
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(*self as u8);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        buf.get_u8() != 0
    }
}

impl FixedSize for char {
    const SIZE: usize = 4;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(*self as u32);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        char::from_u32(buf.get_u32_le()).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl<T: FixedSize, const N: usize> FixedSize for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        for item in self {
            item.write_to(buf);
        }
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        std::array::from_fn(|_| T::read_from(buf))
    }
}

pub fn encode_slice<T: FixedSize>(items: &[T]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(items.len() * T::SIZE);
    for item in items {
        item.write_to(&mut buf);
    }
    buf
}

pub fn encode_value<T: FixedSize>(value: &T) -> BytesMut {
    encode_slice(std::slice::from_ref(value))
}

/// Decodes every element in `data`; the length must be a whole number of elements.
///
/// Zero-sized elements leave no trace in the buffer, so their count cannot be
/// recovered here; use [`decode_exact`] for them.
pub fn decode_vec<T: FixedSize>(mut data: &[u8]) -> Result<Vec<T>, WireError> {
    if T::SIZE == 0 || data.len() % T::SIZE != 0 {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        return Err(WireError::Misaligned {
            len: data.len(),
            elem_size: T::SIZE,
        });
    }

    let count = data.len() / T::SIZE;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::read_from(&mut data));
    }
    Ok(items)
}

pub fn decode_exact<T: FixedSize>(data: &[u8], expected: usize) -> Result<Vec<T>, WireError> {
    if T::SIZE == 0 {
        if !data.is_empty() {
            return Err(WireError::Misaligned {
                len: data.len(),
                elem_size: 0,
            });
        }
        let mut empty: &[u8] = &[];
        return Ok((0..expected).map(|_| T::read_from(&mut empty)).collect());
    }

    let items = decode_vec(data)?;
    if items.len() != expected {
        return Err(WireError::CountMismatch {
            expected,
            actual: items.len(),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Sample {
        id: u32,
        pos: [f64; 3],
        active: bool,
    }

    impl FixedSize for Sample {
        const SIZE: usize = u32::SIZE + <[f64; 3]>::SIZE + bool::SIZE;

        fn write_to<B: BufMut>(&self, buf: &mut B) {
            self.id.write_to(buf);
            self.pos.write_to(buf);
            self.active.write_to(buf);
        }

        fn read_from<B: Buf>(buf: &mut B) -> Self {
            Self {
                id: u32::read_from(buf),
                pos: <[f64; 3]>::read_from(buf),
                active: bool::read_from(buf),
            }
        }
    }

    #[test]
    fn test_encoded_length_matches_size() {
        let records = [
            Sample { id: 1, pos: [0.5, -1.0, 2.25], active: true },
            Sample { id: 2, pos: [0.0; 3], active: false },
        ];
        let buf = encode_slice(&records);

        assert_eq!(Sample::SIZE, 29);
        assert_eq!(buf.len(), 2 * Sample::SIZE);
        assert_eq!(decode_vec::<Sample>(&buf).unwrap(), records.to_vec());
    }

    #[test]
    fn test_little_endian_layout() {
        let buf = encode_value(&0x0102_0304u32);
        assert_eq!(&buf[..], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_decode_rejects_partial_element() {
        let err = decode_vec::<u32>(&[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(err, WireError::Misaligned { len: 5, elem_size: 4 });
    }

    #[test]
    fn test_decode_exact_checks_count() {
        let buf = encode_slice(&[1u16, 2, 3]);
        let err = decode_exact::<u16>(&buf, 4).unwrap_err();
        assert_eq!(err, WireError::CountMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_char_and_usize_widths() {
        let buf = encode_slice(&['λ', '\0']);
        assert_eq!(buf.len(), 8);
        assert_eq!(decode_vec::<char>(&buf).unwrap(), vec!['λ', '\0']);

        let buf = encode_value(&usize::MAX);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_zero_sized_elements_decode_to_expected_count() {
        let items: Vec<[u32; 0]> = decode_exact(&[], 4).unwrap();
        assert_eq!(items.len(), 4);

        assert_eq!(
            decode_exact::<[u32; 0]>(&[1], 1).unwrap_err(),
            WireError::Misaligned { len: 1, elem_size: 0 }
        );
        assert!(decode_vec::<[u32; 0]>(&[]).unwrap().is_empty());
    }
}
