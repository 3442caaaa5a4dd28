//! Conversions between record fields and native struct fields.

use core::ffi::{c_float, c_int};

/// A record field type with a native representation.
pub trait NativeField: Sized {
    /// Type of the native struct field.
    type Raw: Copy;

    /// Converts to the native representation.
    fn lower(&self) -> Self::Raw;

    /// Converts from the native representation. Never fails; unknown values map to a documented
    /// default of the implementing type.
    fn lift(raw: Self::Raw) -> Self;
}

/// Native types with a value meaning "unset, let the library decide".
pub trait SentinelRaw: Copy + PartialEq {
    /// The sentinel value.
    const SENTINEL: Self;
}

impl SentinelRaw for c_int {
    const SENTINEL: Self = -1;
}

impl SentinelRaw for u32 {
    const SENTINEL: Self = u32::MAX;
}

impl<const N: usize> SentinelRaw for [c_int; N] {
    const SENTINEL: Self = [-1; N];
}

impl NativeField for bool {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        c_int::from(*self)
    }

    fn lift(raw: c_int) -> Self {
        raw != 0
    }
}

impl NativeField for i32 {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        *self
    }

    fn lift(raw: c_int) -> Self {
        raw
    }
}

impl NativeField for u32 {
    type Raw = u32;

    fn lower(&self) -> u32 {
        *self
    }

    fn lift(raw: u32) -> Self {
        raw
    }
}

impl NativeField for f32 {
    type Raw = c_float;

    fn lower(&self) -> c_float {
        *self
    }

    fn lift(raw: c_float) -> Self {
        raw
    }
}

impl<const N: usize> NativeField for [i32; N] {
    type Raw = [c_int; N];

    fn lower(&self) -> [c_int; N] {
        *self
    }

    fn lift(raw: [c_int; N]) -> Self {
        raw
    }
}

/// `None` is the native sentinel.
///
/// `Some(v)` where `v` lowers to the sentinel is indistinguishable from `None` on the native
/// side and lifts back as `None`.
impl<T> NativeField for Option<T>
where
    T: NativeField,
    T::Raw: SentinelRaw,
{
    type Raw = T::Raw;

    fn lower(&self) -> T::Raw {
        match self {
            Some(value) => value.lower(),
            None => T::Raw::SENTINEL,
        }
    }

    fn lift(raw: T::Raw) -> Self {
        if raw == T::Raw::SENTINEL {
            None
        } else {
            Some(T::lift(raw))
        }
    }
}

/// Lowers an optional metadata blob to a borrowed `{pointer, length}` pair.
///
/// Empty blobs are passed as null.
pub fn lower_blob(blob: Option<&[u8]>) -> (*const u8, usize) {
    match blob {
        Some(bytes) if !bytes.is_empty() => (bytes.as_ptr(), bytes.len()),
        _ => (core::ptr::null(), 0),
    }
}

/// Copies a native `{pointer, length}` pair into an owned blob.
///
/// # Safety
///
/// `ptr` must be null or valid for reads of `len` bytes.
pub unsafe fn lift_blob(ptr: *const u8, len: usize) -> Option<Vec<u8>> {
    if ptr.is_null() || len == 0 {
        return None;
    }

    // SAFETY: guaranteed by the caller.
    Some(unsafe { core::slice::from_raw_parts(ptr, len) }.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, 1)]
    #[case(false, 0)]
    fn test_bool(#[case] value: bool, #[case] raw: c_int) {
        assert_eq!(value.lower(), raw);
        assert_eq!(bool::lift(raw), value);
    }

    #[test]
    fn test_any_non_zero_int_is_true() {
        assert!(bool::lift(7));
        assert!(bool::lift(-1));
    }

    #[rstest]
    #[case(None, -1)]
    #[case(Some(0), 0)]
    #[case(Some(60), 60)]
    fn test_optional_int(#[case] value: Option<i32>, #[case] raw: c_int) {
        assert_eq!(value.lower(), raw);
        assert_eq!(Option::<i32>::lift(raw), value);
    }

    #[test]
    fn test_optional_u32_uses_all_ones() {
        assert_eq!(Option::<u32>::None.lower(), 0xFFFF_FFFF);
        assert_eq!(Option::<u32>::lift(0xFFFF_FFFF), None);
        assert_eq!(Option::<u32>::lift(0x00FF_FFFF), Some(0x00FF_FFFF));
    }

    #[test]
    fn test_optional_array_sentinel_is_all_minus_one() {
        assert_eq!(Option::<[i32; 4]>::None.lower(), [-1; 4]);
        assert_eq!(Option::<[i32; 4]>::lift([-1; 4]), None);
        assert_eq!(Option::<[i32; 4]>::lift([0, 0, 16, -1]), Some([0, 0, 16, -1]));
    }

    #[test]
    fn test_some_sentinel_collapses_to_none() {
        let value = Some(-1);
        assert_eq!(Option::<i32>::lift(value.lower()), None);
    }

    #[test]
    fn test_blob_lowering() {
        let bytes = [1u8, 2, 3];
        let (ptr, len) = lower_blob(Some(&bytes));
        assert_eq!(ptr, bytes.as_ptr());
        assert_eq!(len, 3);

        assert_eq!(lower_blob(None), (core::ptr::null(), 0));
        assert_eq!(lower_blob(Some(&[])), (core::ptr::null(), 0));
    }

    #[test]
    fn test_blob_lifting() {
        let bytes = [9u8, 8, 7];
        assert_eq!(unsafe { lift_blob(bytes.as_ptr(), bytes.len()) }, Some(bytes.to_vec()));
        assert_eq!(unsafe { lift_blob(core::ptr::null(), 10) }, None);
        assert_eq!(unsafe { lift_blob(bytes.as_ptr(), 0) }, None);
    }
}
