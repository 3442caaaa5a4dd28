/// Declares an option record and its field-by-field mapping onto a native struct.
///
/// Each field names the native field it maps to. The conversion is chosen by the field's type
/// through [`NativeField`](crate::options::NativeField), so sentinel-backed fields are simply
/// declared as `Option<T>`. Metadata blobs are declared in a trailing `blobs` block and map onto
/// a `{pointer, length}` pair of native fields.
///
/// ```ignore
/// native_options! {
///     /// Options of the `avifenc` command.
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct AvifencOptions => AVIFEncOptions {
///         /// 0-100
///         pub quality: i32 => quality,
///         /// `None` uses `quality`
///         pub quality_alpha: Option<i32> => quality_alpha,
///     }
///     blobs {
///         /// EXIF metadata
///         pub exif => (exif_data, exif_size),
///     }
/// }
/// ```
///
/// The macro implements [`NativeMapping`](crate::options::NativeMapping); the record still
/// needs a [`ConfigRecord`](crate::options::ConfigRecord) implementation for its fallback.
#[macro_export]
macro_rules! native_options {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $native:ty {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty => $raw:ident
            ),* $(,)?
        }
        $(
            blobs {
                $(
                    $(#[$blob_meta:meta])*
                    $blob_vis:vis $blob:ident => ($ptr:ident, $len:ident)
                ),* $(,)?
            }
        )?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
            $($(
                $(#[$blob_meta])*
                $blob_vis $blob: ::core::option::Option<::std::vec::Vec<u8>>,
            )*)?
        }

        impl $crate::options::NativeMapping for $name {
            type Native = $native;

            unsafe fn from_native(native: &$native) -> Self {
                Self {
                    $(
                        $field: <$field_ty as $crate::options::NativeField>::lift(native.$raw),
                    )*
                    $($(
                        // SAFETY: forwarded to the caller.
                        $blob: unsafe { $crate::options::lift_blob(native.$ptr, native.$len) },
                    )*)?
                }
            }

            fn write_native(&self, native: &mut $native) {
                $(
                    native.$raw = $crate::options::NativeField::lower(&self.$field);
                )*
                $($(
                    (native.$ptr, native.$len) = $crate::options::lower_blob(self.$blob.as_deref());
                )*)?
            }
        }
    };
}
