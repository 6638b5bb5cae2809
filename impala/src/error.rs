//! Helpers shared by the error types of this crate.

/// Define `From` conversions from source errors into a `Snafu` error enum.
///
/// Each `source => Selector` pair generates a `From<source>` impl that wraps
/// the source error using the given context selector, so that `?` can be used
/// directly on results of the source type.
///
/// You need to `use snafu::IntoError` in order to be able to use this macro.
///
/// ```ignore
/// impl_auto_error_conversion!(SerializeError {
///     StreamError => StreamSnafu,
///     FromHexError => HexDecodeSnafu,
/// });
/// ```
#[macro_export]
macro_rules! impl_auto_error_conversion {
    ($target:ty { $( $src:ty => $snafu:ident ),+ $(,)? }) => {
        $(
            impl From<$src> for $target {
                fn from(value: $src) -> $target {
                    $snafu.into_error(value)
                }
            }
        )+
    };
}
