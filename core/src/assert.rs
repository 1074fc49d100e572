//!
//! Pattern assertion for tests, mirroring the unstable `std::assert_matches`
//!

use std::fmt;

/// Asserts that an expression matches any of the given patterns, optionally
/// followed by an `if` guard. On failure the value is printed with its `Debug`
/// representation, along with an optional custom message.
///
/// ```ignore
/// use blockdag_core::assert_match;
///
/// let res: Result<u32, String> = Err("missing".to_string());
/// assert_match!(res, Err(msg) if msg.starts_with("miss"));
/// ```
#[macro_export]
macro_rules! assert_match {
    ($left:expr, $(|)? $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => {
        match $left {
            $( $pattern )|+ $( if $guard )? => {}
            ref left_val => {
                $crate::assert::assert_match_failed(left_val, stringify!($($pattern)|+ $(if $guard)?), None);
            }
        }
    };
    ($left:expr, $(|)? $( $pattern:pat_param )|+ $( if $guard: expr )?, $($arg:tt)+) => {
        match $left {
            $( $pattern )|+ $( if $guard )? => {}
            ref left_val => {
                $crate::assert::assert_match_failed(
                    left_val,
                    stringify!($($pattern)|+ $(if $guard)?),
                    Some(format_args!($($arg)+)),
                );
            }
        }
    };
}

#[cold]
#[track_caller]
#[doc(hidden)]
pub fn assert_match_failed<T: fmt::Debug + ?Sized>(left: &T, pattern: &str, args: Option<fmt::Arguments<'_>>) -> ! {
    match args {
        Some(args) => panic!("assertion failed: `{left:?}` does not match `{pattern}`: {args}"),
        None => panic!("assertion failed: `{left:?}` does not match `{pattern}`"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_match() {
        let a = 1u32.checked_add(2);
        assert_match!(a, Some(3));
        assert_match!(a, Some(x) if x > 2, "guard should hold for {:?}", a);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_assert_match_fails() {
        let b = 1u32.checked_sub(2);
        assert_match!(b, Some(_));
    }
}
