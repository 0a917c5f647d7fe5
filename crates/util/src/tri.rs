//! Macros related to [`Option`] and [`Result`]

/// Macro for easy error logging.
///
/// Used on [`Result`], if it is [`Err`], log the pretty printed error value using
/// [`tracing::error`], and if context is provided, it is added after the error value.
/// The context can be string literal, or a format string with arguments.
///
/// This macro doesn't affect the input [`Result`], and it is returned as is.
///
/// This macro should only be use at top level code to avoid double logging
/// ```
/// # use util::ctx;
/// use anyhow::Result;
///
/// fn read_site() -> Result<String> {
///     // ...
///     # Ok("index.html".to_string())
/// }
///
/// fn write_render(html: &str) -> Result<()> {
///     // ...
///     # Ok(())
/// }
///
/// fn read_then_write() -> Result<()> {
///     let result = ctx!(read_site());
///     if let Ok(result) = result {
///         ctx!(write_render(&result), "Failed to write render of {:?}", result)?;
///     }
///     Ok(())
/// }
/// ```
///
/// [`Err`]: std::result::Result::Err
#[macro_export]
macro_rules! ctx {
    ($result:expr) => {
        $result.map_err(|why| {
            ::tracing::error!("{:#}", why);
            why
        })
    };
    ($result:expr, $ctx:literal) => {
        $result.map_err(|why| {
            ::tracing::error!("{}: {:#}", $ctx, why);
            why
        })
    };
    ($result:expr, $($ctx:tt)+) => {
        $result.map_err(|why| {
            let ctx = ::std::format!($($ctx)+);
            ::tracing::error!("{}: {:#}", ctx, why);
            why
        })
    };
}

/// Same as the [`ctx`] macro but logged at warn level
///
/// Page scripts recover from every failure, so this is the one they use.
///
/// [`ctx`] crate::ctx
#[macro_export]
macro_rules! ctxw {
    ($result:expr) => {
        $result.map_err(|why| {
            ::tracing::warn!("{:#}", why);
            why
        })
    };
    ($result:expr, $ctx:literal) => {
        $result.map_err(|why| {
            ::tracing::warn!("{}: {:#}", $ctx, why);
            why
        })
    };
    ($result:expr, $($ctx:tt)+) => {
        $result.map_err(|why| {
            let ctx = ::std::format!($($ctx)+);
            ::tracing::warn!("{}: {:#}", ctx, why);
            why
        })
    };
}

/// Unwraps [`Ok`] otherwise evaluates specified expression.
///
/// This macro behaves similar to [`Result::unwrap_or`].
///
/// If a context was given, it will log the error value along with the context via
/// [`tracing::warn`] if the value is [`Err`].
/// ```
/// # use util::ok;
/// fn page_number(raw: &str) -> Option<i64> {
///     let n: i64 = ok!(raw.parse(), "Invalid page number", return None);
///     Some(n)
/// }
/// assert_eq!(page_number("3"), Some(3));
/// assert_eq!(page_number("x"), None);
/// ```
///
/// [`Ok`]: std::result::Result::Ok
/// [`Err`]: std::result::Result::Err
#[macro_export]
macro_rules! ok {
    ($arg:expr, $fail:expr) => {
        match $arg {
            Ok(v) => v,
            Err(_) => $fail,
        }
    };
    ($arg:expr, $ctx:literal, $fail:expr) => {
        match $arg {
            Ok(v) => v,
            Err(why) => {
                ::tracing::warn!("{}: {:#}", $ctx, why);
                $fail
            }
        }
    };
}

/// Unwraps [`Some`] otherwise evaluates specified expression.
///
/// This macro behaves similar to [`Option::unwrap_or`].
///
/// If a context was given, it is logged via [`tracing::warn`] if the value is [`None`].
/// ```
/// # use util::some;
/// fn first_segment(path: &str) -> Option<&str> {
///     let segment = some!(path.split('/').find(|s| !s.is_empty()), "Path has no segments", return None);
///     Some(segment)
/// }
/// assert_eq!(first_segment("/owner/site/"), Some("owner"));
/// assert_eq!(first_segment("/"), None);
/// ```
#[macro_export]
macro_rules! some {
    ($arg:expr, $fail:expr) => {
        match $arg {
            Some(v) => v,
            None => $fail,
        }
    };
    ($arg:expr, $ctx:literal, $fail:expr) => {
        match $arg {
            Some(v) => v,
            None => {
                ::tracing::warn!($ctx);
                $fail
            }
        }
    };
}
