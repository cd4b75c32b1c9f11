//! Logging macros that compile away without the `log` feature.
//!
//! Arguments are still type checked when the feature is disabled, so bindings that only exist
//! for logging do not trip `unused` lints.
#![allow(unused, reason = "logger")]

macro_rules! info {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::info!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        if false {
            let _ = ::std::format_args!($($tt)*);
        }
    }};
}

macro_rules! debug {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::debug!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        if false {
            let _ = ::std::format_args!($($tt)*);
        }
    }};
}

macro_rules! warning {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::warn!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        if false {
            let _ = ::std::format_args!($($tt)*);
        }
    }};
}

macro_rules! error {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::error!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        if false {
            let _ = ::std::format_args!($($tt)*);
        }
    }};
}

pub(crate) use {info, debug, warning, error};
