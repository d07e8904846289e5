// Macros for routing diagnostic output through the optional 'log' crate.
// Each one expands to nothing unless the 'logging' feature is enabled, so
// call sites never carry the feature gate themselves.
macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    };
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) };
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) };
}
