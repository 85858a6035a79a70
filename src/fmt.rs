//! Logging shims. Forward to `defmt` when the `defmt` feature is enabled, otherwise expand to nothing.
#![macro_use]
#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
    };
}
