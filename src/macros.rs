//! Variadic front ends for the process-wide facility.
//!
//! Each macro converts its arguments with [`ToValue`](crate::ToValue),
//! borrowing rather than moving them, and forwards to the function of the
//! same name.

/// Print-style line on the debug channel, if present.
///
/// ```
/// leveled_log::debug!("cache size ", 42, " entries");
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:expr),* $(,)?) => {
        $crate::debug(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Printf-style line on the debug channel, if present.
#[macro_export]
macro_rules! debugf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::debugf($format, &[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Println-style line on the debug channel, if present.
#[macro_export]
macro_rules! debugln {
    ($($arg:expr),* $(,)?) => {
        $crate::debugln(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Print-style line on the info channel.
///
/// ```
/// let user = "ada";
/// leveled_log::info!("login ", user, " ok");
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:expr),* $(,)?) => {
        $crate::info(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Printf-style line on the info channel.
///
/// ```
/// leveled_log::infof!("served %d requests in %.1fs", 120, 2.5);
/// ```
#[macro_export]
macro_rules! infof {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::infof($format, &[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Println-style line on the info channel.
#[macro_export]
macro_rules! infoln {
    ($($arg:expr),* $(,)?) => {
        $crate::infoln(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Print-style line on the error channel.
#[macro_export]
macro_rules! error {
    ($($arg:expr),* $(,)?) => {
        $crate::error(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Printf-style line on the error channel.
#[macro_export]
macro_rules! errorf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::errorf($format, &[$($crate::ToValue::to_value(&$arg)),*])
    };
}

/// Println-style line on the error channel.
#[macro_export]
macro_rules! errorln {
    ($($arg:expr),* $(,)?) => {
        $crate::errorln(&[$($crate::ToValue::to_value(&$arg)),*])
    };
}
