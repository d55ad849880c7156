//! Logging module.
//!
//! Inside a Tarantool process (the `tarantool` feature) messages go to the
//! instance log through `say`, otherwise they are emitted as `tracing` events.

#[macro_export]
#[allow(unused_variables)]
macro_rules! log {
    ($level:ident, $error:expr, $($message:tt)*) => {{
        let _line: i32 = line!().try_into().unwrap_or(0);
        $crate::log::say(
            $crate::log::SayLevel::$level,
            file!(),
            _line,
            $error,
            $($message)*
        );
    }};
}

#[macro_export]
macro_rules! fatal {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Fatal, $error, $($message)*);
    };
}

#[macro_export]
macro_rules! system {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(System, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! error {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Error, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! crit {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Crit, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Warn, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! info {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Info, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! verbose {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Verbose, $error, $($message)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($error:expr, $($message:tt)*) => {
        $crate::log!(Debug, $error, $($message)*)
    };
}

/// Severity levels of the Tarantool log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SayLevel {
    Fatal,
    System,
    Error,
    Crit,
    Warn,
    Info,
    Verbose,
    Debug,
}

#[cfg(feature = "tarantool")]
impl From<SayLevel> for tarantool::log::SayLevel {
    fn from(level: SayLevel) -> Self {
        match level {
            SayLevel::Fatal => tarantool::log::SayLevel::Fatal,
            SayLevel::System => tarantool::log::SayLevel::System,
            SayLevel::Error => tarantool::log::SayLevel::Error,
            SayLevel::Crit => tarantool::log::SayLevel::Crit,
            SayLevel::Warn => tarantool::log::SayLevel::Warn,
            SayLevel::Info => tarantool::log::SayLevel::Info,
            SayLevel::Verbose => tarantool::log::SayLevel::Verbose,
            SayLevel::Debug => tarantool::log::SayLevel::Debug,
        }
    }
}

#[cfg(feature = "tarantool")]
pub fn say(level: SayLevel, file: &str, line: i32, error: Option<&str>, message: &str) {
    tarantool::log::say(level.into(), file, line, error, message);
}

#[cfg(not(feature = "tarantool"))]
pub fn say(level: SayLevel, file: &str, line: i32, error: Option<&str>, message: &str) {
    let context = error.unwrap_or_default();
    match level {
        SayLevel::Fatal | SayLevel::System | SayLevel::Error | SayLevel::Crit => {
            tracing::error!(file, line, context, "{message}");
        }
        SayLevel::Warn => tracing::warn!(file, line, context, "{message}"),
        SayLevel::Info => tracing::info!(file, line, context, "{message}"),
        SayLevel::Verbose => tracing::debug!(file, line, context, "{message}"),
        SayLevel::Debug => tracing::trace!(file, line, context, "{message}"),
    }
}
