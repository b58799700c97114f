pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    PolicyViolation,
    Reflection,
    Execution,
    Connection,
    Runtime,
    FromValue,
    Protocol,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration: `{0}`")]
    Configuration(String),
    #[error("PolicyViolation: `{0}`")]
    PolicyViolation(String),
    #[error("Reflection: `{0}`")]
    Reflection(String),
    #[error("Execution: `{0}`")]
    Execution(String),
    #[error("Connection: `{0}`")]
    Connection(String),
    #[error("Runtime: `{0}`")]
    Runtime(String),
    #[error("FromValue: `{0}`")]
    FromValue(String),
    #[error("Protocol: `{0}`")]
    Protocol(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::PolicyViolation(_) => ErrorKind::PolicyViolation,
            Error::Reflection(_) => ErrorKind::Reflection,
            Error::Execution(_) => ErrorKind::Execution,
            Error::Connection(_) => ErrorKind::Connection,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::FromValue(_) => ErrorKind::FromValue,
            Error::Protocol(_) => ErrorKind::Protocol,
        }
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Configuration(m)
            | Error::PolicyViolation(m)
            | Error::Reflection(m)
            | Error::Execution(m)
            | Error::Connection(m)
            | Error::Runtime(m)
            | Error::FromValue(m)
            | Error::Protocol(m) => m,
        }
    }
}

#[macro_export]
macro_rules! configuration {
    ($($arg:tt)*) => { $crate::Error::Configuration(format!($($arg)*)) };
}

#[macro_export]
macro_rules! policy_violation {
    ($($arg:tt)*) => { $crate::Error::PolicyViolation(format!($($arg)*)) };
}

#[macro_export]
macro_rules! reflection {
    ($($arg:tt)*) => { $crate::Error::Reflection(format!($($arg)*)) };
}

#[macro_export]
macro_rules! execution {
    ($($arg:tt)*) => { $crate::Error::Execution(format!($($arg)*)) };
}

#[macro_export]
macro_rules! connection {
    ($($arg:tt)*) => { $crate::Error::Connection(format!($($arg)*)) };
}

#[macro_export]
macro_rules! runtime {
    ($($arg:tt)*) => { $crate::Error::Runtime(format!($($arg)*)) };
}

#[macro_export]
macro_rules! from_value {
    ($($arg:tt)*) => { $crate::Error::FromValue(format!($($arg)*)) };
}

#[macro_export]
macro_rules! protocol {
    ($($arg:tt)*) => { $crate::Error::Protocol(format!($($arg)*)) };
}
