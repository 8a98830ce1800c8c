#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate tracing;

pub mod util;

pub mod format;
pub mod module;
pub mod unpack;

pub use format::{Gating, ModuleFormat};
pub use module::Module;

use std::error;
use std::fmt;
use std::io;


#[derive(Debug)]
pub enum Error {
    Format(String),
    Load(String),
    Truncated { offset: usize, size: usize, len: usize },
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Format(descr) => write!(f, "{}", descr),
            Error::Load(descr)   => write!(f, "{}", descr),
            Error::Truncated{offset, size, len} => {
                write!(f, "short read: {} bytes at offset {}, buffer has {}", size, offset, len)
            }
            Error::Io(err)       => write!(f, "{}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _              => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Io(err.into())
    }
}
