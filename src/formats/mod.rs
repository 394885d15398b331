//! Binary image formats read from the loader's mapped headers.

pub mod macho;
