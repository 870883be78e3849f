mod args;

pub use args::{Args, ColorMode, FileTypeArg};
