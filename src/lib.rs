//! Parse and load Java-style `.properties` files.
//!
//! [`load`] reads any [`std::io::Read`] source into a [`Properties`] map.
//! Comment and blank lines are skipped, backslash continuations are joined
//! and escape sequences (including `\uXXXX`) are decoded. A load either
//! returns the complete map or an [`Error`]; it never hands back a partial
//! result.
//!
//! Unlike Java, a `\uXXXX` escape naming an unpaired UTF-16 surrogate is
//! rejected with [`ParseErrorKind::UnpairedSurrogate`].
//!
//! ```
//! let props = propertor::load_str("greeting = Hello, \\\n    world\n").unwrap();
//! assert_eq!(props.get("greeting"), Some("Hello, world"));
//! ```

mod error;
mod loader;
mod model;
mod properties;
mod reader;
mod record;
mod unescape;

pub use error::{Error, ParseError, ParseErrorKind, ValueError, ValueErrorKind};
pub use loader::{PropertiesLoader, from_path, from_paths, load, load_str, load_with_encoding};
pub use model::{Encoding, LoadReport};
pub use properties::{Iter, Properties};
