pub mod appstream;
pub mod emit;
pub mod error;
pub mod markdown;
pub mod options;
pub mod select;

pub use appstream::Release;
pub use emit::{apply_filters, emit, emit_to_string};
pub use error::EmitError;
pub use options::{AppstreamOptions, DEFAULT_DETAILS_URL, Format, Options};
