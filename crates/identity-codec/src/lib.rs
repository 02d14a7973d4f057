pub mod bitstring;
pub mod canonical;
pub mod content_id;

pub use bitstring::Bitstring;
pub use canonical::canonical_bytes;
pub use content_id::{content_id_of, content_id_of_bytes};
