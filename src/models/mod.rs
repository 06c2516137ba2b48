pub mod document;

pub use document::{read_documents, CatalogDocument, DocumentId, GeoPoint};
