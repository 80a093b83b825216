/// An object written to the bucket store, as returned to the callers that persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: u64,
}
