use docflow_core::DomainResult;
use docflow_documents::Document;

/// Keyed store mapping document number → document.
///
/// `save` upserts by number, last-write-wins; there is no optimistic
/// concurrency check beyond the document's own advisory lock. The state
/// machine relies on save/get atomicity for correctness, so implementations
/// must make each call an atomic unit.
pub trait DocumentRepository: Send + Sync {
    /// Upsert the canonical copy.
    fn save(&self, doc: &Document) -> DomainResult<()>;

    /// Fetch a snapshot by business number. `NotFound` if absent.
    fn get(&self, number: &str) -> DomainResult<Document>;

    fn exists(&self, number: &str) -> bool;

    /// Unordered case-insensitive substring match over title or number.
    fn search(&self, query: &str) -> Vec<Document>;
}
