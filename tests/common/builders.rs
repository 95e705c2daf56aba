use governance_core::models::{EntityLink, GlossaryTerm, GlossaryTermStatus};
use governance_core::storage::InMemoryEntityStore;
use governance_core::workflow::WorkflowContext;
use std::sync::Arc;

/// Glossary term in the `Business` glossary, last updated by `owner`
pub fn term(name: &str, status: GlossaryTermStatus) -> GlossaryTerm {
    GlossaryTerm::new("Business", name, "owner")
        .with_status(status)
        .with_description(format!("Definition of {name}"))
        .with_reviewer("reviewer")
}

/// Store seeded with the given terms
pub fn store_with(terms: &[&GlossaryTerm]) -> Arc<InMemoryEntityStore> {
    let store = Arc::new(InMemoryEntityStore::new());
    for term in terms {
        store.insert(*term).expect("seed term");
    }
    store
}

/// Context whose related entity is `term`
pub fn context_for(term: &GlossaryTerm) -> WorkflowContext {
    WorkflowContext::for_entity(EntityLink::for_entity(term).to_string())
}
