use crate::source::LoadResult;

/// In-memory cache for the last load result, owned by the caller and passed
/// into the pipeline rather than living in process-wide state. Holds at most
/// one result for the lifetime of a session; `invalidate` is the only way to
/// force the next load back onto the network.
#[derive(Default)]
pub struct CollectionCache {
    slot: Option<LoadResult>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&LoadResult> {
        self.slot.as_ref()
    }

    pub fn fill(&mut self, result: LoadResult) {
        self.slot = Some(result);
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn is_warm(&self) -> bool {
        self.slot.is_some()
    }
}
