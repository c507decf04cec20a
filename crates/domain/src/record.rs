use serde::{Serialize, de::DeserializeOwned};

/// A domain object that can be listed, edited and submitted through a list store.
///
/// `Default` is the empty form template for the type.
pub trait Record: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path on the API, e.g. `/products`.
    const RESOURCE: &'static str;

    /// Server identifier (`_id`). Empty for a draft that has not been created yet.
    fn id(&self) -> &str;

    /// One-line label used by list views and confirmation prompts.
    fn label(&self) -> String;

    fn is_new(&self) -> bool {
        self.id().is_empty()
    }

    /// Path of this record on the API.
    fn path(&self) -> String {
        format!("{}/{}", Self::RESOURCE, self.id())
    }
}
