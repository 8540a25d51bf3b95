use serde::{de::DeserializeOwned, Serialize};

/// A not-yet-durable entity held in the staging store until its OTP is confirmed.
///
/// Each draft type owns its key namespace, so one manager implementation serves
/// every creation flow.
pub trait StagedDraft: Serialize + DeserializeOwned + Send + Sync {
    /// Key prefix for the serialized draft, e.g. `user_draft`
    const NAMESPACE: &'static str;

    /// Re-check invariants on data read back from the store.
    ///
    /// Anything that fails here is reported as a corrupted session instead of
    /// flowing into record creation.
    fn validate(&self) -> Result<(), String>;

    /// The contact the OTP was sent to. Must equal the key the draft is
    /// stored under.
    fn identifier(&self) -> &str;
}
