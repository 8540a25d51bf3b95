//! Staging session manager.
//!
//! A session is three co-keyed store entries for one contact identifier:
//!
//! ```text
//! otp:{identifier}            → current code
//! otp_attempts:{identifier}   → failed verifications since the code was issued
//! {namespace}:{identifier}    → serialized draft
//! ```
//!
//! State per identifier:
//!
//! ```text
//! NONE    --begin-->            PENDING(0)
//! PENDING --verify(wrong)-->    PENDING(n+1), LOCKED once n+1 == MAX_ATTEMPTS
//! LOCKED  --verify(any)-->      LOCKED (TooManyAttempts)
//! PENDING --verify(correct)-->  VERIFIED (code + attempts cleared, draft kept)
//! VERIFIED --discard-->         NONE
//! any     --TTL-->              NONE
//! any     --begin-->            PENDING(0)
//! ```
//!
//! Writes inside `begin` are sequential, not transactional. A concurrent
//! `verify` for the same identifier may observe a code without an attempts
//! counter; that is read as zero attempts.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{StagedDraft, StagingError, StagingResult};
use crate::common::utils::identifier_digest;
use crate::kernel::BaseEphemeralStore;

/// Lifetime of every session entry
pub const SESSION_TTL_SECONDS: u64 = 300;

/// Failed verifications allowed before the session locks
pub const MAX_ATTEMPTS: i64 = 3;

const CODE_PREFIX: &str = "otp";
const ATTEMPTS_PREFIX: &str = "otp_attempts";

/// Store keys for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub code: String,
    pub attempts: String,
    pub draft: String,
}

impl SessionKeys {
    pub fn new(namespace: &str, identifier: &str) -> Self {
        Self {
            code: format!("{}:{}", CODE_PREFIX, identifier),
            attempts: format!("{}:{}", ATTEMPTS_PREFIX, identifier),
            draft: format!("{}:{}", namespace, identifier),
        }
    }

    fn all(&self) -> Vec<String> {
        vec![self.code.clone(), self.attempts.clone(), self.draft.clone()]
    }
}

/// Coordinates OTP issuance, attempt-limited verification, and draft hand-off
/// for one draft type.
pub struct StagingSessionManager<D> {
    store: Arc<dyn BaseEphemeralStore>,
    _draft: PhantomData<fn() -> D>,
}

impl<D> Clone for StagingSessionManager<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _draft: PhantomData,
        }
    }
}

impl<D: StagedDraft> StagingSessionManager<D> {
    pub fn new(store: Arc<dyn BaseEphemeralStore>) -> Self {
        Self {
            store,
            _draft: PhantomData,
        }
    }

    pub fn keys(identifier: &str) -> SessionKeys {
        SessionKeys::new(D::NAMESPACE, identifier)
    }

    /// Start (or restart) a session: clear prior state, then stage the code,
    /// a zeroed attempt counter, and the draft under one TTL.
    pub async fn begin(&self, identifier: &str, code: &str, draft: &D) -> StagingResult<()> {
        let keys = Self::keys(identifier);
        let payload = serde_json::to_string(draft)
            .map_err(|e| StagingError::Store(anyhow::Error::new(e).context("serialize draft")))?;

        self.store.del(&keys.all()).await?;
        self.store
            .set_ex(&keys.code, code.trim(), SESSION_TTL_SECONDS)
            .await?;
        self.store
            .set_ex(&keys.attempts, "0", SESSION_TTL_SECONDS)
            .await?;
        self.store
            .set_ex(&keys.draft, &payload, SESSION_TTL_SECONDS)
            .await?;

        info!(
            namespace = D::NAMESPACE,
            identifier = %identifier_digest(identifier),
            "Staging session started"
        );
        Ok(())
    }

    /// Check `submitted` against the stored code.
    ///
    /// On success the code and counter are consumed; the draft stays until
    /// `discard` so a failed durable write can be retried.
    pub async fn verify(&self, identifier: &str, submitted: &str) -> StagingResult<()> {
        let keys = Self::keys(identifier);
        let digest = identifier_digest(identifier);

        let (stored_code, attempts) = tokio::try_join!(
            self.store.get(&keys.code),
            self.store.get(&keys.attempts)
        )?;

        let stored_code = match stored_code {
            Some(code) => code,
            None => {
                debug!(identifier = %digest, "No active OTP");
                return Err(StagingError::ExpiredOrMissingSession);
            }
        };

        let attempts = parse_attempts(attempts.as_deref())?;
        if attempts >= MAX_ATTEMPTS {
            warn!(identifier = %digest, attempts, "OTP locked");
            return Err(StagingError::TooManyAttempts);
        }

        if submitted.trim() != stored_code.trim() {
            let attempt = self.store.incr(&keys.attempts).await?;
            self.store
                .expire(&keys.attempts, SESSION_TTL_SECONDS)
                .await?;
            // Concurrent guesses can all pass the read above; the counter
            // returned by incr is authoritative.
            if attempt > MAX_ATTEMPTS {
                warn!(identifier = %digest, attempt, "OTP locked");
                return Err(StagingError::TooManyAttempts);
            }
            info!(identifier = %digest, attempt, "Incorrect OTP");
            return Err(StagingError::IncorrectCode { attempt });
        }

        self.store
            .del(&[keys.code.clone(), keys.attempts.clone()])
            .await?;
        info!(identifier = %digest, "OTP verified");
        Ok(())
    }

    /// Read back the staged draft. Must be called after `verify` succeeds;
    /// the draft's TTL runs independently of the code's.
    pub async fn retrieve_draft(&self, identifier: &str) -> StagingResult<D> {
        let keys = Self::keys(identifier);
        let raw = self
            .store
            .get(&keys.draft)
            .await?
            .ok_or(StagingError::ExpiredOrMissingSession)?;

        let draft: D = serde_json::from_str(&raw).map_err(|e| {
            StagingError::CorruptedSession(format!("{} does not deserialize: {}", D::NAMESPACE, e))
        })?;
        draft.validate().map_err(|reason| {
            StagingError::CorruptedSession(format!("{} failed validation: {}", D::NAMESPACE, reason))
        })?;
        if draft.identifier() != identifier {
            warn!(
                namespace = D::NAMESPACE,
                identifier = %identifier_digest(identifier),
                "Staged draft belongs to a different identifier"
            );
            return Err(StagingError::CorruptedSession(format!(
                "{} identifier does not match its key",
                D::NAMESPACE
            )));
        }

        Ok(draft)
    }

    /// Remove every entry for the identifier. Call only after the durable
    /// record exists.
    pub async fn discard(&self, identifier: &str) -> StagingResult<()> {
        let keys = Self::keys(identifier);
        self.store.del(&keys.all()).await?;
        debug!(
            namespace = D::NAMESPACE,
            identifier = %identifier_digest(identifier),
            "Staging session discarded"
        );
        Ok(())
    }
}

fn parse_attempts(raw: Option<&str>) -> StagingResult<i64> {
    match raw {
        None => Ok(0),
        Some(value) => value.trim().parse::<i64>().map_err(|_| {
            StagingError::CorruptedSession(format!("attempt counter is not a number: {:?}", value))
        }),
    }
}
