// TestDependencies - mock implementations for testing
//
// Provides in-memory/mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{
    BaseEmailService, BaseEphemeralStore, BaseGoogleVerifier, BaseOtpGenerator, BaseSmsService,
    EmailMessage, GoogleProfile,
};

// =============================================================================
// Mock Ephemeral Store
// =============================================================================

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// In-memory TTL store with Redis semantics for the operations the OTP flow uses.
///
/// Expiry is checked lazily on read. Tests simulate TTL lapse with `force_expire`.
#[derive(Clone, Default)]
pub struct MockEphemeralStore {
    entries: Arc<Mutex<HashMap<String, StoredValue>>>,
    fail_writes: Arc<Mutex<bool>>,
    interleaved_incrs: Arc<Mutex<i64>>,
}

impl MockEphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (simulates an unreachable store)
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    /// Apply `count` extra increments on the next `incr`, as if other
    /// requests had incremented between a caller's read and its write
    pub fn interleave_incrs(&self, count: i64) {
        *self.interleaved_incrs.lock().unwrap() = count;
    }

    /// Drop a key as if its TTL had elapsed
    pub fn force_expire(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Raw value, ignoring nothing but expiry
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|v| v.is_live())
            .map(|v| v.value.clone())
    }

    /// Remaining TTL for a key, if it has one
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .and_then(|v| v.expires_at)
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Write a raw value without TTL (for corrupt-state tests)
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(anyhow!("mock store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseEphemeralStore for MockEphemeralStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.peek(key))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        self.check_writable()?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<()> {
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get(key)
            .filter(|v| v.is_live())
            .cloned()
            .unwrap_or(StoredValue {
                value: "0".to_string(),
                expires_at: None,
            });
        let next = entry
            .value
            .parse::<i64>()
            .map_err(|_| anyhow!("value is not an integer or out of range"))?
            + 1
            + std::mem::take(&mut *self.interleaved_incrs.lock().unwrap());
        entries.insert(
            key.to_string(),
            StoredValue {
                value: next.to_string(),
                expires_at: entry.expires_at,
            },
        );
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()> {
        self.check_writable()?;
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            entry.expires_at = Some(Instant::now() + Duration::from_secs(ttl_seconds));
        }
        Ok(())
    }
}

// =============================================================================
// Mock SMS Service
// =============================================================================

/// Captured outbound SMS
#[derive(Debug, Clone)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockSmsService {
    sent: Arc<Mutex<Vec<SentSms>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a service whose sends always fail
    pub fn failing() -> Self {
        let service = Self::default();
        *service.fail.lock().unwrap() = true;
        service
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_to(&self, phone_number: &str) -> Option<SentSms> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == phone_number)
            .cloned()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("mock SMS provider rejected the message"));
        }
        self.sent.lock().unwrap().push(SentSms {
            to: phone_number.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Email Service
// =============================================================================

#[derive(Clone, Default)]
pub struct MockEmailService {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let service = Self::default();
        *service.fail.lock().unwrap() = true;
        service
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_to(&self, email: &str) -> Option<EmailMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == email)
            .cloned()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("mock email provider rejected the message"));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// =============================================================================
// Fixed OTP Generator
// =============================================================================

/// Hands out queued codes in order, then repeats the default
pub struct FixedOtpGenerator {
    queue: Mutex<Vec<String>>,
    default_code: String,
}

impl FixedOtpGenerator {
    pub fn new(default_code: &str) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            default_code: default_code.to_string(),
        }
    }

    pub fn with_codes(self, codes: &[&str]) -> Self {
        self.queue
            .lock()
            .unwrap()
            .extend(codes.iter().map(|c| c.to_string()));
        self
    }
}

impl BaseOtpGenerator for FixedOtpGenerator {
    fn generate(&self) -> String {
        let mut queue = self.queue.lock().unwrap();
        if queue.is_empty() {
            self.default_code.clone()
        } else {
            queue.remove(0)
        }
    }
}

// =============================================================================
// Mock Google Verifier
// =============================================================================

#[derive(Clone, Default)]
pub struct MockGoogleVerifier {
    profiles: Arc<Mutex<HashMap<String, GoogleProfile>>>,
}

impl MockGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `id_token` and resolve it to the given profile
    pub fn with_token(self, id_token: &str, email: &str, name: &str) -> Self {
        self.profiles.lock().unwrap().insert(
            id_token.to_string(),
            GoogleProfile {
                email: email.to_string(),
                name: name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl BaseGoogleVerifier for MockGoogleVerifier {
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleProfile> {
        self.profiles
            .lock()
            .unwrap()
            .get(id_token)
            .cloned()
            .ok_or_else(|| anyhow!("Invalid Google token"))
    }
}
