//! OTP staging sessions.
//!
//! Creation flows stage a draft entity next to a one-time code in the
//! ephemeral store. Only after the code is confirmed does the draft become a
//! durable record; abandoned sessions expire on their own.

pub mod delivery;
pub mod draft;
pub mod errors;
pub mod generator;
pub mod session;

pub use delivery::{deliver_otp, DeliveryChannel};
pub use draft::StagedDraft;
pub use errors::{StagingError, StagingResult};
pub use generator::{RandomOtpGenerator, OTP_LENGTH};
pub use session::{SessionKeys, StagingSessionManager, MAX_ATTEMPTS, SESSION_TTL_SECONDS};
