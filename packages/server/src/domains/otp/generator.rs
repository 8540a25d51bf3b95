use rand::Rng;

use crate::kernel::BaseOtpGenerator;

/// Number of digits in an issued OTP
pub const OTP_LENGTH: usize = 6;

/// Uniformly random numeric codes from the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOtpGenerator;

impl BaseOtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}
