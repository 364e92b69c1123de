//! Random hardware addresses seeded from a known vendor prefix.

use macshift_common::error::GenerationError;
use macshift_common::vendors::VENDOR_PREFIXES;
use pnet::util::MacAddr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

pub struct AddressGenerator<R: Rng> {
    rng: R,
    max_attempts: usize,
}

impl AddressGenerator<StdRng> {
    /// Generator backed by an OS-seeded RNG.
    pub fn new(max_attempts: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), max_attempts)
    }
}

impl<R: Rng> AddressGenerator<R> {
    pub fn with_rng(rng: R, max_attempts: usize) -> Self {
        Self {
            rng,
            max_attempts: max_attempts.max(1),
        }
    }

    /// A known vendor prefix followed by three random octets.
    pub fn random_mac(&mut self) -> MacAddr {
        let idx = self.rng.random_range(0..VENDOR_PREFIXES.len());
        let (prefix, _) = VENDOR_PREFIXES[idx];
        MacAddr::new(
            prefix[0],
            prefix[1],
            prefix[2],
            self.rng.random(),
            self.rng.random(),
            self.rng.random(),
        )
    }

    /// A random address that differs from `current`.
    ///
    /// Gives up after the configured number of attempts. With no current address any
    /// candidate is accepted.
    pub fn distinct_from(&mut self, current: Option<MacAddr>) -> Result<MacAddr, GenerationError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.random_mac();
            if Some(candidate) != current {
                return Ok(candidate);
            }
            trace!("Attempt {attempt} collided with the current address");
        }

        Err(GenerationError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }
}
