use std::io;

use rand::CryptoRng;
use rand::RngCore;

/// Random source whose every fallible draw fails, standing in for an
/// exhausted or unavailable OS entropy pool.
pub(crate) struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        unreachable!("infallible draws must not be used")
    }

    fn next_u64(&mut self) -> u64 {
        unreachable!("infallible draws must not be used")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unreachable!("infallible draws must not be used")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(io::Error::new(
            io::ErrorKind::Other,
            "entropy source unavailable",
        )))
    }
}

impl CryptoRng for FailingRng {}
