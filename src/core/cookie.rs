//! Cookie sources for packet correlation identifiers.
//!
//! The assembler draws one cookie per packet from an injected source. Cookies
//! only need to be distinguishable between requests, not globally unique.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Produces a fresh cookie for each packet
pub trait CookieSource: Send + Sync {
    fn next_cookie(&self) -> u32;
}

/// Thread-local RNG, usable concurrently from any thread without locking
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngCookies;

impl CookieSource for ThreadRngCookies {
    #[inline]
    fn next_cookie(&self) -> u32 {
        rand::rng().random()
    }
}

/// Reproducible cookie sequence from a fixed seed
#[derive(Debug)]
pub struct SeededCookies {
    rng: Mutex<StdRng>,
}

impl SeededCookies {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CookieSource for SeededCookies {
    fn next_cookie(&self) -> u32 {
        // A poisoned lock still holds a usable RNG state
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random()
    }
}

/// Always hands out the same cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCookie(pub u32);

impl CookieSource for FixedCookie {
    #[inline]
    fn next_cookie(&self) -> u32 {
        self.0
    }
}

impl<C: CookieSource + ?Sized> CookieSource for &C {
    fn next_cookie(&self) -> u32 {
        (**self).next_cookie()
    }
}

impl<C: CookieSource + ?Sized> CookieSource for std::sync::Arc<C> {
    fn next_cookie(&self) -> u32 {
        (**self).next_cookie()
    }
}
