// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Room and user tokens.
use ahash::AHashSet;
use rand::{Rng, SeedableRng, rngs::StdRng};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Issues random tokens that are unique among the tokens in use.
#[derive(Debug)]
pub struct TokenIssuer {
    rng: StdRng,
    issued: AHashSet<String>,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenIssuer {
    /// The token length.
    pub const TOKEN_LEN: usize = 8;

    /// Creates an issuer seeded from the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates an issuer with a user provided generator.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: AHashSet::default(),
        }
    }

    /// Issues a new token.
    pub fn issue(&mut self) -> String {
        loop {
            let token = (0..Self::TOKEN_LEN)
                .map(|_| ALPHABET[self.rng.random_range(0..ALPHABET.len())] as char)
                .collect::<String>();
            if self.issued.insert(token.clone()) {
                return token;
            }
        }
    }

    /// Releases a token so that it can be issued again.
    pub fn release(&mut self, token: &str) -> bool {
        self.issued.remove(token)
    }

    #[cfg(test)]
    fn is_issued(&self, token: &str) -> bool {
        self.issued.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_tokens() {
        let mut issuer = TokenIssuer::with_rng(StdRng::seed_from_u64(3));
        let tokens = (0..1_000).map(|_| issuer.issue()).collect::<AHashSet<_>>();
        assert_eq!(tokens.len(), 1_000);

        for token in &tokens {
            assert_eq!(token.len(), TokenIssuer::TOKEN_LEN);
            assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
            assert!(issuer.is_issued(token));
        }
    }

    #[test]
    fn release_token() {
        let mut issuer = TokenIssuer::with_rng(StdRng::seed_from_u64(5));
        let token = issuer.issue();
        assert!(issuer.release(&token));
        assert!(!issuer.is_issued(&token));
        assert!(!issuer.release(&token));

        // Issuers are independent.
        let mut other = TokenIssuer::with_rng(StdRng::seed_from_u64(5));
        assert_eq!(other.issue(), token);
    }
}
