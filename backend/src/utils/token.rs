//! Session token generation behind an injectable provider.

use rand::{rngs::OsRng, RngCore};

use crate::types::SessionId;

/// Bytes of CSPRNG output per session token (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Source of new, globally unique and unguessable session identifiers.
pub trait SessionTokenGenerator: Send + Sync {
    fn generate(&self) -> SessionId;
}

/// Draws tokens from the operating system CSPRNG and hex-encodes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngTokenGenerator;

impl SessionTokenGenerator for OsRngTokenGenerator {
    fn generate(&self) -> SessionId {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        SessionId::new(hex::encode(bytes))
    }
}
