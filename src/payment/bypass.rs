//! Test-mode payment bypass
//!
//! Free tokens are an injected capability: development builds wire in
//! [`DebugTokens`], production builds wire in [`NoBypass`] and no token
//! string is ever special-cased.

use crate::config::PaymentConfig;
use std::sync::Arc;

pub const DEBUG_TOKEN_PREFIX: &str = "cashu_debug_";
pub const DEBUG_TOKEN: &str = "debug";

/// Decides whether a token skips validation and redemption entirely
pub trait TokenBypass: Send + Sync {
    fn admits(&self, token: &str) -> bool;
}

/// Accepts `debug` and any `cashu_debug_*` token
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugTokens;

impl TokenBypass for DebugTokens {
    fn admits(&self, token: &str) -> bool {
        token == DEBUG_TOKEN || token.starts_with(DEBUG_TOKEN_PREFIX)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoBypass;

impl TokenBypass for NoBypass {
    fn admits(&self, _token: &str) -> bool {
        false
    }
}

pub fn bypass_for(config: &PaymentConfig) -> Arc<dyn TokenBypass> {
    if config.allow_debug_tokens {
        Arc::new(DebugTokens)
    } else {
        Arc::new(NoBypass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_tokens() {
        assert!(DebugTokens.admits("debug"));
        assert!(DebugTokens.admits("cashu_debug_123"));
        assert!(DebugTokens.admits("cashu_debug_"));
        assert!(!DebugTokens.admits("Debug"));
        assert!(!DebugTokens.admits("debug2"));
        assert!(!DebugTokens.admits("cashuAbc123"));
    }

    #[test]
    fn test_no_bypass() {
        assert!(!NoBypass.admits("debug"));
        assert!(!NoBypass.admits("cashu_debug_123"));
    }

    #[test]
    fn test_bypass_for_config() {
        let enabled = bypass_for(&PaymentConfig { dev_mode: false, allow_debug_tokens: true });
        assert!(enabled.admits("debug"));

        let disabled = bypass_for(&PaymentConfig { dev_mode: true, allow_debug_tokens: false });
        assert!(!disabled.admits("debug"));
    }
}
