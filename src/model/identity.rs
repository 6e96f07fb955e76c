//! Anonymous display identity model.
//!
//! # Responsibility
//! - Define the public persona (name, emoji, color) bound to an account.
//! - Synthesize new personas from the fixed anonymous palettes.
//!
//! # Invariants
//! - An identity is created at most once per account and never mutated.
//! - The placeholder identity is render-only and never persisted.

use crate::model::post::AccountId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Animal names used for synthesized anonymous display names.
pub const ANON_ANIMALS: [&str; 5] = ["Tiger", "Sloth", "Ferret", "Koala", "Capybara"];

/// Profile emoji palette for synthesized identities.
pub const PROFILE_EMOJIS: [&str; 5] = ["🐸", "🦊", "🐼", "🦁", "🐧"];

/// Username color palette for synthesized identities.
pub const USERNAME_COLORS: [&str; 5] = ["#F87171", "#60A5FA", "#FBBF24", "#34D399", "#A78BFA"];

/// Durable public persona bound to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque id of the owning account.
    pub account_id: AccountId,
    /// Public name, `Anonymous <Animal> #<3-digit-number>` when synthesized.
    pub display_name: String,
    /// Profile emoji shown next to the name.
    pub emoji: String,
    /// CSS color the name is rendered in.
    pub color: String,
}

impl Identity {
    /// Synthesizes a fresh anonymous persona for `account_id`.
    ///
    /// Each palette pick is uniform; the number suffix is 100..=999. The
    /// caller owns persisting the result (first writer wins).
    pub fn synthesize(account_id: impl Into<AccountId>, rng: &mut impl Rng) -> Self {
        let animal = ANON_ANIMALS[rng.gen_range(0..ANON_ANIMALS.len())];
        let number: u32 = rng.gen_range(100..1000);
        Self {
            account_id: account_id.into(),
            display_name: format!("Anonymous {animal} #{number}"),
            emoji: PROFILE_EMOJIS[rng.gen_range(0..PROFILE_EMOJIS.len())].to_string(),
            color: USERNAME_COLORS[rng.gen_range(0..USERNAME_COLORS.len())].to_string(),
        }
    }

    /// Ephemeral render-only identity used when the store is unreachable.
    ///
    /// Must never be written back; the next successful lookup provisions (or
    /// finds) the durable persona instead.
    pub fn placeholder(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            display_name: "Anonymous".to_string(),
            emoji: "👻".to_string(),
            color: "#fff".to_string(),
        }
    }
}
