// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tamper-evidence tags for displayed totals.
//!
//! `records show` prints a tag binding the record's INR total to the app
//! secret; `pay status` verifies the echoed tag before trusting any claimed
//! total. Keyed HMAC-SHA256, truncated to a short opaque hex string.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Tag length in hex characters.
pub const TAG_LEN: usize = 10;

/// Fixed-precision form of an amount used for tagging, so "100000" and
/// "100000.00" produce the same tag.
pub fn canonical_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Computes the integrity tag for an amount under the given secret.
pub fn compute_integrity_tag(amount: Decimal, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(canonical_amount(amount).as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    digest[..TAG_LEN].to_string()
}

/// Constant-time verification of a client-echoed tag.
pub fn verify_integrity_tag(amount: Decimal, secret: &str, tag: &str) -> bool {
    constant_time_eq(&compute_integrity_tag(amount, secret), tag)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}
