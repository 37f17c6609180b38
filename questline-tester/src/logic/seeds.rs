use anyhow::{Result, bail};
use sha2::{Digest, Sha256};

pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into simulation seeds.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals, and seed phrases such as `launch-week`, which hash to a stable
/// seed. Duplicates keep their first position; no tokens yields the default.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let seed = parse_seed(token)?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return match u64::from_str_radix(&hex.replace('_', ""), 16) {
            Ok(value) => Ok(value),
            Err(err) => bail!("Invalid hex seed {token}: {err}"),
        };
    }
    if is_phrase(token) {
        return Ok(phrase_seed(token));
    }
    bail!("Unrecognized seed token: {token}")
}

fn is_phrase(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Stable seed for a phrase: the first eight bytes of its lowercase SHA-256.
#[must_use]
pub fn phrase_seed(phrase: &str) -> u64 {
    let digest = Sha256::digest(phrase.to_ascii_lowercase().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
