use super::SALT_LEN;
use anyhow::{Result, anyhow, ensure};
use getrandom::fill;
use zeroize::Zeroizing;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| anyhow!("OS random generator unavailable"))
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Raw random bytes from the OS generator
pub fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>> {
    ensure!(len > 0, "random byte count must be >= 1");

    let mut buf = Zeroizing::new(vec![0u8; len]);
    secure_random(&mut buf)?;
    Ok(buf)
}
