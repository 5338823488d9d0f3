//! Throwaway branch names for staging uncommitted work

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::fmt;

use crate::validation::{validate_temp_branch_name, TEMP_BRANCH_PREFIX, TEMP_BRANCH_SUFFIX_LEN};
use crate::Result;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A `temp-xxxxxxxx` branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TempBranchName(String);

impl TempBranchName {
    pub fn generate() -> Result<Self> {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a name from `rng`, checked against the `temp-xxxxxxxx` shape
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Result<Self> {
        let letters = Uniform::from(0..ALPHABET.len());
        let suffix: String = letters
            .sample_iter(rng)
            .take(TEMP_BRANCH_SUFFIX_LEN)
            .map(|i| ALPHABET[i] as char)
            .collect();
        Self::parse(&format!("{}{}", TEMP_BRANCH_PREFIX, suffix))
    }

    pub fn parse(name: &str) -> Result<Self> {
        validate_temp_branch_name(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TempBranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_names_are_valid() {
        for _ in 0..100 {
            let name = TempBranchName::generate().unwrap();
            assert!(validate_temp_branch_name(name.as_str()).is_ok(), "{}", name);
            assert_eq!(name.as_str().len(), 13);
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = TempBranchName::generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = TempBranchName::generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            TempBranchName::parse("temp-a1b2c3d4").unwrap().to_string(),
            "temp-a1b2c3d4"
        );
        assert!(TempBranchName::parse("main").is_err());
    }

    #[test]
    fn test_rejected_name_is_invalid_branch_name() {
        let err = TempBranchName::parse("temp-ABCD1234").unwrap_err();
        assert!(matches!(err, Error::InvalidBranchName { ref name, .. } if name == "temp-ABCD1234"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
