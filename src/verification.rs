use log::debug;

use crate::{error::Result, model::passport::Passport, store::RollStore};

/// The tri-state outcome of checking one passport against the roll.
///
/// "Found" is deliberately kept separate from the granted flag: collapsing an
/// absent entry and an ungranted entry into one state loses exactly the
/// information the caller needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// No roll entry exists for this passport.
    NotFound,
    /// On the roll, and a ballot has already been issued.
    AlreadyGranted,
    /// On the roll, with no ballot issued yet.
    NotYetGranted,
}

/// A completed check: the passport together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    passport: Passport,
    outcome: VerificationOutcome,
}

impl Verification {
    pub fn passport(&self) -> &Passport {
        &self.passport
    }

    pub fn outcome(&self) -> VerificationOutcome {
        self.outcome
    }

    /// Render the user-facing message for this check. Wording is derived
    /// directly from the stored flag's meaning (ballot already issued or not),
    /// parameterised by the canonical series rather than the digest.
    pub fn message(&self) -> String {
        match self.outcome {
            VerificationOutcome::NotFound => {
                format!(
                    "Passport «{}» is not on the remote-voting roll.",
                    self.passport
                )
            }
            VerificationOutcome::AlreadyGranted => {
                format!(
                    "Passport «{}» has already been granted ballot access.",
                    self.passport
                )
            }
            VerificationOutcome::NotYetGranted => {
                format!(
                    "Passport «{}» has been granted ballot access.",
                    self.passport
                )
            }
        }
    }
}

/// Checks passports against a roll store.
///
/// Stateless between calls: every check re-runs the full
/// normalise → validate → hash → lookup → classify pipeline.
pub struct Verifier<S> {
    store: S,
}

impl<S: RollStore> Verifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check a raw series against the roll.
    ///
    /// Validation failures (`EmptyInput`, `InvalidFormat`) propagate without
    /// touching the store and are rejections, not outcomes; `StoreUnavailable`
    /// is the only other error path.
    pub fn verify(&self, raw: &str) -> Result<Verification> {
        let passport = Passport::new(raw)?;
        let digest = passport.digest();
        let outcome = match self.store.find_by_digest(&digest)? {
            None => VerificationOutcome::NotFound,
            Some(entry) if entry.ballot_granted => VerificationOutcome::AlreadyGranted,
            Some(_) => VerificationOutcome::NotYetGranted,
        };
        debug!("Verified series {passport}: {outcome:?}");
        Ok(Verification { passport, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        error::Error,
        model::{passport::SeriesDigest, roll::RollEntry},
        store::MemoryRollStore,
    };

    fn verifier(entries: impl IntoIterator<Item = RollEntry>) -> Verifier<MemoryRollStore> {
        Verifier::new(MemoryRollStore::from_iter(entries))
    }

    #[test]
    fn absent_digest_is_not_found() {
        let verification = verifier([]).verify(" 1234 567890 ").unwrap();
        assert_eq!(verification.outcome(), VerificationOutcome::NotFound);
        assert_eq!(verification.passport().series(), "1234567890");
        assert_eq!(
            verification.message(),
            "Passport «1234567890» is not on the remote-voting roll."
        );
    }

    #[test]
    fn granted_entry_is_already_granted() {
        let verification = verifier([RollEntry::example_granted()])
            .verify("AB12345678")
            .unwrap();
        assert_eq!(verification.outcome(), VerificationOutcome::AlreadyGranted);
        assert_eq!(
            verification.message(),
            "Passport «AB12345678» has already been granted ballot access."
        );
    }

    #[test]
    fn ungranted_entry_is_not_yet_granted() {
        let verification = verifier([RollEntry::example_ungranted()])
            .verify("AB12345678")
            .unwrap();
        assert_eq!(verification.outcome(), VerificationOutcome::NotYetGranted);
        assert_eq!(
            verification.message(),
            "Passport «AB12345678» has been granted ballot access."
        );
    }

    #[test]
    fn blank_input_never_reaches_the_store() {
        // A store holding an entry under the empty digest would be the only
        // way to observe a store hit here; the empty input must fail first.
        for raw in ["", "   ", "\t \n"] {
            assert!(matches!(
                verifier([]).verify(raw),
                Err(Error::EmptyInput)
            ));
        }
    }

    #[test]
    fn wrong_length_input_is_rejected() {
        for raw in ["123", "1234567890123", "a b c"] {
            assert!(matches!(
                verifier([]).verify(raw),
                Err(Error::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn repeated_checks_agree() {
        let verifier = verifier([RollEntry::example_ungranted()]);
        let first = verifier.verify("AB12345678").unwrap();
        let second = verifier.verify("AB12345678").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn store_failure_is_not_an_outcome() {
        /// A store whose backing service is down.
        struct DownStore;

        impl crate::store::RollStore for DownStore {
            fn find_by_digest(&self, _: &SeriesDigest) -> crate::error::Result<Option<RollEntry>> {
                Err(Error::StoreUnavailable(
                    std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into(),
                ))
            }
        }

        let err = Verifier::new(DownStore).verify("AB12345678").unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert!(!err.is_rejection());
    }
}
