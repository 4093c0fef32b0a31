//! Run-scoped authority context: author dates and original-work identifiers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::known::{KnownTranslations, WorkKey};
use super::table::AuthorityTable;
use crate::error::ConvertError;
use crate::parse;

/// Institutional prefix of minted original-work identifiers.
pub const IDENTIFIER_PREFIX: &str = "ubc";

/// Default number of attempts to find an unused identifier.
pub const DEFAULT_RETRY_LIMIT: usize = 10_000;

/// Resolves author dates and original-work identifiers for one run.
///
/// Owns the mutable part of a run: the index of known works, the set of
/// identifiers in use, and the random source used for minting. Identifiers
/// minted here are added to the index, so the same work resolves to the same
/// identifier for the rest of the run.
///
/// # Examples
///
/// ```
/// use bibmarc::authority::{AuthorityResolver, AuthorityTable, KnownTranslations};
///
/// let table = AuthorityTable::from_pairs([("jk01021023", "1890-1938")]);
/// let mut resolver = AuthorityResolver::new(table, KnownTranslations::default()).with_seed(7);
///
/// assert_eq!(resolver.resolve_author_dates(Some("jk01021023")), Some("1890-1938"));
///
/// let first = resolver
///     .resolve_or_mint_original_work_id(Some("Čapek, Karel"), Some("R.U.R."), Some("jk01021023"))?
///     .unwrap();
/// assert!(first.starts_with("ubcjk0123"));
/// let again = resolver
///     .resolve_or_mint_original_work_id(Some("čapek, karel"), Some("R.U.R"), Some("jk01021023"))?;
/// assert_eq!(again.as_deref(), Some(first.as_str()));
/// # Ok::<(), bibmarc::ConvertError>(())
/// ```
#[derive(Debug)]
pub struct AuthorityResolver {
    table: AuthorityTable,
    known: KnownTranslations,
    rng: StdRng,
    retry_limit: usize,
}

impl AuthorityResolver {
    /// Create a resolver with an entropy-seeded random source.
    #[must_use]
    pub fn new(table: AuthorityTable, known: KnownTranslations) -> Self {
        AuthorityResolver {
            table,
            known,
            rng: StdRng::from_entropy(),
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    /// Use a fixed seed, making minted identifiers reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set how many candidates are tried before minting fails.
    #[must_use]
    pub fn with_retry_limit(mut self, retry_limit: usize) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Index of known works, including works resolved so far.
    #[must_use]
    pub fn known(&self) -> &KnownTranslations {
        &self.known
    }

    /// Biographical dates for an author code.
    #[must_use]
    pub fn resolve_author_dates(&self, code: Option<&str>) -> Option<&str> {
        self.table.dates(code?)
    }

    /// Identifier of the original work, reused from the index or minted.
    ///
    /// Returns `None` when the author or title is absent, or when the title
    /// says the original is unknown or does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::IdentifierSpaceExhausted`] if no unused
    /// identifier is found within the retry limit.
    pub fn resolve_or_mint_original_work_id(
        &mut self,
        author: Option<&str>,
        title: Option<&str>,
        code: Option<&str>,
    ) -> Result<Option<String>, ConvertError> {
        let (Some(author), Some(title)) = (author, title) else {
            return Ok(None);
        };
        if parse::is_original_unknown(title) {
            debug!(title, "original work unknown, no identifier");
            return Ok(None);
        }

        let key = WorkKey::new(author, title);
        if let Some(identifier) = self.known.lookup(&key) {
            debug!(identifier, "original work identifier reused");
            return Ok(Some(identifier.to_string()));
        }
        let identifier = self.mint(code)?;
        debug!(identifier = %identifier, "original work identifier minted");
        self.known.insert(key, identifier.clone());
        Ok(Some(identifier))
    }

    /// Mint an identifier not yet in use and claim it.
    ///
    /// With an author code the identifier is the prefix, the first four and
    /// last two characters of the code, and a random four-digit number.
    /// Without one it is the prefix and a random eleven-digit number.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::IdentifierSpaceExhausted`] if every candidate
    /// tried within the retry limit is taken.
    pub fn mint(&mut self, code: Option<&str>) -> Result<String, ConvertError> {
        let base = match code.map(str::trim).filter(|code| !code.is_empty()) {
            Some(code) => {
                let head: String = code.chars().take(4).collect();
                let tail: String = {
                    let mut tail: Vec<char> = code.chars().rev().take(2).collect();
                    tail.reverse();
                    tail.into_iter().collect()
                };
                format!("{IDENTIFIER_PREFIX}{head}{tail}")
            },
            None => IDENTIFIER_PREFIX.to_string(),
        };
        let with_code = base.len() > IDENTIFIER_PREFIX.len();

        for _ in 0..self.retry_limit {
            let candidate = if with_code {
                format!("{base}{}", self.rng.gen_range(1000..=9999))
            } else {
                format!("{base}{:011}", self.rng.gen_range(0..=99_999_999_999u64))
            };
            if self.known.reserve(&candidate) {
                return Ok(candidate);
            }
        }
        Err(ConvertError::IdentifierSpaceExhausted {
            base,
            attempts: self.retry_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::{Field, Record};

    fn resolver() -> AuthorityResolver {
        let table = AuthorityTable::from_pairs([("jk01021023", "1890-1938")]);
        AuthorityResolver::new(table, KnownTranslations::default()).with_seed(42)
    }

    #[test]
    fn test_author_dates() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_author_dates(Some("jk01021023")), Some("1890-1938"));
        assert_eq!(resolver.resolve_author_dates(Some("jk99999999")), None);
        assert_eq!(resolver.resolve_author_dates(None), None);
    }

    #[test]
    fn test_mint_shape_with_code() {
        let id = resolver().mint(Some("jk01021023")).unwrap();
        assert!(id.starts_with("ubcjk0123"), "{id}");
        assert_eq!(id.len(), "ubcjk0123".len() + 4);
        let suffix: u32 = id["ubcjk0123".len()..].parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
    }

    #[test]
    fn test_mint_shape_without_code() {
        let id = resolver().mint(None).unwrap();
        assert_eq!(id.len(), 3 + 11);
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_seeded_minting_is_reproducible() {
        assert_eq!(resolver().mint(Some("jk01")).unwrap(), resolver().mint(Some("jk01")).unwrap());
    }

    #[test]
    fn test_catalog_identifier_reused() {
        let mut known = KnownTranslations::default();
        let field = Field::builder("595", '1', '2')
            .subfield('a', "Čapek, Karel,")
            .subfield('t', "Krakatit.")
            .subfield('1', "ubcjk012399")
            .build();
        known.add_record(&Record::builder(Leader::default()).field(field).build());
        let mut resolver = AuthorityResolver::new(AuthorityTable::default(), known);

        let id = resolver
            .resolve_or_mint_original_work_id(Some("Čapek, Karel"), Some("Krakatit"), Some("jk01021023"))
            .unwrap();
        assert_eq!(id.as_deref(), Some("ubcjk012399"));
    }

    #[test]
    fn test_minted_identifier_reused_within_run() {
        let mut resolver = resolver();
        let first = resolver
            .resolve_or_mint_original_work_id(Some("Hašek, Jaroslav"), Some("Švejk"), None)
            .unwrap()
            .unwrap();
        let second = resolver
            .resolve_or_mint_original_work_id(Some("Hašek, Jaroslav"), Some("Švejk."), None)
            .unwrap()
            .unwrap();
        let other = resolver
            .resolve_or_mint_original_work_id(Some("Hašek, Jaroslav"), Some("Povídky"), None)
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(resolver.known().len(), 2);
    }

    #[test]
    fn test_absent_inputs_and_sentinels() {
        let mut resolver = resolver();
        assert_eq!(
            resolver.resolve_or_mint_original_work_id(None, Some("Krakatit"), None).unwrap(),
            None
        );
        assert_eq!(
            resolver.resolve_or_mint_original_work_id(Some("Čapek, Karel"), None, None).unwrap(),
            None
        );
        assert_eq!(
            resolver
                .resolve_or_mint_original_work_id(Some("Čapek, Karel"), Some("Originál neznámý"), None)
                .unwrap(),
            None
        );
        assert!(resolver.known().is_empty());
    }

    #[test]
    fn test_collision_is_retried() {
        let mut probe = resolver();
        let taken = probe.mint(Some("jk01021023")).unwrap();

        let mut known = KnownTranslations::default();
        assert!(known.reserve(&taken));
        let mut resolver = AuthorityResolver::new(AuthorityTable::default(), known).with_seed(42);
        let minted = resolver.mint(Some("jk01021023")).unwrap();
        assert_ne!(minted, taken);
        assert!(resolver.known().contains_identifier(&minted));
    }

    #[test]
    fn test_exhausted_identifier_space_is_fatal() {
        let mut known = KnownTranslations::default();
        for suffix in 1000..=9999 {
            known.reserve(&format!("ubcab12cd{suffix}"));
        }
        let mut resolver = AuthorityResolver::new(AuthorityTable::default(), known)
            .with_seed(1)
            .with_retry_limit(50);
        let err = resolver.mint(Some("ab12xxcd")).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::IdentifierSpaceExhausted { ref base, attempts: 50 } if base == "ubcab12cd"
        ));
        assert!(!err.is_row_level());
    }
}
