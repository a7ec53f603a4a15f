//! Unlock state machine.
//!
//! ```text
//!            resume / submit
//!   Locked ──────────────────▶ Verifying ──▶ Unlocked
//!     ▲                           │              │
//!     └──── rejection (alert) ────┘              │
//!     └──────────────── encrypt_again ───────────┘
//! ```
//!
//! Every attempt, whether it starts from the cache or from a typed
//! password, runs the same pipeline: decrypt, check the sentinel, verify
//! the HMAC, and only then render and notify. Observers never see content
//! that failed the integrity check.

use tracing::{debug, info, warn};

use crate::cache::KeyCache;
use crate::config::{Messages, ProtectionConfig};
use crate::crypto::{derive_key_material, CryptoProvider, DerivedKeyMaterial};
use crate::decrypt::decrypt_content;
use crate::error::{PagelockError, Result};
use crate::integrity::verify_integrity;
use crate::payload::{EncryptedPayload, ProtectedPage};
use crate::render::restore_lazy_sources;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    Locked,
    Verifying,
    Unlocked,
}

/// Why an attempt ended back in `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongPassword,
    IntegrityFailure,
    CacheCorruption,
}

impl Rejection {
    fn from_error(err: &PagelockError) -> Self {
        match err {
            PagelockError::IntegrityFailure => Rejection::IntegrityFailure,
            PagelockError::CacheCorruption(_) => Rejection::CacheCorruption,
            _ => Rejection::WrongPassword,
        }
    }
}

/// Result of a `resume` or `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// This call revealed the content.
    Unlocked,
    /// Content was already revealed; nothing ran.
    AlreadyUnlocked,
    /// `resume` found no cached record, or the store could not be read.
    NoCachedKey,
    /// The attempt failed and the page is locked again.
    Rejected(Rejection),
}

/// The fragment shown after a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedContent {
    html: String,
}

impl RevealedContent {
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// UI collaborator hooks, called synchronously.
pub trait UnlockObserver {
    /// Fired exactly once per successful unlock, after integrity passed.
    fn on_unlocked(&self, content: &RevealedContent);

    /// One alert per failed attempt.
    fn on_alert(&self, _message: &str) {}

    fn on_state_changed(&self, _state: UnlockState) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Cache,
    Password,
}

/// decrypt → verify → render for one set of key material.
///
/// Returns the revealed fragment only when the sentinel and the HMAC both
/// check out. Has no side effects, so it can also test a cached record
/// without consuming it.
pub fn verify_material<C>(
    crypto: &C,
    payload: &EncryptedPayload,
    material: &DerivedKeyMaterial,
) -> Result<String>
where
    C: CryptoProvider + ?Sized,
{
    let decrypted = decrypt_content(crypto, &payload.ciphertext, material)?;
    verify_integrity(
        crypto,
        &decrypted,
        material.integrity_key(),
        &payload.hmac_digest,
    )?;
    Ok(restore_lazy_sources(decrypted.body()))
}

pub struct Orchestrator<C, S> {
    crypto: C,
    store: S,
    config: ProtectionConfig,
    page: ProtectedPage,
    messages: Messages,
    cache: KeyCache,
    state: UnlockState,
    last_rejection: Option<Rejection>,
    content: Option<RevealedContent>,
    observers: Vec<Box<dyn UnlockObserver>>,
}

impl<C, S> Orchestrator<C, S>
where
    C: CryptoProvider,
    S: KeyValueStore,
{
    pub fn new(config: ProtectionConfig, crypto: C, store: S, page: ProtectedPage) -> Result<Self> {
        config.validate()?;
        let cache = KeyCache::new(&config, &page.path);
        let messages = page.messages(&config.messages);
        Ok(Self {
            crypto,
            store,
            config,
            page,
            messages,
            cache,
            state: UnlockState::Locked,
            last_rejection: None,
            content: None,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn UnlockObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    /// Rejection of the most recent failed attempt, cleared on the next one.
    pub fn last_rejection(&self) -> Option<Rejection> {
        self.last_rejection
    }

    pub fn content(&self) -> Option<&RevealedContent> {
        self.content.as_ref()
    }

    pub fn page(&self) -> &ProtectedPage {
        &self.page
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Page-load transition: try the cached record, if any.
    ///
    /// A record that cannot be parsed is dropped without an alert; a record
    /// that parses but fails decryption or verification is dropped and
    /// alerted like any other failed attempt. A store that cannot be read
    /// leaves the record in place and reports `NoCachedKey`.
    pub fn resume(&mut self) -> UnlockOutcome {
        if self.state == UnlockState::Unlocked {
            return UnlockOutcome::AlreadyUnlocked;
        }

        match self.cache.read(&self.store) {
            Ok(Some(material)) => {
                debug!(key = %self.cache.storage_key(), "found cached key material");
                self.attempt(&material, Source::Cache)
            }
            Ok(None) => UnlockOutcome::NoCachedKey,
            Err(err @ PagelockError::CacheCorruption(_)) => {
                warn!(key = %self.cache.storage_key(), error = %err, "discarding unusable cache record");
                self.invalidate_cache();
                let rejection = Rejection::from_error(&err);
                self.last_rejection = Some(rejection);
                UnlockOutcome::Rejected(rejection)
            }
            Err(err) => {
                warn!(
                    key = %self.cache.storage_key(),
                    error = %err,
                    "key store unreadable; prompting instead"
                );
                UnlockOutcome::NoCachedKey
            }
        }
    }

    /// Password-submit transition.
    pub fn submit(&mut self, password: &str) -> UnlockOutcome {
        if self.state == UnlockState::Unlocked {
            return UnlockOutcome::AlreadyUnlocked;
        }
        let material = derive_key_material(&self.crypto, password, &self.config);
        self.attempt(&material, Source::Password)
    }

    /// "Encrypt again": forget the cached record and lock the page.
    pub fn encrypt_again(&mut self) -> Result<()> {
        self.cache.invalidate(&mut self.store)?;
        self.content = None;
        self.last_rejection = None;
        self.set_state(UnlockState::Locked);
        info!(path = %self.page.path, "page locked again");
        Ok(())
    }

    fn attempt(&mut self, material: &DerivedKeyMaterial, source: Source) -> UnlockOutcome {
        self.last_rejection = None;
        self.set_state(UnlockState::Verifying);

        match self.run_pipeline(material) {
            Ok(html) => {
                if source == Source::Password {
                    if let Err(err) = self.cache.save(&mut self.store, material) {
                        warn!(error = %err, "unlocked, but the key cache could not be written");
                    }
                }
                let content = RevealedContent { html };
                self.set_state(UnlockState::Unlocked);
                let from_cache = source == Source::Cache;
                info!(path = %self.page.path, from_cache, "page unlocked");
                for observer in &self.observers {
                    observer.on_unlocked(&content);
                }
                self.content = Some(content);
                UnlockOutcome::Unlocked
            }
            Err(err) => {
                if source == Source::Cache {
                    self.invalidate_cache();
                }
                let rejection = Rejection::from_error(&err);
                let alert = match rejection {
                    Rejection::IntegrityFailure => self.messages.wrong_hash.clone(),
                    _ => self.messages.wrong_password.clone(),
                };
                self.last_rejection = Some(rejection);
                self.set_state(UnlockState::Locked);
                for observer in &self.observers {
                    observer.on_alert(&alert);
                }
                UnlockOutcome::Rejected(rejection)
            }
        }
    }

    /// Nothing is observable until this returns.
    fn run_pipeline(&self, material: &DerivedKeyMaterial) -> Result<String> {
        verify_material(&self.crypto, &self.page.payload, material)
    }

    fn invalidate_cache(&mut self) {
        if let Err(err) = self.cache.invalidate(&mut self.store) {
            warn!(error = %err, "failed to invalidate cache record");
        }
    }

    fn set_state(&mut self, state: UnlockState) {
        self.state = state;
        for observer in &self.observers {
            observer.on_state_changed(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::NativeCrypto;
    use crate::payload::seal;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        unlocked: Vec<String>,
        alerts: Vec<String>,
        states: Vec<UnlockState>,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl UnlockObserver for Recorder {
        fn on_unlocked(&self, content: &RevealedContent) {
            self.0.borrow_mut().unlocked.push(content.html().to_string());
        }

        fn on_alert(&self, message: &str) {
            self.0.borrow_mut().alerts.push(message.to_string());
        }

        fn on_state_changed(&self, state: UnlockState) {
            self.0.borrow_mut().states.push(state);
        }
    }

    fn page(password: &str, fragment: &str) -> ProtectedPage {
        let payload = seal(&NativeCrypto, password, fragment, &ProtectionConfig::default()).unwrap();
        ProtectedPage {
            path: "/posts/secret/".to_string(),
            payload,
            wrong_password_message: Some("wrong password".to_string()),
            wrong_hash_message: Some("wrong hash".to_string()),
        }
    }

    fn orchestrator(
        page: ProtectedPage,
        store: MemoryStore,
    ) -> (Orchestrator<NativeCrypto, MemoryStore>, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let mut orchestrator =
            Orchestrator::new(ProtectionConfig::default(), NativeCrypto, store, page).unwrap();
        orchestrator.add_observer(Box::new(Recorder(Rc::clone(&recorded))));
        (orchestrator, recorded)
    }

    #[test]
    fn test_submit_walks_through_verifying() {
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());

        assert_eq!(orchestrator.submit("pw"), UnlockOutcome::Unlocked);
        assert_eq!(
            recorded.borrow().states,
            vec![UnlockState::Verifying, UnlockState::Unlocked]
        );
        assert_eq!(orchestrator.content().unwrap().html(), "<p>x</p>");
    }

    #[test]
    fn test_rejection_returns_to_locked_with_one_alert() {
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());

        let outcome = orchestrator.submit("nope");

        assert_eq!(outcome, UnlockOutcome::Rejected(Rejection::WrongPassword));
        assert_eq!(orchestrator.state(), UnlockState::Locked);
        assert_eq!(orchestrator.last_rejection(), Some(Rejection::WrongPassword));
        assert_eq!(recorded.borrow().alerts, vec!["wrong password".to_string()]);
        assert!(recorded.borrow().unlocked.is_empty());
    }

    #[test]
    fn test_second_submit_after_unlock_does_nothing() {
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());

        orchestrator.submit("pw");
        assert_eq!(orchestrator.submit("pw"), UnlockOutcome::AlreadyUnlocked);
        assert_eq!(orchestrator.resume(), UnlockOutcome::AlreadyUnlocked);
        assert_eq!(recorded.borrow().unlocked.len(), 1);
    }

    #[test]
    fn test_success_clears_previous_rejection() {
        let (mut orchestrator, _) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());

        orchestrator.submit("nope");
        orchestrator.submit("pw");
        assert_eq!(orchestrator.last_rejection(), None);
    }

    #[test]
    fn test_resume_without_record() {
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());

        assert_eq!(orchestrator.resume(), UnlockOutcome::NoCachedKey);
        assert_eq!(orchestrator.state(), UnlockState::Locked);
        assert!(recorded.borrow().states.is_empty());
    }

    #[test]
    fn test_resume_uses_record_from_earlier_visit() {
        let page = page("pw", "<p>x</p>");
        let (mut first, _) = orchestrator(page.clone(), MemoryStore::new());
        first.submit("pw");

        let (mut second, recorded) = orchestrator(page, first.into_store());
        assert_eq!(second.resume(), UnlockOutcome::Unlocked);
        assert_eq!(recorded.borrow().unlocked, vec!["<p>x</p>".to_string()]);
    }

    #[test]
    fn test_stale_record_is_invalidated_and_alerted() {
        let (mut first, _) = orchestrator(page("old", "<p>x</p>"), MemoryStore::new());
        first.submit("old");

        // Same path, re-sealed under a new password.
        let (mut second, recorded) = orchestrator(page("new", "<p>x</p>"), first.into_store());
        assert_eq!(
            second.resume(),
            UnlockOutcome::Rejected(Rejection::WrongPassword)
        );
        assert!(second.store().is_empty());
        assert_eq!(recorded.borrow().alerts.len(), 1);
    }

    #[test]
    fn test_integrity_failure_uses_hash_message() {
        let mut page = page("pw", "<p>x</p>");
        page.payload.hmac_digest = "00".repeat(32);
        let (mut orchestrator, recorded) = orchestrator(page, MemoryStore::new());

        assert_eq!(
            orchestrator.submit("pw"),
            UnlockOutcome::Rejected(Rejection::IntegrityFailure)
        );
        assert_eq!(recorded.borrow().alerts, vec!["wrong hash".to_string()]);
        assert!(orchestrator.store().is_empty());
        assert!(orchestrator.content().is_none());
    }

    #[test]
    fn test_encrypt_again_clears_cache_and_content() {
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), MemoryStore::new());
        orchestrator.submit("pw");
        assert_eq!(orchestrator.store().len(), 1);

        orchestrator.encrypt_again().unwrap();

        assert_eq!(orchestrator.state(), UnlockState::Locked);
        assert!(orchestrator.content().is_none());
        assert!(orchestrator.store().is_empty());
        assert_eq!(recorded.borrow().states.last(), Some(&UnlockState::Locked));
        assert_eq!(orchestrator.resume(), UnlockOutcome::NoCachedKey);
    }

    #[test]
    fn test_revealed_fragment_has_lazy_sources_restored() {
        let (mut orchestrator, _) = orchestrator(
            page("pw", r#"<img data-src="/a.png">"#),
            MemoryStore::new(),
        );
        orchestrator.submit("pw");
        assert_eq!(
            orchestrator.content().unwrap().html(),
            r#"<img src="/a.png" data-src="/a.png">"#
        );
    }

    /// Store whose reads always fail, counting deletes.
    #[derive(Default)]
    struct UnreadableStore {
        deletes: usize,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PagelockError::Storage("disk unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn delete(&mut self, _key: &str) -> Result<()> {
            self.deletes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_store_keeps_record_and_falls_back_to_prompt() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let mut orchestrator = Orchestrator::new(
            ProtectionConfig::default(),
            NativeCrypto,
            UnreadableStore::default(),
            page("pw", "<p>x</p>"),
        )
        .unwrap();
        orchestrator.add_observer(Box::new(Recorder(Rc::clone(&recorded))));

        assert_eq!(orchestrator.resume(), UnlockOutcome::NoCachedKey);
        assert_eq!(orchestrator.store().deletes, 0);
        assert_eq!(orchestrator.last_rejection(), None);
        assert!(recorded.borrow().alerts.is_empty());

        assert_eq!(orchestrator.submit("pw"), UnlockOutcome::Unlocked);
    }

    #[test]
    fn test_corrupt_record_is_deleted_without_alert() {
        let mut store = MemoryStore::new();
        store
            .set(&ProtectionConfig::default().storage_key("/posts/secret/"), "not json")
            .unwrap();
        let (mut orchestrator, recorded) = orchestrator(page("pw", "<p>x</p>"), store);

        assert_eq!(
            orchestrator.resume(),
            UnlockOutcome::Rejected(Rejection::CacheCorruption)
        );
        assert!(orchestrator.store().is_empty());
        assert!(recorded.borrow().alerts.is_empty());
    }

    #[test]
    fn test_verify_material_matches_pipeline() {
        let config = ProtectionConfig::default();
        let page = page("pw", r#"<img data-src="/a.png">"#);
        let right = derive_key_material(&NativeCrypto, "pw", &config);
        let wrong = derive_key_material(&NativeCrypto, "nope", &config);

        assert_eq!(
            verify_material(&NativeCrypto, &page.payload, &right).unwrap(),
            r#"<img src="/a.png" data-src="/a.png">"#
        );
        assert!(matches!(
            verify_material(&NativeCrypto, &page.payload, &wrong),
            Err(PagelockError::WrongPassword)
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = ProtectionConfig {
            iv_iterations: 0,
            ..ProtectionConfig::default()
        };
        let result = Orchestrator::new(config, NativeCrypto, MemoryStore::new(), page("pw", "x"));
        assert!(result.is_err());
    }
}
