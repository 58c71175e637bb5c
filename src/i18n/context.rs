// SPDX-License-Identifier: PMPL-1.0-or-later

//! Active-language state and the per-language translator handle.
//!
//! There is no global language: callers own a [`LanguageContext`] and hand
//! its current value to whatever renders text. That keeps every lookup a
//! plain function of `(language, key, tables)`.

use crate::i18n::{resolve_field, Catalog, Lang};
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use crate::types::LocalizedText;

type Listener = Box<dyn Fn(Lang)>;

/// Handle returned by [`LanguageContext::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Holds the active language, remembers it in a preference store, and tells
/// subscribers when it changes.
pub struct LanguageContext {
    active: Lang,
    store: Option<Box<dyn PreferenceStore>>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

impl LanguageContext {
    /// Context with no persistence.
    pub fn new(lang: Lang) -> Self {
        Self {
            active: lang,
            store: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Context initialised from the stored preference.
    ///
    /// Only exact language codes are honoured; anything else in the store
    /// (including nothing) leaves `default` active.
    pub fn with_store(store: Box<dyn PreferenceStore>, default: Lang) -> Self {
        let active = store
            .get(LANGUAGE_KEY)
            .and_then(|code| Lang::all().iter().copied().find(|lang| lang.code() == code))
            .unwrap_or(default);

        Self {
            store: Some(store),
            ..Self::new(active)
        }
    }

    pub fn get(&self) -> Lang {
        self.active
    }

    /// Switch language. The choice is persisted on every call; subscribers
    /// are notified only when the language actually changes.
    ///
    /// A failed write is logged and does not block the switch.
    pub fn set(&mut self, lang: Lang) {
        if let Some(store) = self.store.as_mut() {
            if let Err(err) = store.set(LANGUAGE_KEY, lang.code()) {
                tracing::warn!(error = %err, lang = %lang, "could not persist language preference");
            }
        }

        if self.active == lang {
            return;
        }
        tracing::debug!(from = %self.active, to = %lang, "language changed");
        self.active = lang;
        for (_, listener) in &self.listeners {
            listener(lang);
        }
    }

    /// Register `listener`. It is called right away with the current
    /// language and again after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: Fn(Lang) + 'static,
    {
        listener(self.active);
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    pub fn store(&self) -> Option<&dyn PreferenceStore> {
        self.store.as_deref()
    }

    /// Translator bound to the current language.
    pub fn translator<'a>(&self, catalog: &'a Catalog) -> Translator<'a> {
        Translator::new(catalog, self.active)
    }
}

impl Default for LanguageContext {
    fn default() -> Self {
        Self::new(Lang::default())
    }
}

/// Catalog lookups and field resolution for one fixed language.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    lang: Lang,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a Catalog, lang: Lang) -> Self {
        Self { catalog, lang }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.resolve(self.lang, key)
    }

    pub fn field<'v>(&self, value: &'v LocalizedText) -> &'v str {
        resolve_field(value, self.lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stored(code: &str) -> LanguageContext {
        let store = MemoryStore::with(LANGUAGE_KEY, code);
        LanguageContext::with_store(Box::new(store), Lang::Es)
    }

    #[test]
    fn starts_from_stored_preference() {
        let ctx = stored("en");
        assert_eq!(ctx.get(), Lang::En);
    }

    #[test]
    fn ignores_unknown_stored_value() {
        let ctx = stored("fr");
        assert_eq!(ctx.get(), Lang::Es);

        let ctx = stored("EN");
        assert_eq!(ctx.get(), Lang::Es);

        let ctx = LanguageContext::with_store(Box::new(MemoryStore::new()), Lang::Pt);
        assert_eq!(ctx.get(), Lang::Pt);
    }

    #[test]
    fn set_persists_choice() {
        let mut ctx = LanguageContext::with_store(Box::new(MemoryStore::new()), Lang::Es);
        ctx.set(Lang::Pt);
        assert_eq!(ctx.get(), Lang::Pt);
        let stored = ctx.store().and_then(|store| store.get(LANGUAGE_KEY));
        assert_eq!(stored.as_deref(), Some("pt"));
    }

    #[test]
    fn subscribers_see_initial_value_and_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = LanguageContext::new(Lang::Es);

        let sink = Rc::clone(&seen);
        let sub = ctx.subscribe(move |lang| sink.borrow_mut().push(lang));

        ctx.set(Lang::En);
        ctx.set(Lang::En);
        ctx.set(Lang::Es);
        assert_eq!(*seen.borrow(), vec![Lang::Es, Lang::En, Lang::Es]);

        assert!(ctx.unsubscribe(sub));
        assert!(!ctx.unsubscribe(sub));
        ctx.set(Lang::Pt);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn translator_follows_context() {
        let catalog = Catalog::bundled().unwrap();
        let mut ctx = LanguageContext::default();
        assert_eq!(ctx.translator(&catalog).t("nav.home"), "Inicio");

        ctx.set(Lang::En);
        let tr = ctx.translator(&catalog);
        assert_eq!(tr.lang(), Lang::En);
        assert_eq!(tr.t("nav.home"), "Home");

        let text = LocalizedText::by_language([("es", "Cerro"), ("en", "Hill")]);
        assert_eq!(tr.field(&text), "Hill");
    }
}
