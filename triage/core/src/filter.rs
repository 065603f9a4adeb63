//! Filter Engine
//!
//! Derives the visible subset of the message store from the current facet
//! and search query. A message is visible iff it passes the facet predicate
//! AND the search predicate. Output keeps store order.
//!
//! Nothing here is cached: the visible set is recomputed from scratch on
//! every state change. That is O(n) over the store, which is fine for an
//! inbox of a few thousand messages.

use serde::{Deserialize, Serialize};

use crate::message::{IntentCategory, Message};
use crate::store::MessageStore;

/// Which facet dimension is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    /// No facet; everything passes
    None,
    /// Intent category
    Category,
    /// Client account
    Account,
    /// Insurance carrier
    Carrier,
}

/// The single active facet
///
/// Kind and value live in one enum, so "at most one facet" holds by
/// construction: choosing a new facet replaces the old one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facet {
    /// No facet (the "all" value)
    #[default]
    All,
    /// Only messages with this intent
    Category(IntentCategory),
    /// Only messages for this account
    Account(String),
    /// Only messages involving this carrier
    Carrier(String),
}

impl Facet {
    /// The facet dimension
    #[must_use]
    pub fn kind(&self) -> FacetKind {
        match self {
            Self::All => FacetKind::None,
            Self::Category(_) => FacetKind::Category,
            Self::Account(_) => FacetKind::Account,
            Self::Carrier(_) => FacetKind::Carrier,
        }
    }

    /// The facet value; `"all"` when no facet is active
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Category(category) => category.as_str(),
            Self::Account(account) => account,
            Self::Carrier(carrier) => carrier,
        }
    }

    /// Heading for the message list under this facet
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::All => "Inbox",
            Self::Category(category) => category.plural_label(),
            Self::Account(account) => account,
            Self::Carrier(carrier) => carrier,
        }
    }

    /// Whether a message passes this facet
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => message.intent == *category,
            Self::Account(account) => message.account == *account,
            Self::Carrier(carrier) => message.carrier == *carrier,
        }
    }
}

/// Facet plus free-text search
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    facet: Facet,
    search_query: String,
}

impl FilterState {
    /// Unfiltered state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active facet, keeping the search query
    #[must_use]
    pub fn with_facet(&self, facet: Facet) -> Self {
        Self {
            facet,
            search_query: self.search_query.clone(),
        }
    }

    /// Replace the search query, keeping the facet
    #[must_use]
    pub fn with_search(&self, query: impl Into<String>) -> Self {
        Self {
            facet: self.facet.clone(),
            search_query: query.into(),
        }
    }

    /// No facet, no search
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// The active facet
    #[must_use]
    pub fn facet(&self) -> &Facet {
        &self.facet
    }

    /// The facet dimension
    #[must_use]
    pub fn facet_kind(&self) -> FacetKind {
        self.facet.kind()
    }

    /// The facet value (`"all"` when none)
    #[must_use]
    pub fn facet_value(&self) -> &str {
        self.facet.value()
    }

    /// The current search text
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether anything is narrowing the view
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.facet != Facet::All || !self.search_query.is_empty()
    }
}

/// Facet half of the visibility rule
#[must_use]
pub fn facet_predicate(message: &Message, filter: &FilterState) -> bool {
    filter.facet.matches(message)
}

/// Search half of the visibility rule
///
/// An empty query passes everything. Otherwise the query must appear,
/// ignoring case, in the sender, the subject, or the account.
#[must_use]
pub fn search_predicate(message: &Message, filter: &FilterState) -> bool {
    if filter.search_query.is_empty() {
        return true;
    }

    let needle = filter.search_query.to_lowercase();
    [&message.sender, &message.subject, &message.account]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// The visible set: store order, both predicates applied
#[must_use]
pub fn compute_visible_set<'a>(store: &'a MessageStore, filter: &FilterState) -> Vec<&'a Message> {
    store
        .iter()
        .filter(|m| facet_predicate(m, filter) && search_predicate(m, filter))
        .collect()
}

/// Distinct values a facet dimension can take, in first-seen store order
///
/// Categories are listed in their fixed order, restricted to those present.
#[must_use]
pub fn facet_values(store: &MessageStore, kind: FacetKind) -> Vec<Facet> {
    match kind {
        FacetKind::None => vec![Facet::All],
        FacetKind::Category => IntentCategory::ALL
            .iter()
            .filter(|c| store.iter().any(|m| m.intent == **c))
            .map(|c| Facet::Category(*c))
            .collect(),
        FacetKind::Account => distinct(store.iter().map(|m| m.account.as_str()))
            .into_iter()
            .map(|a| Facet::Account(a.to_string()))
            .collect(),
        FacetKind::Carrier => distinct(store.iter().map(|m| m.carrier.as_str()))
            .into_iter()
            .map(|c| Facet::Carrier(c.to_string()))
            .collect(),
    }
}

/// Messages matching a facet alone (ignores search), for sidebar badges
#[must_use]
pub fn facet_count(store: &MessageStore, facet: &Facet) -> usize {
    store.iter().filter(|m| facet.matches(m)).count()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DraftSet, MessageId};
    use pretty_assertions::assert_eq;

    fn store() -> MessageStore {
        MessageStore::new(vec![
            Message::new(1, "Alice Smith", "Quote Request", IntentCategory::Quote, DraftSet::new("Hi"))
                .with_account("Acme")
                .with_carrier("Travelers"),
            Message::new(2, "Travelers Insurance", "Policy Renewal", IntentCategory::Renewal, DraftSet::new("Yo"))
                .with_account("Globex")
                .with_carrier("Travelers"),
            Message::new(3, "John Doe", "Claim Filing", IntentCategory::Claim, DraftSet::new("Ok"))
                .with_account("Acme")
                .with_carrier("Chubb"),
        ])
    }

    fn ids(messages: &[&Message]) -> Vec<MessageId> {
        messages.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_unfiltered_keeps_store_order() {
        let store = store();
        let visible = compute_visible_set(&store, &FilterState::new());
        assert_eq!(ids(&visible), vec![MessageId(1), MessageId(2), MessageId(3)]);
    }

    #[test]
    fn test_category_facet() {
        let store = store();
        let filter = FilterState::new().with_facet(Facet::Category(IntentCategory::Claim));
        assert_eq!(ids(&compute_visible_set(&store, &filter)), vec![MessageId(3)]);
    }

    #[test]
    fn test_account_and_carrier_facets() {
        let store = store();

        let by_account = FilterState::new().with_facet(Facet::Account("Acme".into()));
        assert_eq!(
            ids(&compute_visible_set(&store, &by_account)),
            vec![MessageId(1), MessageId(3)]
        );

        let by_carrier = FilterState::new().with_facet(Facet::Carrier("Travelers".into()));
        assert_eq!(
            ids(&compute_visible_set(&store, &by_carrier)),
            vec![MessageId(1), MessageId(2)]
        );
    }

    #[test]
    fn test_new_facet_replaces_old() {
        let filter = FilterState::new()
            .with_facet(Facet::Category(IntentCategory::Quote))
            .with_facet(Facet::Account("Globex".into()));

        assert_eq!(filter.facet_kind(), FacetKind::Account);
        assert_eq!(filter.facet_value(), "Globex");
    }

    #[test]
    fn test_no_facet_reads_as_all() {
        let filter = FilterState::new();
        assert_eq!(filter.facet_kind(), FacetKind::None);
        assert_eq!(filter.facet_value(), "all");
        assert!(!filter.is_active());
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let store = store();

        let by_account = FilterState::new().with_search("GLOBEX");
        assert_eq!(ids(&compute_visible_set(&store, &by_account)), vec![MessageId(2)]);

        let by_sender = FilterState::new().with_search("john");
        assert_eq!(ids(&compute_visible_set(&store, &by_sender)), vec![MessageId(3)]);

        let by_subject = FilterState::new().with_search("renewal");
        assert_eq!(ids(&compute_visible_set(&store, &by_subject)), vec![MessageId(2)]);
    }

    #[test]
    fn test_search_ignores_carrier_and_preview() {
        let store = MessageStore::new(vec![Message::new(
            1,
            "Alice",
            "Hello",
            IntentCategory::Quote,
            DraftSet::new("Hi"),
        )
        .with_carrier("Chubb")
        .with_preview("chubb mentioned here")]);

        let filter = FilterState::new().with_search("chubb");
        assert!(compute_visible_set(&store, &filter).is_empty());
    }

    #[test]
    fn test_facet_and_search_combine_with_and() {
        let store = store();
        let filter = FilterState::new()
            .with_facet(Facet::Account("Acme".into()))
            .with_search("claim");
        assert_eq!(ids(&compute_visible_set(&store, &filter)), vec![MessageId(3)]);

        let none = filter.with_search("renewal");
        assert!(compute_visible_set(&store, &none).is_empty());
    }

    #[test]
    fn test_membership_matches_predicates() {
        let store = store();
        let filters = [
            FilterState::new(),
            FilterState::new().with_search("a"),
            FilterState::new().with_facet(Facet::Carrier("Chubb".into())),
            FilterState::new()
                .with_facet(Facet::Category(IntentCategory::Quote))
                .with_search("xyz"),
        ];

        for filter in &filters {
            let visible = ids(&compute_visible_set(&store, filter));
            for msg in &store {
                let expected = facet_predicate(msg, filter) && search_predicate(msg, filter);
                assert_eq!(visible.contains(&msg.id), expected, "{filter:?} / {}", msg.id);
            }
        }
    }

    #[test]
    fn test_cleared_resets_everything() {
        let filter = FilterState::new()
            .with_facet(Facet::Account("Acme".into()))
            .with_search("x")
            .cleared();
        assert_eq!(filter, FilterState::new());
    }

    #[test]
    fn test_facet_values_and_counts() {
        let store = store();

        assert_eq!(
            facet_values(&store, FacetKind::Account),
            vec![Facet::Account("Acme".into()), Facet::Account("Globex".into())]
        );
        assert_eq!(
            facet_values(&store, FacetKind::Category),
            vec![
                Facet::Category(IntentCategory::Quote),
                Facet::Category(IntentCategory::Claim),
                Facet::Category(IntentCategory::Renewal),
            ]
        );
        assert_eq!(facet_count(&store, &Facet::Carrier("Travelers".into())), 2);
        assert_eq!(facet_count(&store, &Facet::All), 3);
    }

    #[test]
    fn test_facet_titles() {
        assert_eq!(Facet::All.title(), "Inbox");
        assert_eq!(Facet::Category(IntentCategory::Quote).title(), "Quotes");
        assert_eq!(Facet::Account("Acme".into()).title(), "Acme");
    }
}
