//! Message Types
//!
//! The records supplied by the external message store. The core never
//! mutates a message once it is loaded; the read flag belongs to whatever
//! read-tracking collaborator sits outside the core.
//!
//! # Drafts
//!
//! Every message carries a [`DraftSet`]: one precomputed reply per tone.
//! The set is total over [`ToneId`]: a tone without its own text resolves
//! to the default tone's text, and a set cannot be built (or deserialized)
//! without that default entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Message identifier, stable for the message's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Create a message ID from a raw value
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the sender wants, as classified upstream
///
/// Corpus files may spell the category in any case; see [`IntentCategory::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IntentCategory {
    /// New business quote request
    Quote,
    /// Claim filing or claim follow-up
    Claim,
    /// Policy renewal notice or request
    Renewal,
    /// General servicing (endorsements, certificates, billing)
    Service,
}

impl IntentCategory {
    /// All categories in sidebar order
    pub const ALL: [Self; 4] = [Self::Quote, Self::Claim, Self::Renewal, Self::Service];

    /// Parse a category name (case-insensitive, singular or plural)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "quote" | "quotes" => Some(Self::Quote),
            "claim" | "claims" => Some(Self::Claim),
            "renewal" | "renewals" => Some(Self::Renewal),
            "service" | "servicing" => Some(Self::Service),
            _ => None,
        }
    }

    /// Wire name, as used in corpus files
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Claim => "claim",
            Self::Renewal => "renewal",
            Self::Service => "service",
        }
    }

    /// Badge label for a single message
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Quote => "Quote",
            Self::Claim => "Claim",
            Self::Renewal => "Renewal",
            Self::Service => "Service",
        }
    }

    /// Heading label for a filtered list
    #[must_use]
    pub fn plural_label(self) -> &'static str {
        match self {
            Self::Quote => "Quotes",
            Self::Claim => "Claims",
            Self::Renewal => "Renewals",
            Self::Service => "Service",
        }
    }
}

/// A corpus named an intent category that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent category `{0}`")]
pub struct UnknownIntent(pub String);

impl TryFrom<String> for IntentCategory {
    type Error = UnknownIntent;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or(UnknownIntent(s))
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply tone
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ToneId {
    /// Neutral business register; the default tone
    #[default]
    Professional,
    /// Warmer register for claims and bad news
    Empathetic,
    /// Short and to the point
    Direct,
}

impl ToneId {
    /// All tones in selector order
    pub const ALL: [Self; 3] = [Self::Professional, Self::Empathetic, Self::Direct];

    /// Parse a tone name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Some(Self::Professional),
            "empathetic" => Some(Self::Empathetic),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Empathetic => "empathetic",
            Self::Direct => "direct",
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Empathetic => "Empathetic",
            Self::Direct => "Direct",
        }
    }
}

impl std::fmt::Display for ToneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A draft set was built without the default tone's text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("drafts must include the default tone `professional`")]
pub struct MissingDefaultDraft;

/// Precomputed replies, one per tone, with a guaranteed default entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ToneId, String>",
    into = "BTreeMap<ToneId, String>"
)]
pub struct DraftSet {
    drafts: BTreeMap<ToneId, String>,
}

impl DraftSet {
    /// Create a draft set holding only the default tone's text
    pub fn new(default_text: impl Into<String>) -> Self {
        let mut drafts = BTreeMap::new();
        drafts.insert(ToneId::default(), default_text.into());
        Self { drafts }
    }

    /// Add (or replace) the text for a tone
    #[must_use]
    pub fn with(mut self, tone: ToneId, text: impl Into<String>) -> Self {
        self.drafts.insert(tone, text.into());
        self
    }

    /// Look up a tone, falling back to the default tone's text
    #[must_use]
    pub fn get(&self, tone: ToneId) -> &str {
        self.drafts
            .get(&tone)
            .or_else(|| self.drafts.get(&ToneId::default()))
            .map_or("", String::as_str)
    }

    /// Whether the tone has its own text (no fallback)
    #[must_use]
    pub fn has_tone(&self, tone: ToneId) -> bool {
        self.drafts.contains_key(&tone)
    }

    /// Tones that have their own text
    pub fn tones(&self) -> impl Iterator<Item = ToneId> + '_ {
        self.drafts.keys().copied()
    }
}

impl TryFrom<BTreeMap<ToneId, String>> for DraftSet {
    type Error = MissingDefaultDraft;

    fn try_from(drafts: BTreeMap<ToneId, String>) -> Result<Self, Self::Error> {
        if drafts.contains_key(&ToneId::default()) {
            Ok(Self { drafts })
        } else {
            Err(MissingDefaultDraft)
        }
    }
}

impl From<DraftSet> for BTreeMap<ToneId, String> {
    fn from(set: DraftSet) -> Self {
        set.drafts
    }
}

/// An inbound message
///
/// Corpus records use camelCase keys (`senderAddress`, `intentCategory`,
/// `readFlag`, `draftsByTone`, `metadataFields`). The short keys `intent`,
/// `read`, `drafts` and `metadata` are accepted too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier
    pub id: MessageId,
    /// Sender display name
    pub sender: String,
    /// Sender e-mail address
    #[serde(default)]
    pub sender_address: Option<String>,
    /// Client account the message belongs to
    pub account: String,
    /// Insurance carrier involved
    pub carrier: String,
    /// Subject line
    pub subject: String,
    /// Short preview of the body
    pub preview: String,
    /// Full body text
    #[serde(default)]
    pub body: Option<String>,
    /// Display timestamp ("10:23 AM", "Yesterday")
    pub timestamp: String,
    /// Classified intent
    #[serde(rename = "intentCategory", alias = "intent")]
    pub intent: IntentCategory,
    /// Free-form labels
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Read flag, owned by the external read tracker
    #[serde(default, rename = "readFlag", alias = "read")]
    pub read: bool,
    /// Precomputed replies per tone
    #[serde(rename = "draftsByTone", alias = "drafts")]
    pub drafts: DraftSet,
    /// Extracted fields (policy number, premium, ...), passed through for display
    #[serde(default, rename = "metadataFields", alias = "metadata")]
    pub metadata: BTreeMap<String, String>,
}

impl Message {
    /// Create a message with the required fields; the rest start empty
    pub fn new(
        id: u64,
        sender: impl Into<String>,
        subject: impl Into<String>,
        intent: IntentCategory,
        drafts: DraftSet,
    ) -> Self {
        Self {
            id: MessageId(id),
            sender: sender.into(),
            sender_address: None,
            account: String::new(),
            carrier: String::new(),
            subject: subject.into(),
            preview: String::new(),
            body: None,
            timestamp: String::new(),
            intent,
            tags: BTreeSet::new(),
            read: false,
            drafts,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the account
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Set the carrier
    #[must_use]
    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }

    /// Set the preview text
    #[must_use]
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = preview.into();
        self
    }

    /// Add a tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a metadata field
    #[must_use]
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Reply text for a tone, falling back to the default tone
    #[must_use]
    pub fn draft_for(&self, tone: ToneId) -> &str {
        self.drafts.get(tone)
    }

    /// Body text, or the preview when no body was supplied
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or(&self.preview)
    }

    /// First letter of the sender, for the reader's sender badge
    #[must_use]
    pub fn sender_initial(&self) -> char {
        self.sender
            .chars()
            .find(|c| c.is_alphanumeric())
            .map_or('?', |c| c.to_ascii_uppercase())
    }

    /// "Sender <address>" when an address is known
    #[must_use]
    pub fn sender_line(&self) -> String {
        match &self.sender_address {
            Some(address) => format!("{} <{}>", self.sender, address),
            None => self.sender.clone(),
        }
    }
}
