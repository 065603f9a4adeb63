//! Message Store
//!
//! The ordered, read-only message collection handed to the core at startup.
//! Where the messages come from (a JSON file, a fixture, the built-in demo
//! inbox) is the caller's business; once loaded the store never changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::message::{DraftSet, IntentCategory, Message, MessageId, ToneId};

/// Errors that can occur when loading a corpus
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the corpus file
    #[error("Failed to read corpus at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The corpus is not a valid JSON message array
    #[error("Failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two messages share an id
    #[error("Duplicate message id {0}")]
    DuplicateId(MessageId),
}

/// Ordered, immutable message collection
#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Wrap an ordered list of messages
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Parse a JSON array of messages
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] for malformed JSON or a message whose
    /// drafts lack the default tone, and [`StoreError::DuplicateId`] when two
    /// messages share an id.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let messages: Vec<Message> = serde_json::from_str(json)?;

        let mut seen = HashSet::with_capacity(messages.len());
        for msg in &messages {
            if !seen.insert(msg.id) {
                return Err(StoreError::DuplicateId(msg.id));
            }
        }

        Ok(Self { messages })
    }

    /// Read and parse a JSON corpus file
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file cannot be read, otherwise the
    /// same errors as [`MessageStore::from_json_str`].
    pub fn load_from_path(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let store = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            messages = store.len(),
            "Loaded message corpus"
        );

        Ok(store)
    }

    /// Look up a message by id
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// The first message in store order
    #[must_use]
    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Iterate in store order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the store holds no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The built-in demo inbox
    #[must_use]
    pub fn demo() -> Self {
        Self::new(demo_messages())
    }
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

fn demo_messages() -> Vec<Message> {
    let mut alice = Message::new(
        1,
        "Alice Smith",
        "Re: Quote Request for Logistics Corp",
        IntentCategory::Quote,
        DraftSet::new(
            "Hi Alice, received. I will work on the CGL quote for the CA location immediately. \
             Based on the $5M revenue, I'll approach Travelers and Liberty Mutual first to get \
             the best rates. Expect an update by Thursday afternoon.",
        )
        .with(
            ToneId::Empathetic,
            "Hi Alice, thanks for thinking of us for the new warehouse, congratulations on the \
             expansion! I know Friday is tight, so I'm starting on the CGL quote today and will \
             keep you posted every step of the way.",
        )
        .with(
            ToneId::Direct,
            "Alice, got it. CGL quote for the CA warehouse is in progress; options by Thursday.",
        ),
    )
    .with_account("Logistics Corp")
    .with_carrier("Travelers")
    .with_preview("Hi, could you please provide a CGL quote for our new warehouse...")
    .with_tag("Urgent")
    .with_metadata("Location", "CA, 90001")
    .with_metadata("Revenue", "$5,000,000")
    .with_metadata("Square Footage", "50,000 sq ft");
    alice.sender_address = Some("alice@logisticscorp.com".to_string());
    alice.timestamp = "10:23 AM".to_string();
    alice.body = Some(
        "Hi Tony,\n\nCould you please provide a CGL (Commercial General Liability) quote for \
         our new warehouse location in California?\n\nHere are the details:\n\
         - Address: 123 Industrial Pkwy, CA 90001\n- Sq Footage: 50,000 sq ft\n\
         - Projected Revenue: $5M\n\nWe need this by Friday.\n\nThanks,\nAlice"
            .to_string(),
    );

    let mut travelers = Message::new(
        2,
        "Travelers Insurance",
        "Policy Renewal #992831",
        IntentCategory::Renewal,
        DraftSet::new(
            "Thank you for the renewal notice for policy #992831. We are reviewing the terms \
             with our client and will confirm before the renewal date.",
        )
        .with(
            ToneId::Direct,
            "Received the renewal notice for #992831. Confirmation to follow.",
        ),
    )
    .with_account("Harbor Trucking")
    .with_carrier("Travelers")
    .with_preview("Attached is the renewal notice for the upcoming term.")
    .with_metadata("Policy Number", "992831")
    .with_metadata("Premium", "$48,200");
    travelers.sender_address = Some("renewals@travelers.com".to_string());
    travelers.timestamp = "Yesterday".to_string();
    travelers.read = true;

    let mut john = Message::new(
        3,
        "John Doe",
        "Claim Filing: Accident on I-95",
        IntentCategory::Claim,
        DraftSet::new(
            "Hi John, thank you for reporting the accident. I have opened a claim with the \
             carrier and will send you the claim number shortly. Please gather the police \
             report and any photos from the scene.",
        )
        .with(
            ToneId::Empathetic,
            "Hi John, I'm very sorry to hear about the collision and I hope your driver is \
             okay. I've already opened the claim, so please don't worry about the paperwork \
             for now. I'll walk you through each step.",
        )
        .with(
            ToneId::Direct,
            "John, claim opened. Send the police report and scene photos when you can.",
        ),
    )
    .with_account("Harbor Trucking")
    .with_carrier("Liberty Mutual")
    .with_preview("Unfortunately one of our drivers was involved in a collision...")
    .with_tag("High Risk")
    .with_metadata("Policy Number", "AUTO-55120")
    .with_metadata("Date of Loss", "Mon, I-95 NB");
    john.sender_address = Some("john@trucking.com".to_string());
    john.timestamp = "2 Days ago".to_string();
    john.read = true;

    let mut priya = Message::new(
        4,
        "Priya Patel",
        "Certificate of Insurance for new landlord",
        IntentCategory::Service,
        DraftSet::new(
            "Hi Priya, happy to help. I'll issue the certificate naming your new landlord as \
             additional insured and send it over today.",
        )
        .with(ToneId::Direct, "Priya, COI coming today."),
    )
    .with_account("Acme Manufacturing")
    .with_carrier("Hartford")
    .with_preview("Our new landlord needs a COI listing them as additional insured.")
    .with_metadata("Policy Number", "GL-20931");
    priya.sender_address = Some("priya@acme-mfg.com".to_string());
    priya.timestamp = "9:02 AM".to_string();

    let mut marcus = Message::new(
        5,
        "Marcus Lee",
        "Umbrella quote for Globex Foods",
        IntentCategory::Quote,
        DraftSet::new(
            "Hi Marcus, thanks for the details. I'll market the umbrella to Chubb and Hartford \
             and come back with options early next week.",
        )
        .with(
            ToneId::Empathetic,
            "Hi Marcus, thanks for your patience while we sorted out the underlying limits. \
             I'll take it from here and come back with umbrella options early next week.",
        ),
    )
    .with_account("Globex Foods")
    .with_carrier("Chubb")
    .with_preview("We'd like a $10M umbrella over the existing GL and auto.")
    .with_tag("New Business")
    .with_metadata("Requested Limit", "$10,000,000");
    marcus.sender_address = Some("mlee@globexfoods.com".to_string());
    marcus.timestamp = "Mon".to_string();

    let mut dana = Message::new(
        6,
        "Dana Whitfield",
        "Water damage at Dock 4",
        IntentCategory::Claim,
        DraftSet::new(
            "Hi Dana, thanks for letting us know. I've notified Chubb and an adjuster will \
             reach out to schedule an inspection.",
        )
        .with(
            ToneId::Empathetic,
            "Hi Dana, I'm sorry to hear about the damage at Dock 4. I've notified Chubb and \
             asked them to prioritise the inspection so you can get back to normal quickly.",
        ),
    )
    .with_account("Globex Foods")
    .with_carrier("Chubb")
    .with_preview("A pipe burst over the weekend and flooded part of Dock 4.")
    .with_tag("Urgent")
    .with_metadata("Policy Number", "PROP-7781");
    dana.sender_address = Some("dana.w@globexfoods.com".to_string());
    dana.timestamp = "Last week".to_string();
    dana.read = true;

    vec![alice, travelers, john, priya, marcus, dana]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CORPUS: &str = r#"[
        {
            "id": 1,
            "sender": "Alice Smith",
            "account": "Acme",
            "carrier": "Travelers",
            "subject": "Quote",
            "preview": "Please quote",
            "timestamp": "10:23 AM",
            "intent": "quote",
            "drafts": { "professional": "Hi" }
        },
        {
            "id": 2,
            "sender": "Bob",
            "account": "Globex",
            "carrier": "Chubb",
            "subject": "Claim",
            "preview": "Accident",
            "timestamp": "Yesterday",
            "intent": "claim",
            "tags": ["Urgent"],
            "read": true,
            "drafts": { "professional": "Yo", "direct": "Ok" },
            "metadata": { "Policy Number": "123" }
        }
    ]"#;

    #[test]
    fn test_from_json_preserves_order() {
        let store = MessageStore::from_json_str(CORPUS).unwrap();
        let ids: Vec<u64> = store.iter().map(|m| m.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(store.get(MessageId(2)).unwrap().read);
        assert_eq!(store.get(MessageId(2)).unwrap().draft_for(ToneId::Direct), "Ok");
    }

    #[test]
    fn test_from_json_accepts_camel_case_records() {
        let json = r#"[{
            "id": 1,
            "sender": "Alice Smith",
            "senderAddress": "alice@acme.com",
            "account": "Acme",
            "carrier": "Travelers",
            "subject": "Quote",
            "preview": "Please quote",
            "timestamp": "10:23 AM",
            "intentCategory": "Quote",
            "readFlag": true,
            "draftsByTone": { "professional": "Hi" },
            "metadataFields": { "Policy Number": "123" }
        }]"#;

        let store = MessageStore::from_json_str(json).unwrap();
        let msg = store.get(MessageId(1)).unwrap();
        assert_eq!(msg.sender_address.as_deref(), Some("alice@acme.com"));
        assert_eq!(msg.intent, IntentCategory::Quote);
        assert!(msg.read);
        assert_eq!(msg.draft_for(ToneId::Professional), "Hi");
        assert_eq!(msg.metadata.get("Policy Number").map(String::as_str), Some("123"));
    }

    #[test]
    fn test_corpus_rejects_unknown_intent() {
        let json = CORPUS.replace("\"intent\": \"claim\"", "\"intent\": \"spam\"");
        let err = MessageStore::from_json_str(&json).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert!(err.to_string().contains("unknown intent category"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = CORPUS.replace("\"id\": 2", "\"id\": 1");
        let err = MessageStore::from_json_str(&json).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(MessageId(1))));
    }

    #[test]
    fn test_missing_default_draft_rejected() {
        let json = CORPUS.replace("{ \"professional\": \"Hi\" }", "{ \"direct\": \"Hi\" }");
        let err = MessageStore::from_json_str(&json).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert!(err.to_string().contains("default tone"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CORPUS.as_bytes()).unwrap();

        let store = MessageStore::load_from_path(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MessageStore::load_from_path(Path::new("/nonexistent/inbox.json")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_demo_store_is_well_formed() {
        let store = MessageStore::demo();
        assert!(!store.is_empty());
        assert_eq!(store.first().unwrap().sender, "Alice Smith");

        let mut seen = HashSet::new();
        for msg in &store {
            assert!(seen.insert(msg.id), "duplicate id {}", msg.id);
            assert!(!msg.draft_for(ToneId::default()).is_empty());
        }
    }
}
