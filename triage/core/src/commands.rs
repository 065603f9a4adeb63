//! Command Dispatch Registry
//!
//! The commands behind the palette. The registry is built once at startup
//! (some commands are derived from the accounts and carriers in the store)
//! and never changes afterwards.
//!
//! Matching is deliberately simple: a command matches when the query is
//! empty or appears, ignoring case, in its label or one of its match
//! tokens. Results keep registration order; there is no scoring.

use serde::{Deserialize, Serialize};

use crate::effects::ThemeMode;
use crate::filter::{facet_values, Facet, FacetKind};
use crate::message::IntentCategory;
use crate::store::MessageStore;

/// Stable command identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    /// Create a command ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Palette group a command is listed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCategory {
    /// Inbox and category filters
    Navigation,
    /// Per-account filters
    Accounts,
    /// Per-carrier filters
    Carriers,
    /// Compose and task tray
    Actions,
    /// Theme
    Settings,
}

impl CommandCategory {
    /// Group heading
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Navigation => "Suggestions",
            Self::Accounts => "Accounts",
            Self::Carriers => "Carriers",
            Self::Actions => "Actions",
            Self::Settings => "Settings",
        }
    }
}

/// What invoking a command does
///
/// Each action does exactly one thing, and doing it twice leaves the same
/// result as doing it once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandAction {
    /// Drop the facet and the search query
    ClearFilters,
    /// Make this the active facet
    SetFacet(Facet),
    /// Open the compose window
    OpenCompose,
    /// Open the task tray for the current message
    OpenTaskTray,
    /// Switch the theme to this mode
    SetTheme(ThemeMode),
}

/// A palette entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Stable identifier
    pub id: CommandId,
    /// Text shown in the palette
    pub label: String,
    /// Group heading
    pub category: CommandCategory,
    /// Extra words the command answers to
    pub match_tokens: Vec<String>,
    /// What it does
    pub action: CommandAction,
}

impl CommandDescriptor {
    /// Create a descriptor with no extra match tokens
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: CommandCategory,
        action: CommandAction,
    ) -> Self {
        Self {
            id: CommandId::new(id),
            label: label.into(),
            category,
            match_tokens: Vec::new(),
            action,
        }
    }

    /// Add match tokens
    #[must_use]
    pub fn with_tokens(mut self, tokens: &[&str]) -> Self {
        self.match_tokens
            .extend(tokens.iter().map(|t| (*t).to_string()));
        self
    }

    /// Whether the command answers to `query`
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.label.to_lowercase().contains(&needle)
            || self
                .match_tokens
                .iter()
                .any(|t| t.to_lowercase().contains(&needle))
    }
}

/// The immutable command list
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    /// Registry over an explicit command list
    #[must_use]
    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self { commands }
    }

    /// The standard command set, with facet commands for what's in the store
    #[must_use]
    pub fn for_store(store: &MessageStore) -> Self {
        let mut commands = vec![CommandDescriptor::new(
            "nav.inbox",
            "Go to Inbox",
            CommandCategory::Navigation,
            CommandAction::ClearFilters,
        )
        .with_tokens(&["all", "home", "clear", "reset"])];

        for category in IntentCategory::ALL {
            commands.push(
                CommandDescriptor::new(
                    format!("nav.{}", category.as_str()),
                    format!("Filter {}", category.plural_label()),
                    CommandCategory::Navigation,
                    CommandAction::SetFacet(Facet::Category(category)),
                )
                .with_tokens(&[category.as_str(), "intent", "category"]),
            );
        }

        for facet in facet_values(store, FacetKind::Account) {
            let name = facet.value().to_string();
            commands.push(
                CommandDescriptor::new(
                    format!("account.{}", slug(&name)),
                    format!("Account: {name}"),
                    CommandCategory::Accounts,
                    CommandAction::SetFacet(facet),
                )
                .with_tokens(&["account", "client"]),
            );
        }

        for facet in facet_values(store, FacetKind::Carrier) {
            let name = facet.value().to_string();
            commands.push(
                CommandDescriptor::new(
                    format!("carrier.{}", slug(&name)),
                    format!("Carrier: {name}"),
                    CommandCategory::Carriers,
                    CommandAction::SetFacet(facet),
                )
                .with_tokens(&["carrier", "insurer", "market"]),
            );
        }

        commands.extend([
            CommandDescriptor::new(
                "action.compose",
                "Compose New Message",
                CommandCategory::Actions,
                CommandAction::OpenCompose,
            )
            .with_tokens(&["new", "write", "email"]),
            CommandDescriptor::new(
                "action.task",
                "Create Task from Message",
                CommandCategory::Actions,
                CommandAction::OpenTaskTray,
            )
            .with_tokens(&["todo", "follow up", "tray"]),
            CommandDescriptor::new(
                "settings.theme.dark",
                "Use Dark Theme",
                CommandCategory::Settings,
                CommandAction::SetTheme(ThemeMode::Dark),
            )
            .with_tokens(&["dark mode", "theme", "appearance"]),
            CommandDescriptor::new(
                "settings.theme.light",
                "Use Light Theme",
                CommandCategory::Settings,
                CommandAction::SetTheme(ThemeMode::Light),
            )
            .with_tokens(&["light mode", "theme", "appearance"]),
        ]);

        tracing::debug!(commands = commands.len(), "Command registry built");

        Self { commands }
    }

    /// Matching commands, in registration order
    #[must_use]
    pub fn query(&self, text: &str) -> Vec<&CommandDescriptor> {
        self.commands.iter().filter(|c| c.matches(text)).collect()
    }

    /// Look up a command by id
    #[must_use]
    pub fn get(&self, id: &CommandId) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| &c.id == id)
    }

    /// All commands, in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, CommandDescriptor> {
        self.commands.iter()
    }

    /// Number of commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DraftSet, Message};
    use pretty_assertions::assert_eq;

    fn registry() -> CommandRegistry {
        let store = MessageStore::new(vec![
            Message::new(1, "Alice", "Quote", IntentCategory::Quote, DraftSet::new("Hi"))
                .with_account("Acme Corp")
                .with_carrier("Travelers"),
            Message::new(2, "Bob", "Claim", IntentCategory::Claim, DraftSet::new("Yo"))
                .with_account("Globex")
                .with_carrier("Travelers"),
        ]);
        CommandRegistry::for_store(&store)
    }

    fn labels(results: &[&CommandDescriptor]) -> Vec<String> {
        results.iter().map(|c| c.label.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let registry = registry();
        let all = registry.query("");
        assert_eq!(all.len(), registry.len());
        assert_eq!(all[0].label, "Go to Inbox");
        assert_eq!(all.last().unwrap().label, "Use Light Theme");
    }

    #[test]
    fn test_label_substring_is_case_insensitive() {
        let registry = registry();
        assert_eq!(labels(&registry.query("QUOTES")), vec!["Filter Quotes"]);
    }

    #[test]
    fn test_match_tokens_count() {
        let registry = registry();
        assert_eq!(
            labels(&registry.query("dark mode")),
            vec!["Use Dark Theme"]
        );
        assert_eq!(
            labels(&registry.query("insurer")),
            vec!["Carrier: Travelers"]
        );
    }

    #[test]
    fn test_ranking_keeps_registration_order() {
        let registry = registry();
        assert_eq!(
            labels(&registry.query("theme")),
            vec!["Use Dark Theme", "Use Light Theme"]
        );
        assert_eq!(
            labels(&registry.query("account")),
            vec!["Account: Acme Corp", "Account: Globex"]
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(registry().query("zzzz").is_empty());
    }

    #[test]
    fn test_store_derived_commands_are_distinct() {
        let registry = registry();
        let carriers: Vec<_> = registry
            .iter()
            .filter(|c| c.category == CommandCategory::Carriers)
            .collect();
        assert_eq!(carriers.len(), 1);
        assert_eq!(
            carriers[0].action,
            CommandAction::SetFacet(Facet::Carrier("Travelers".into()))
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = registry();
        let cmd = registry.get(&CommandId::new("account.acme-corp")).unwrap();
        assert_eq!(cmd.action, CommandAction::SetFacet(Facet::Account("Acme Corp".into())));
        assert!(registry.get(&CommandId::new("nope")).is_none());
    }
}
