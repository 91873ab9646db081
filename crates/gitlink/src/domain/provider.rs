//! Provider registry: built-in hosting services plus user-supplied templates.

use serde::Serialize;
use tracing::warn;

use crate::domain::model::ProviderTemplate;

const BUILTIN_PROVIDERS: [(&str, &str, &str); 4] = [
    (
        "GitHub",
        "github.com",
        "https://{domain}/{owner}/{repo}/blob/{branch}/{filePath}#L{startLine}-L{endLine}",
    ),
    (
        "GitLab",
        "gitlab.com",
        "https://{domain}/{owner}/{repo}/-/blob/{branch}/{filePath}#L{startLine}-{endLine}",
    ),
    (
        "Bitbucket",
        "bitbucket.org",
        "https://{domain}/{owner}/{repo}/src/{branch}/{filePath}#lines-{startLine}:{endLine}",
    ),
    (
        "Azure DevOps",
        "dev.azure.com",
        "https://{domain}/{owner}/{repo}?path=/{filePath}&version=GB{branch}&line={startLine}&lineEnd={endLine}&lineStartColumn=1&lineEndColumn=1",
    ),
];

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderSource {
    Builtin,
    Custom,
}

/// Registry entry as listed by `gitlink providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    #[serde(flatten)]
    pub template: ProviderTemplate,
    pub source: ProviderSource,
    /// Set when an earlier entry already claims the same domain.
    pub shadowed: bool,
}

/// Ordered provider list. Lookup is a linear scan, so built-ins always win a
/// domain collision with a custom entry.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderTemplate>,
    builtin_count: usize,
}

impl ProviderRegistry {
    /// Registry holding only the built-in providers.
    pub fn builtin() -> Self {
        let providers: Vec<ProviderTemplate> = BUILTIN_PROVIDERS
            .iter()
            .map(|(name, domain, template)| ProviderTemplate::new(*name, *domain, *template))
            .collect();
        let builtin_count = providers.len();
        Self {
            providers,
            builtin_count,
        }
    }

    /// Built-ins followed by `custom`, in the order given.
    pub fn with_custom(custom: Vec<ProviderTemplate>) -> Self {
        let mut registry = Self::builtin();
        for provider in custom {
            if !provider.url_template.contains("{filePath}") {
                warn!(
                    provider = %provider.name,
                    "custom provider template has no {{filePath}} placeholder"
                );
            }
            if registry.resolve(&provider.domain).is_some() {
                warn!(
                    provider = %provider.name,
                    domain = %provider.domain,
                    "custom provider is shadowed by an earlier entry for the same domain"
                );
            }
            registry.providers.push(provider);
        }
        registry
    }

    /// First provider whose domain equals `domain` exactly.
    pub fn resolve(&self, domain: &str) -> Option<&ProviderTemplate> {
        self.providers
            .iter()
            .find(|provider| provider.domain == domain)
    }

    /// All entries in lookup order.
    pub fn providers(&self) -> Vec<ProviderEntry> {
        self.providers
            .iter()
            .enumerate()
            .map(|(index, provider)| ProviderEntry {
                template: provider.clone(),
                source: if index < self.builtin_count {
                    ProviderSource::Builtin
                } else {
                    ProviderSource::Custom
                },
                shadowed: self.providers[..index]
                    .iter()
                    .any(|earlier| earlier.domain == provider.domain),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
