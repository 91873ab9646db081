//! Permalink construction from a provider template.

use crate::domain::errors::DomainError;
use crate::domain::model::{LineRange, ProviderTemplate, RemoteInfo};
use crate::domain::provider::ProviderRegistry;

/// Build the permalink for `file_path` at `branch`, selecting the template by
/// the remote's domain.
///
/// Values are inserted verbatim; `file_path` and `branch` must already be
/// URL-path-safe.
pub fn build_url(
    registry: &ProviderRegistry,
    remote: &RemoteInfo,
    file_path: &str,
    branch: &str,
    lines: LineRange,
) -> Result<String, DomainError> {
    let provider =
        registry
            .resolve(&remote.domain)
            .ok_or_else(|| DomainError::UnsupportedProvider {
                domain: remote.domain.clone(),
            })?;
    Ok(render_template(provider, remote, file_path, branch, lines))
}

/// Substitute each placeholder once, in a fixed order.
pub fn render_template(
    provider: &ProviderTemplate,
    remote: &RemoteInfo,
    file_path: &str,
    branch: &str,
    lines: LineRange,
) -> String {
    let start = lines.start().to_string();
    let end = lines.end().to_string();

    [
        ("{domain}", remote.domain.as_str()),
        ("{owner}", remote.owner.as_str()),
        ("{repo}", remote.repo.as_str()),
        ("{branch}", branch),
        ("{filePath}", file_path),
        ("{startLine}", start.as_str()),
        ("{endLine}", end.as_str()),
    ]
    .into_iter()
    .fold(provider.url_template.clone(), |url, (token, value)| {
        url.replacen(token, value, 1)
    })
}
