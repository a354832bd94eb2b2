//! Kubernetes upgrade candidate resolution.
//!
//! Given a cluster's current version and the versions a provider advertises,
//! work out which targets a user may pick. Control plane upgrades move one
//! minor release at a time, so anything further ahead is never offered.
//!
//! The candidate functions are total: absent or malformed versions are skipped
//! and "nothing to offer" is an empty list or `None`.

use semver::Version;
use serde::Serialize;
use tracing::debug;

use crate::error::ConxError;
use crate::provider::CloudProvider;
use crate::version::{coerce_version, is_newer, minor_steps, minor_version};

/// Rules for which supported versions count as upgrade candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradePolicy {
    /// Maximum number of minor releases a single upgrade may move forward.
    pub max_minor_step: u64,
}

impl Default for UpgradePolicy {
    fn default() -> Self {
        Self { max_minor_step: 1 }
    }
}

impl UpgradePolicy {
    /// Whether `candidate` is a valid upgrade target from `current`.
    pub fn allows(&self, current: &Version, candidate: &Version) -> bool {
        is_newer(current, candidate)
            && minor_steps(current, candidate).is_some_and(|steps| steps <= self.max_minor_step)
    }

    /// Supported versions reachable from `current` under this policy, newest
    /// first.
    ///
    /// With no usable baseline (absent or unparsable `current`) every
    /// parseable entry is a candidate.
    pub fn supported_upgrades<S: AsRef<str>>(
        &self,
        current: Option<&str>,
        supported: &[Option<S>],
    ) -> Vec<String> {
        let baseline = current.and_then(coerce_version);
        if baseline.is_none() {
            debug!("No usable current version ({:?}), offering all", current);
        }

        let mut candidates: Vec<(Version, &str)> = parse_supported(supported)
            .into_iter()
            .filter(|(version, _)| {
                baseline
                    .as_ref()
                    .is_none_or(|base| self.allows(base, version))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
            .into_iter()
            .map(|(_, raw)| raw.to_string())
            .collect()
    }
}

/// Coerce every supported entry, skipping `None` and unparsable strings.
fn parse_supported<S: AsRef<str>>(supported: &[Option<S>]) -> Vec<(Version, &str)> {
    supported
        .iter()
        .flatten()
        .map(|raw| AsRef::<str>::as_ref(raw))
        .filter_map(|raw| match coerce_version(raw) {
            Some(version) => Some((version, raw)),
            None => {
                debug!("Skipping malformed supported version: {:?}", raw);
                None
            }
        })
        .collect()
}

/// Supported versions one minor step or less ahead of `current`, newest first.
pub fn supported_upgrades<S: AsRef<str>>(
    current: Option<&str>,
    supported: &[Option<S>],
) -> Vec<String> {
    UpgradePolicy::default().supported_upgrades(current, supported)
}

/// The smallest supported version strictly greater than `current`.
///
/// Unlike [`supported_upgrades`] this does not apply the minor-step rule and
/// needs a baseline: an absent or unparsable `current` yields `None`.
pub fn next_supported_version<S: AsRef<str>>(
    current: Option<&str>,
    supported: &[Option<S>],
) -> Option<String> {
    let current = current.and_then(coerce_version)?;

    parse_supported(supported)
        .into_iter()
        .filter(|(version, _)| is_newer(&current, version))
        .min_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw.to_string())
}

/// Format `version` the way `provider_cloud`'s API expects it.
///
/// AWS gets `major.minor`; every other provider gets the input unchanged.
pub fn to_provider_supported_version(
    version: Option<&str>,
    provider_cloud: Option<&str>,
) -> Option<String> {
    let raw = version?;
    let provider = CloudProvider::parse(provider_cloud?);
    let parsed = coerce_version(raw)?;
    Some(provider.format_version(raw, &parsed))
}

/// Walk from `current` to `target` one minor release at a time.
///
/// Returns the intermediate and final `major.minor` versions, or an empty
/// path when both are on the same minor.
pub fn upgrade_path(current: &str, target: &str) -> Result<Vec<String>, ConxError> {
    let from =
        coerce_version(current).ok_or_else(|| ConxError::InvalidVersion(current.to_string()))?;
    let to = coerce_version(target).ok_or_else(|| ConxError::InvalidVersion(target.to_string()))?;

    if from.major != to.major {
        return Err(ConxError::UpgradeNotPossible(
            "Cross-major version upgrades are not supported".to_string(),
        ));
    }

    if to.minor < from.minor {
        return Err(ConxError::UpgradeNotPossible(format!(
            "Target version {target} is lower than current version {current} (downgrade not supported)"
        )));
    }

    Ok(((from.minor + 1)..=to.minor)
        .map(|minor| format!("{}.{}", from.major, minor))
        .collect())
}

/// Everything an upgrade picker needs for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeSummary {
    pub current: Option<String>,
    pub provider: Option<String>,
    /// Newest first.
    pub candidates: Vec<String>,
    /// Smallest candidate, so it always respects the policy.
    pub next: Option<String>,
    /// `next` formatted for the provider's API.
    pub provider_next: Option<String>,
}

impl UpgradeSummary {
    pub fn new<S: AsRef<str>>(
        current: Option<&str>,
        supported: &[Option<S>],
        provider: Option<&str>,
        policy: &UpgradePolicy,
    ) -> Self {
        let candidates = policy.supported_upgrades(current, supported);
        // Nearest allowed candidate; without a baseline there is no next step.
        let next = current
            .and_then(coerce_version)
            .and_then(|_| candidates.last().cloned());
        let provider_next = to_provider_supported_version(next.as_deref(), provider);

        debug!(
            "Resolved {} upgrade candidates (next: {:?})",
            candidates.len(),
            next
        );

        Self {
            current: current.map(str::to_string),
            provider: provider.map(|p| CloudProvider::parse(p).to_string()),
            candidates,
            next,
            provider_next,
        }
    }

    /// Minor releases between the current version and `candidate`.
    pub fn steps_to(&self, candidate: &str) -> Option<u64> {
        let current = self.current.as_deref().and_then(coerce_version)?;
        minor_steps(&current, &coerce_version(candidate)?)
    }

    pub fn has_upgrades(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Format a version as `major.minor` if it parses.
pub fn control_plane_version(raw: &str) -> Option<String> {
    coerce_version(raw).map(|v| minor_version(&v))
}
