//! Tier models.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::tiers::{TierError, service_account_group, tier_namespace};

/// A subscription tier and the groups entitled to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Precedence when a caller's groups span several tiers; higher wins.
    #[serde(default)]
    pub level: i64,

    #[serde(default)]
    pub groups: SmallVec<[String; 4]>,
}

impl Tier {
    /// The display name, falling back to the tier name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether any of `groups` belongs to this tier.
    #[must_use]
    pub fn contains_any(&self, groups: &[String]) -> bool {
        groups.iter().any(|group| self.groups.contains(group))
    }
}

/// A validated tier list, ordered by precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierConfiguration {
    tiers: Vec<Tier>,
}

impl TierConfiguration {
    /// Parse the YAML tier list for `tenant`.
    ///
    /// Names must be unique and non-empty, and display names must not be
    /// blank. Each tier's groups gain the service account group of the
    /// tier's namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TierError::InvalidConfiguration`] if the document does not
    /// parse or fails validation.
    pub fn parse(document: &str, tenant: &str) -> Result<Self, TierError> {
        let tiers: Vec<Tier> = serde_norway::from_str(document).map_err(|error| {
            TierError::InvalidConfiguration(format!("failed to parse tier configuration: {error}"))
        })?;

        Self::new(tiers, tenant)
    }

    /// Validate and order `tiers` for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns [`TierError::InvalidConfiguration`] on duplicate or empty
    /// names, or a blank display name.
    pub fn new(mut tiers: Vec<Tier>, tenant: &str) -> Result<Self, TierError> {
        let mut seen = FxHashSet::default();

        for tier in &mut tiers {
            if tier.name.trim().is_empty() {
                return Err(TierError::InvalidConfiguration(
                    "tier name must not be empty".to_owned(),
                ));
            }

            if !seen.insert(tier.name.clone()) {
                return Err(TierError::InvalidConfiguration(format!(
                    "duplicate tier name {}",
                    tier.name
                )));
            }

            if tier
                .display_name
                .as_deref()
                .is_some_and(|display_name| display_name.trim().is_empty())
            {
                return Err(TierError::InvalidConfiguration(format!(
                    "tier {} has a blank display name",
                    tier.name
                )));
            }

            let group = service_account_group(&tier_namespace(tenant, &tier.name));

            if !tier.groups.contains(&group) {
                tier.groups.push(group);
            }
        }

        // Stable: equal levels keep document order.
        tiers.sort_by(|a, b| b.level.cmp(&a.level));

        Ok(Self { tiers })
    }

    /// Tiers in precedence order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// The highest-precedence tier containing any of `groups`.
    ///
    /// # Errors
    ///
    /// Returns [`TierError::NoGroups`] for an empty group list and
    /// [`TierError::GroupNotFound`] when no tier matches.
    pub fn resolve(&self, groups: &[String]) -> Result<&Tier, TierError> {
        if groups.is_empty() {
            return Err(TierError::NoGroups);
        }

        self.tiers
            .iter()
            .find(|tier| tier.contains_any(groups))
            .ok_or_else(|| TierError::GroupNotFound(format!("groups [{}]", groups.join(", "))))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const DOCUMENT: &str = r"
- name: free
  description: Free tier
  level: 1
  groups:
    - system:authenticated
- name: premium
  displayName: Premium Plan
  level: 10
  groups:
    - premium-users
- name: enterprise
  level: 10
  groups:
    - enterprise-users
    - premium-users
";

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn higher_level_wins() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;
        let tier = config.resolve(&groups(&["system:authenticated", "enterprise-users"]))?;

        assert_eq!(tier.name, "enterprise");

        Ok(())
    }

    #[test]
    fn equal_levels_keep_document_order() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;
        let tier = config.resolve(&groups(&["premium-users"]))?;

        assert_eq!(tier.name, "premium");
        assert_eq!(tier.display_name(), "Premium Plan");

        Ok(())
    }

    #[test]
    fn display_name_falls_back_to_name() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;
        let tier = config.resolve(&groups(&["system:authenticated"]))?;

        assert_eq!(tier.display_name(), "free");

        Ok(())
    }

    #[test]
    fn synthesized_service_account_group_resolves() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;
        let tier = config.resolve(&groups(&["system:serviceaccounts:acme-tier-free"]))?;

        assert_eq!(tier.name, "free");

        Ok(())
    }

    #[test]
    fn empty_groups_are_rejected() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;

        assert_eq!(config.resolve(&[]), Err(TierError::NoGroups));

        Ok(())
    }

    #[test]
    fn unknown_groups_are_not_found() -> TestResult {
        let config = TierConfiguration::parse(DOCUMENT, "acme")?;
        let result = config.resolve(&groups(&["a", "b"]));

        assert_eq!(
            result,
            Err(TierError::GroupNotFound("groups [a, b]".to_owned()))
        );

        Ok(())
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let result = TierConfiguration::parse(
            "- name: free\n  groups: [a]\n- name: free\n  groups: [b]\n",
            "acme",
        );

        assert!(matches!(result, Err(TierError::InvalidConfiguration(_))));
    }

    #[test]
    fn blank_display_name_fails_validation() {
        let result =
            TierConfiguration::parse("- name: free\n  displayName: '  '\n  groups: [a]\n", "acme");

        assert!(matches!(result, Err(TierError::InvalidConfiguration(_))));
    }

    #[test]
    fn empty_name_fails_validation() {
        let result = TierConfiguration::parse("- name: ''\n  groups: [a]\n", "acme");

        assert!(matches!(result, Err(TierError::InvalidConfiguration(_))));
    }

    #[test]
    fn malformed_yaml_fails_validation() {
        let result = TierConfiguration::parse("tiers: {", "acme");

        assert!(matches!(result, Err(TierError::InvalidConfiguration(_))));
    }
}
