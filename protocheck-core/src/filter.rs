//! Ignore filters applied to unused types before reporting.

/// Exact-name and package-prefix ignore rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreFilter {
    /// Fully-qualified names, matched exactly
    pub messages: Vec<String>,
    /// Package prefixes, matched on a full segment (`prefix + "."`)
    pub packages: Vec<String>,
}

impl IgnoreFilter {
    pub fn new(
        messages: impl IntoIterator<Item = impl Into<String>>,
        packages: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.packages.is_empty()
    }

    /// Whether `name` is suppressed. `com.foo` matches `com.foo.Bar` and
    /// `com.foo.bar.Baz` but never `com.foobar.Baz`.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.messages.iter().any(|m| m == name)
            || self.packages.iter().any(|p| {
                name.strip_prefix(p.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
            })
    }

    /// Drops ignored names, preserving the order of the rest.
    pub fn apply<'a>(&self, unused: Vec<&'a str>) -> Vec<&'a str> {
        if self.is_empty() {
            return unused;
        }
        unused
            .into_iter()
            .filter(|name| {
                let ignored = self.is_ignored(name);
                if ignored {
                    tracing::debug!(name = %name, "unused type suppressed by ignore filter");
                }
                !ignored
            })
            .collect()
    }
}
