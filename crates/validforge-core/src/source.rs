//! Configuration sources for constraint metadata.

use std::fmt;

/// Origin of a metadata declaration.
///
/// Sources are totally ordered from lowest to highest priority:
///
/// `Annotation < XmlConstraint < XmlOverriding < Api < DefaultOverriding`
///
/// Merging metadata for one element keeps every constraint and raises the
/// source tag to the highest priority seen.
///
/// # Example
///
/// ```
/// use validforge_core::ConfigurationSource;
///
/// let merged = ConfigurationSource::Annotation.max(ConfigurationSource::Api);
/// assert_eq!(merged, ConfigurationSource::Api);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigurationSource {
    /// Declarations attached directly to the source elements.
    #[default]
    Annotation,
    /// Constraints added by an external descriptor file.
    XmlConstraint,
    /// Descriptor file entries that override direct declarations.
    XmlOverriding,
    /// Programmatic mapping.
    Api,
    /// Synthetic metadata added by the engine itself.
    DefaultOverriding,
}

impl ConfigurationSource {
    /// All sources, lowest priority first.
    pub const ALL: [ConfigurationSource; 5] = [
        ConfigurationSource::Annotation,
        ConfigurationSource::XmlConstraint,
        ConfigurationSource::XmlOverriding,
        ConfigurationSource::Api,
        ConfigurationSource::DefaultOverriding,
    ];

    /// Returns the source with the higher priority.
    pub fn max(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Numeric priority; higher wins.
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ConfigurationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigurationSource::Annotation => "annotation",
            ConfigurationSource::XmlConstraint => "xml-constraint",
            ConfigurationSource::XmlOverriding => "xml-overriding",
            ConfigurationSource::Api => "api",
            ConfigurationSource::DefaultOverriding => "default-overriding",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order_is_pinned() {
        use ConfigurationSource::*;
        assert!(Annotation < XmlConstraint);
        assert!(XmlConstraint < XmlOverriding);
        assert!(XmlOverriding < Api);
        assert!(Api < DefaultOverriding);

        let priorities: Vec<u8> = ConfigurationSource::ALL.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_max_is_symmetric() {
        for a in ConfigurationSource::ALL {
            for b in ConfigurationSource::ALL {
                assert_eq!(a.max(b), b.max(a));
                assert!(a.max(b) >= a && a.max(b) >= b);
            }
        }
    }
}
