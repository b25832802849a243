//! Rendering options.

/// Where generated links open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkTarget {
    /// Links open in the current viewing context.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "same"))]
    SameContext,
    /// Links open in a new viewing context (`target="_blank"`).
    #[cfg_attr(feature = "serde", serde(rename = "new"))]
    NewContext,
}

/// Options controlling markdown rendering.
///
/// Rendering is a pure function of the body and these options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Pass block-level HTML through the sanitizer instead of showing it as text.
    ///
    /// Inline HTML is always shown as text.
    pub allow_raw_markup: bool,
    /// Where generated links open.
    pub link_target: LinkTarget,
}

impl RenderOptions {
    /// Set whether block-level HTML passthrough is allowed.
    #[must_use]
    pub fn with_raw_markup(mut self, allowed: bool) -> Self {
        self.allow_raw_markup = allowed;
        self
    }

    /// Set where generated links open.
    #[must_use]
    pub fn with_link_target(mut self, target: LinkTarget) -> Self {
        self.link_target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_restrictive() {
        let options = RenderOptions::default();

        assert!(!options.allow_raw_markup);
        assert_eq!(options.link_target, LinkTarget::SameContext);
    }

    #[test]
    fn test_builders() {
        let options = RenderOptions::default()
            .with_raw_markup(true)
            .with_link_target(LinkTarget::NewContext);

        assert!(options.allow_raw_markup);
        assert_eq!(options.link_target, LinkTarget::NewContext);
    }
}
