//! Status vocabulary shared by the live step output and the run summary.

use super::theme::RigupTheme;

/// Canonical status kinds used across rigup output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Step changed the machine.
    Success,
    /// Step found the machine already in the wanted state.
    Noop,
    /// Step failed.
    Failed,
    /// Step was not run.
    Skipped,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Noop => "=",
            Self::Failed => "✗",
            Self::Skipped => "○",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &RigupTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Noop => theme.info.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_are_distinct() {
        let icons = [
            StatusKind::Success.icon(),
            StatusKind::Noop.icon(),
            StatusKind::Failed.icon(),
            StatusKind::Skipped.icon(),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in &icons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn plain_styled_is_bare_icon() {
        let theme = RigupTheme::plain();
        assert_eq!(StatusKind::Failed.styled(&theme), "✗");
    }
}
