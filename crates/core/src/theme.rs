//! Brand color tokens.

use std::fmt::Write as _;

/// A named color token, e.g. `accent` = `#5d4123`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorToken {
    pub name: &'static str,
    pub value: &'static str,
}

/// The storefront palette. Templates reference tokens through the generated
/// `.text-*`, `.bg-*` and `.border-*` classes or the `--color-*` variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: &'static str,
    pub background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub s_accent: &'static str,
    pub s_text: &'static str,
    pub s_secondary: &'static str,
}

impl Theme {
    pub const COFFEE_CUP_HUT: Self = Self {
        text: "#3F2305",
        background: "#F5F5F5",
        primary: "#f2ebd4",
        secondary: "#DFD7BF",
        accent: "#5d4123",
        s_accent: "#065001",
        s_text: "#dfd7bf",
        s_secondary: "#f2f1ee",
    };

    /// All tokens in declaration order, with their CSS names.
    #[must_use]
    pub const fn tokens(&self) -> [ColorToken; 8] {
        [
            ColorToken { name: "text", value: self.text },
            ColorToken { name: "background", value: self.background },
            ColorToken { name: "primary", value: self.primary },
            ColorToken { name: "secondary", value: self.secondary },
            ColorToken { name: "accent", value: self.accent },
            ColorToken { name: "s-accent", value: self.s_accent },
            ColorToken { name: "s-text", value: self.s_text },
            ColorToken { name: "s-secondary", value: self.s_secondary },
        ]
    }

    /// Look up a token value by CSS name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.tokens()
            .into_iter()
            .find(|token| token.name == name)
            .map(|token| token.value)
    }

    /// Render the stylesheet served at `/theme.css`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let tokens = self.tokens();
        let mut css = String::from(":root {\n");
        for token in &tokens {
            let _ = writeln!(css, "  --color-{}: {};", token.name, token.value);
        }
        css.push_str("}\n");
        for token in &tokens {
            let name = token.name;
            let _ = writeln!(css, ".text-{name} {{ color: var(--color-{name}); }}");
            let _ = writeln!(css, ".bg-{name} {{ background-color: var(--color-{name}); }}");
            let _ = writeln!(css, ".border-{name} {{ border-color: var(--color-{name}); }}");
        }
        css
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::COFFEE_CUP_HUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lookup() {
        let theme = Theme::default();
        assert_eq!(theme.get("accent"), Some("#5d4123"));
        assert_eq!(theme.get("s-accent"), Some("#065001"));
        assert_eq!(theme.get("missing"), None);
    }

    #[test]
    fn test_css_has_variables_and_utilities() {
        let css = Theme::COFFEE_CUP_HUT.to_css();
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --color-text: #3F2305;"));
        assert!(css.contains(".bg-primary { background-color: var(--color-primary); }"));
        assert!(css.contains(".text-s-text { color: var(--color-s-text); }"));
        assert!(css.contains(".border-secondary { border-color: var(--color-secondary); }"));
    }

    #[test]
    fn test_token_names_are_unique() {
        let tokens = Theme::default().tokens();
        for (i, token) in tokens.iter().enumerate() {
            assert!(tokens[i + 1..].iter().all(|other| other.name != token.name));
        }
    }
}
