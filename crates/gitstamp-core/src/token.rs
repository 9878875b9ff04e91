//! Placeholder tokens and substitution.

use std::fmt;

use crate::values::TemplateValues;

/// A placeholder recognised in templates.
///
/// Tokens are wrapped in `#` so they are unlikely to collide with real
/// template content. None is a substring of another, so the order in which
/// they are applied does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    BranchName,
    CommitHash,
    ShortCommitHash,
    CommitLog,
}

impl Token {
    /// Every token, in substitution order.
    pub const ALL: [Token; 4] = [
        Token::BranchName,
        Token::CommitHash,
        Token::ShortCommitHash,
        Token::CommitLog,
    ];

    /// The literal text of the token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::BranchName => "#BRANCH_NAME#",
            Token::CommitHash => "#COMMIT_HASH#",
            Token::ShortCommitHash => "#SHORT_COMMIT_HASH#",
            Token::CommitLog => "#COMMIT_LOG#",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace every occurrence of every token in `template` with its value.
///
/// Plain substring replacement: a token must appear character for
/// character. Text without tokens comes back unchanged.
pub fn substitute(template: &str, values: &TemplateValues) -> String {
    Token::ALL
        .iter()
        .fold(template.to_string(), |text, token| {
            text.replace(token.as_str(), values.get(*token))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values() -> TemplateValues {
        TemplateValues {
            branch_name: "main".to_string(),
            commit_hash: "abc123".to_string(),
            short_commit_hash: "abc".to_string(),
            commit_log: "abc 2024-05-01 dev first\ndef 2024-04-30 dev second".to_string(),
        }
    }

    #[test]
    fn substitute_branch_and_hash() {
        assert_eq!(
            substitute("branch=#BRANCH_NAME# hash=#COMMIT_HASH#", &values()),
            "branch=main hash=abc123"
        );
    }

    #[test]
    fn substitute_no_tokens() {
        let plain = "pub const X: &str = \"#NOT_A_TOKEN#\";\n";
        assert_eq!(substitute(plain, &values()), plain);
        assert_eq!(substitute("", &values()), "");
    }

    #[test]
    fn substitute_repeated_tokens() {
        let template = "#SHORT_COMMIT_HASH#/#COMMIT_HASH#/#SHORT_COMMIT_HASH#\n\
                        #COMMIT_LOG#\n#BRANCH_NAME##BRANCH_NAME#";
        let out = substitute(template, &values());
        assert_eq!(
            out,
            "abc/abc123/abc\nabc 2024-05-01 dev first\ndef 2024-04-30 dev second\nmainmain"
        );
        for token in Token::ALL {
            assert!(!out.contains(token.as_str()), "{token} left in output");
        }
    }

    #[test]
    fn substitute_is_case_sensitive() {
        assert_eq!(substitute("#branch_name#", &values()), "#branch_name#");
    }

    #[test]
    fn no_token_contains_another() {
        for a in Token::ALL {
            for b in Token::ALL {
                if a != b {
                    assert!(!a.as_str().contains(b.as_str()));
                }
            }
        }
    }
}
