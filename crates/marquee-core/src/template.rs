//! Single-pass template substitution
//!
//! The template is scanned once from left to right. At every `[` the active
//! token literals are tried; a match is replaced by its resolver output and
//! scanning resumes after the literal. Substituted text is never scanned
//! again, so values that happen to contain token literals pass through as-is.

use crate::tokens::{Scope, Token, TokenTable};

/// Template engine
pub struct TemplateEngine;

impl TemplateEngine {
    /// Replace every occurrence of every active token in `template`.
    ///
    /// Each resolver runs at most once per call; repeated occurrences of the
    /// same token reuse the first result. Unknown bracketed text and text
    /// outside brackets are copied unchanged.
    pub fn resolve(template: &str, table: &TokenTable, scope: &Scope<'_>) -> String {
        if !template.contains('[') || table.is_empty() {
            return template.to_string();
        }

        let entries = table.entries();
        let mut resolved: Vec<Option<String>> = vec![None; entries.len()];
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('[') {
            output.push_str(&rest[..start]);
            let candidate = &rest[start..];

            match entries
                .iter()
                .position(|(token, _)| candidate.starts_with(token.literal()))
            {
                Some(index) => {
                    let (token, resolver) = entries[index];
                    let value = resolved[index].get_or_insert_with(|| resolver(scope));
                    output.push_str(value);
                    rest = &candidate[token.literal().len()..];
                }
                None => {
                    output.push('[');
                    rest = &candidate[1..];
                }
            }
        }

        output.push_str(rest);
        output
    }

    /// Active tokens referenced by `template`, in order of first appearance
    pub fn referenced_tokens(template: &str, table: &TokenTable) -> Vec<Token> {
        let mut found = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find('[') {
            let candidate = &rest[start..];
            match table.tokens().find(|token| candidate.starts_with(token.literal())) {
                Some(token) => {
                    if !found.contains(&token) {
                        found.push(token);
                    }
                    rest = &candidate[token.literal().len()..];
                }
                None => rest = &candidate[1..],
            }
        }

        found
    }
}
