//! Applying fixes by swapping tokens.

use roundmark_parser::{MarkdownToken, TokenStream};

use crate::linter::diagnostics::Diagnostic;

/// Return `tokens` with every fix's replacement tokens swapped in. When two
/// fixes replace the same token the first one wins.
pub fn apply_fixes(tokens: &[MarkdownToken], diagnostics: &[Diagnostic]) -> TokenStream {
    let mut fixed = tokens.to_vec();
    let mut replaced = vec![false; tokens.len()];

    for fix in diagnostics.iter().filter_map(|d| d.fix.as_ref()) {
        let conflicts = fix
            .replacements
            .iter()
            .any(|r| replaced.get(r.index).is_none_or(|&done| done));
        if conflicts {
            log::debug!("Skipping overlapping fix: {}", fix.message);
            continue;
        }
        for replacement in &fix.replacements {
            fixed[replacement.index] = replacement.token.clone();
            replaced[replacement.index] = true;
        }
    }

    fixed
}
