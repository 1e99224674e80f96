/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Diagnostic notation input plug-in
 *
 * Output-side diagnostic notation lives in cbor_diag. Parsing diagnostic notation back into
 * items is out of scope for this crate, but callers can supply a parser which is triggered by a
 * configurable text prefix.
 **************************************************************************************************/
use std::sync::Arc;

use crate::ast::CBOR;
use crate::error::Result;

/// The default trigger prefix for diagnostic-notation input.
pub const DEFAULT_NOTATION_PREFIX: &str = "cbor:";

/// A parser from diagnostic notation to a CBOR item. Rejections are reported through
/// [`crate::error::CBORError::DiagnosticNotation`].
pub trait DiagnosticNotationParser: Send + Sync {
    /// Parse `text` (with the trigger prefix already removed) into an item.
    fn parse(&self, text: &str) -> Result<CBOR>;
}

/// Configuration wiring a [`DiagnosticNotationParser`] to its trigger prefix.
#[derive(Clone)]
pub struct DiagnosticNotation {
    prefix: String,
    parser: Arc<dyn DiagnosticNotationParser>,
}

impl DiagnosticNotation {
    /// Wire `parser` to the default `"cbor:"` prefix.
    pub fn new(parser: Arc<dyn DiagnosticNotationParser>) -> DiagnosticNotation {
        DiagnosticNotation::with_prefix(parser, DEFAULT_NOTATION_PREFIX)
    }

    /// Wire `parser` to a caller-chosen prefix.
    pub fn with_prefix(
        parser: Arc<dyn DiagnosticNotationParser>,
        prefix: impl Into<String>,
    ) -> DiagnosticNotation {
        DiagnosticNotation {
            prefix: prefix.into(),
            parser,
        }
    }

    /// The trigger prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse `text` if it carries the trigger prefix; `None` means the text is not
    /// diagnostic-notation input and should be treated as a plain string.
    pub fn try_parse(&self, text: &str) -> Option<Result<CBOR>> {
        text.strip_prefix(self.prefix.as_str())
            .map(|rest| self.parser.parse(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CBORError;

    struct IntOnly;

    impl DiagnosticNotationParser for IntOnly {
        fn parse(&self, text: &str) -> Result<CBOR> {
            text.trim()
                .parse::<i64>()
                .map(CBOR::from)
                .map_err(|e| CBORError::DiagnosticNotation(e.to_string()))
        }
    }

    #[test]
    fn the_prefix_gates_the_parser() {
        let notation = DiagnosticNotation::new(Arc::new(IntOnly));
        assert_eq!(notation.try_parse("cbor:17"), Some(Ok(CBOR::from(17))));
        assert_eq!(notation.try_parse("plain text"), None);
        assert!(matches!(
            notation.try_parse("cbor:zzz"),
            Some(Err(CBORError::DiagnosticNotation(_)))
        ));
    }
}
