//! Log sanitization for policyholder identifiers.
//!
//! Batch files often carry columns the model ignores (names, emails, ID
//! numbers). Those values can reach log lines through warnings and error
//! messages, so formatted log output is passed through `sanitize()` before it
//! is written. Redacted:
//! - Email addresses
//! - Phone numbers (international and South African local formats)
//! - 13-digit national ID numbers
//! - Policy numbers (`POL-...` or `policy no: ...`)
//! - UUIDs
//!
//! Input is capped at `CLAIMGUARD_SANITIZE_MAX_BYTES` (default 16 KiB).

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Patterns {
    set: RegexSet,
    rules: Vec<(Regex, &'static str)>,
}

const RULES: [(&str, &str); 5] = [
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (r"\b\d{13}\b", "[REDACTED-ID]"),
    (
        r"(?i)\b(?:POL-[A-Z0-9]{4,16}|policy\s*(?:no\.?|number|#)\s*[:=]?\s*\d[A-Z0-9-]{3,19})\b",
        "[REDACTED-POLICY]",
    ),
    (
        r"(?:\+27[\s-]?|\b0)\d{2}[\s-]?\d{3}[\s-]?\d{4}\b",
        "[REDACTED-PHONE]",
    ),
];

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        set: RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set"),
        rules: RULES
            .iter()
            .map(|(p, r)| (Regex::new(p).expect("Valid regex"), *r))
            .collect(),
    })
}

/// Byte limit for one sanitized entry, from `CLAIMGUARD_SANITIZE_MAX_BYTES`.
#[must_use]
pub fn limit_from_env() -> usize {
    match std::env::var("CLAIMGUARD_SANITIZE_MAX_BYTES") {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => limit,
            _ => DEFAULT_SANITIZE_MAX_BYTES,
        },
        Err(_) => DEFAULT_SANITIZE_MAX_BYTES,
    }
}

/// Replace policyholder identifiers in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, limit_from_env())
}

/// Like `sanitize`, keeping at most `max_bytes` of `input` (cut on a char
/// boundary) and marking the cut.
#[must_use]
pub fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let cut = (0..=max_bytes.min(input.len()))
        .rev()
        .find(|&i| input.is_char_boundary(i))
        .unwrap_or(0);
    let kept = &input[..cut];

    let patterns = patterns();
    let mut redacted = kept.to_string();
    for idx in &patterns.set.matches(kept) {
        let (regex, replacement) = &patterns.rules[idx];
        redacted = regex.replace_all(&redacted, *replacement).into_owned();
    }

    if cut < input.len() {
        redacted.push_str(" [TRUNCATED]");
    }
    redacted
}

/// `MakeWriter` that redacts every formatted log line before handing it to
/// the wrapped writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    /// Wrap `inner` with the byte limit taken from the environment.
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self::with_limit(inner, limit_from_env())
    }

    #[must_use]
    pub fn with_limit(inner: M, max_bytes: usize) -> Self {
        Self { inner, max_bytes }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for SanitizingMakeWriter<M> {
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}

/// Line-buffering writer produced by `SanitizingMakeWriter`.
///
/// Partial lines wait in `pending` until their newline arrives, the writer is
/// flushed or dropped, or they exceed twice the byte limit.
pub struct SanitizingWriter<W: Write> {
    inner: W,
    pending: Vec<u8>,
    max_bytes: usize,
}

impl<W: Write> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            max_bytes,
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        let text = sanitize_with_limit(&String::from_utf8_lossy(bytes), self.max_bytes);
        self.inner.write_all(text.as_bytes())
    }

    fn emit_complete_lines(&mut self) -> io::Result<()> {
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let ready: Vec<u8> = self.pending.drain(..=last_newline).collect();
        for line in ready.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.emit_complete_lines()?;

        if self.pending.len() > self.max_bytes.saturating_mul(2) {
            let oversized = std::mem::take(&mut self.pending);
            self.emit(&oversized)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_complete_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        // Nowhere to report a failure from drop.
        let _ = self.flush();
    }
}
