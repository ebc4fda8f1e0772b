//! JAR manifest main-section handling.
//!
//! Models the main attribute section of a `META-INF/MANIFEST.MF` file so the
//! build can merge module metadata into whatever the compiler toolchain
//! already produced. Only the main section is parsed into attributes; any
//! per-entry sections after the first blank line are carried along verbatim
//! and re-emitted untouched.
//!
//! Rendering follows the JAR file specification: CRLF line endings, and no
//! physical line longer than 72 bytes, with overlong values folded onto
//! continuation lines that begin with a single space.

use crate::core::ModpkgError;

/// Attribute name of the mandatory manifest version header.
pub const MANIFEST_VERSION_KEY: &str = "Manifest-Version";

/// Maximum physical line length in bytes, excluding the line terminator.
const MAX_LINE_BYTES: usize = 72;

/// Main-section attributes of a JAR manifest.
///
/// Attribute order is preserved so a rewritten manifest stays recognizable
/// next to the original. Attribute names compare case-insensitively, the way
/// `java.util.jar` treats them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarManifest {
    entries: Vec<(String, String)>,
    trailer: String,
}

impl Default for JarManifest {
    fn default() -> Self {
        Self {
            entries: vec![(MANIFEST_VERSION_KEY.to_string(), "1.0".to_string())],
            trailer: String::new(),
        }
    }
}

impl JarManifest {
    /// Parse manifest bytes into main-section attributes plus a verbatim
    /// trailer holding everything after the first blank line.
    ///
    /// Continuation lines (leading space) are unfolded into the preceding
    /// attribute value. Both CRLF and bare LF terminators are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ModpkgError::ManifestParseError`] if a main-section line is
    /// neither an attribute, a continuation, nor blank.
    pub fn parse(bytes: &[u8]) -> Result<Self, ModpkgError> {
        let text = String::from_utf8_lossy(bytes);
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut trailer = String::new();
        let mut in_trailer = false;

        for raw in text.split_inclusive('\n') {
            if in_trailer {
                trailer.push_str(raw);
                continue;
            }
            let line = raw.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                in_trailer = true;
                continue;
            }
            if let Some(continuation) = raw.strip_prefix(' ') {
                let continuation = continuation.trim_end_matches(['\n', '\r']);
                match entries.last_mut() {
                    Some((_, value)) => value.push_str(continuation),
                    None => {
                        return Err(ModpkgError::ManifestParseError {
                            reason: "continuation line before any attribute".to_string(),
                        });
                    }
                }
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                return Err(ModpkgError::ManifestParseError {
                    reason: format!("attribute line without ':' separator: '{line}'"),
                });
            };
            entries.push((key.trim_end().to_string(), value.trim_start().to_string()));
        }

        Ok(Self { entries, trailer })
    }

    /// Look up an attribute value by case-insensitive name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one in place (keeping its
    /// position) or appending a new one at the end.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
        {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Insert `Manifest-Version: 1.0` as the first attribute if the manifest
    /// carries no version header.
    pub fn ensure_version(&mut self) {
        if self.get(MANIFEST_VERSION_KEY).is_none() {
            self.entries
                .insert(0, (MANIFEST_VERSION_KEY.to_string(), "1.0".to_string()));
        }
    }

    /// Number of main-section attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the main section holds no attributes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the manifest with CRLF terminators and 72-byte line folding,
    /// followed by a blank separator line and the preserved trailer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            fold_into(&format!("{key}: {value}"), &mut out);
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(self.trailer.as_bytes());
        out
    }
}

/// Emit one logical attribute line, folding at 72 bytes.
///
/// Continuation lines start with a single space that counts toward the
/// limit, so continuations carry at most 71 value bytes. Folding happens at
/// character boundaries and therefore never splits a UTF-8 sequence.
fn fold_into(logical: &str, out: &mut Vec<u8>) {
    let mut line_len = 0usize;
    let mut buf = [0u8; 4];
    for ch in logical.chars() {
        let encoded = ch.encode_utf8(&mut buf);
        if line_len + encoded.len() > MAX_LINE_BYTES {
            out.extend_from_slice(b"\r\n ");
            line_len = 1;
        }
        out.extend_from_slice(encoded.as_bytes());
        line_len += encoded.len();
    }
    out.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_renders_version_header() {
        let manifest = JarManifest::default();
        assert_eq!(manifest.to_bytes(), b"Manifest-Version: 1.0\r\n\r\n");
    }

    #[test]
    fn parses_main_section_attributes() {
        let bytes = b"Manifest-Version: 1.0\r\nBuilt-By: ci\r\n\r\n";
        let manifest = JarManifest::parse(bytes).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("Manifest-Version"), Some("1.0"));
        assert_eq!(manifest.get("Built-By"), Some("ci"));
        assert_eq!(manifest.get("built-by"), Some("ci"));
        assert_eq!(manifest.get("Absent"), None);
    }

    #[test]
    fn parses_bare_lf_terminators() {
        let manifest = JarManifest::parse(b"Manifest-Version: 1.0\nKey: value\n").unwrap();
        assert_eq!(manifest.get("Key"), Some("value"));
    }

    #[test]
    fn unfolds_continuation_lines() {
        let bytes = b"Long-Value: first part\r\n  and the rest\r\n";
        let manifest = JarManifest::parse(bytes).unwrap();
        assert_eq!(manifest.get("Long-Value"), Some("first part and the rest"));
    }

    #[test]
    fn set_replaces_in_place_and_appends() {
        let mut manifest = JarManifest::parse(b"Manifest-Version: 1.0\r\nA: 1\r\nB: 2\r\n").unwrap();

        manifest.set("a", "updated");
        manifest.set("C", "3");

        let rendered = String::from_utf8(manifest.to_bytes()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "A: updated");
        assert_eq!(lines[3], "C: 3");
    }

    #[test]
    fn ensure_version_inserts_header_first() {
        let mut manifest = JarManifest::parse(b"Built-By: ci\r\n").unwrap();
        manifest.ensure_version();

        let rendered = String::from_utf8(manifest.to_bytes()).unwrap();
        assert!(rendered.starts_with("Manifest-Version: 1.0\r\n"));
    }

    #[test]
    fn folds_long_values_within_72_bytes() {
        let mut manifest = JarManifest::default();
        manifest.set("Module-Description", "x".repeat(200));

        let rendered = manifest.to_bytes();
        for line in rendered.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            assert!(line.len() <= 72, "physical line exceeds 72 bytes: {}", line.len());
        }
    }

    #[test]
    fn folded_output_parses_back_to_original_value() {
        let value = "a".repeat(300);
        let mut manifest = JarManifest::default();
        manifest.set("Module-Authors", value.clone());

        let reparsed = JarManifest::parse(&manifest.to_bytes()).unwrap();
        assert_eq!(reparsed.get("Module-Authors"), Some(value.as_str()));
    }

    #[test]
    fn preserves_entry_sections_verbatim() {
        let bytes = b"Manifest-Version: 1.0\r\n\r\nName: foo/Bar.class\r\nSHA-256-Digest: abc\r\n";
        let manifest = JarManifest::parse(bytes).unwrap();

        assert_eq!(manifest.len(), 1);
        let rendered = manifest.to_bytes();
        assert!(
            rendered.ends_with(b"Name: foo/Bar.class\r\nSHA-256-Digest: abc\r\n"),
            "trailer sections must survive a rewrite"
        );
    }

    #[test]
    fn rejects_line_without_separator() {
        let result = JarManifest::parse(b"Manifest-Version: 1.0\r\nnot an attribute\r\n");
        assert!(matches!(
            result,
            Err(ModpkgError::ManifestParseError { reason }) if reason.contains("not an attribute")
        ));
    }

    #[test]
    fn rejects_leading_continuation() {
        let result = JarManifest::parse(b" orphan continuation\r\n");
        assert!(matches!(result, Err(ModpkgError::ManifestParseError { .. })));
    }
}
