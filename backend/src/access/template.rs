//! Path template parsing and substitution.
//!
//! Templates look like
//! `$MANGA_SPECTRO_REDUX/{drpver}/{plate}/stack/manga-{plate}-{ifu}-{wave}CUBE.fits.gz`:
//! `{key}` placeholders are filled from keywords and `$VAR` / `${VAR}`
//! references from an environment lookup. A placeholder may carry a padding
//! spec such as `{plate:0>6}`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// `${VAR}`, `$VAR` or `{key[:spec]}`, matched left to right in one pass.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)\}|\$(\w+)|\{(\w+)(?::([^}]*))?\}").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// Environment reference; `raw` is kept for unknown variables.
    Env { var: String, raw: String },
    Placeholder { key: String, spec: Option<String> },
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Text that is not a token is kept literally.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                segments.push(Segment::Literal(raw[last..whole.start()].to_string()));
            }
            let segment = match (caps.get(1).or(caps.get(2)), caps.get(3)) {
                (Some(var), _) => Segment::Env {
                    var: var.as_str().to_string(),
                    raw: whole.as_str().to_string(),
                },
                (None, Some(key)) => Segment::Placeholder {
                    key: key.as_str().to_string(),
                    spec: caps.get(4).map(|m| m.as_str().to_string()),
                },
                (None, None) => Segment::Literal(whole.as_str().to_string()),
            };
            segments.push(segment);
            last = whole.end();
        }
        if last < raw.len() {
            segments.push(Segment::Literal(raw[last..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder keys in order of first appearance.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder { key, .. } = segment {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// Fill placeholders from `kwargs` and expand environment references.
    /// Unknown variables are left untouched.
    ///
    /// Returns the first key that has no value on failure.
    pub fn render<F>(&self, kwargs: &BTreeMap<String, String>, env: F) -> Result<String, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Env { var, raw } => match env(var) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(raw),
                },
                Segment::Placeholder { key, spec } => {
                    let value = kwargs.get(key).ok_or_else(|| key.clone())?;
                    out.push_str(&apply_spec(value, spec.as_deref()));
                }
            }
        }
        Ok(out)
    }
}

/// `[fill]>width` left-pads to `width`; other specs are ignored.
fn apply_spec(value: &str, spec: Option<&str>) -> String {
    let Some((fill, width)) = spec.and_then(|s| s.split_once('>')) else {
        return value.to_string();
    };
    let Ok(width) = width.parse::<usize>() else {
        return value.to_string();
    };
    let fill = fill.chars().next().unwrap_or(' ');
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut padded: String = std::iter::repeat(fill).take(width - len).collect();
    padded.push_str(value);
    padded
}
